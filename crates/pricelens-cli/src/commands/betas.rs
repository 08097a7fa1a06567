use pricelens_core::{AnalysisSession, SessionError};
use serde_json::json;

use crate::error::CliError;
use crate::render::text;

use super::CommandResult;

/// Beta summary. A missing benchmark is reported, not treated as a failure.
pub fn run(session: &AnalysisSession) -> Result<CommandResult, CliError> {
    match session.betas() {
        Ok(betas) => Ok(CommandResult::ok(
            serde_json::to_value(betas)?,
            text::betas_summary(betas),
        )),
        Err(SessionError::BetasUnavailable { benchmark }) => Ok(CommandResult::ok(
            json!({ "benchmark": benchmark, "estimates": null }),
            String::from("Betas could not be calculated.\n"),
        )),
        Err(error) => Err(error.into()),
    }
}
