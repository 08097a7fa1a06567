use pricelens_core::AnalysisSession;

use crate::error::CliError;
use crate::render::text;

use super::CommandResult;

pub fn run(session: &AnalysisSession) -> Result<CommandResult, CliError> {
    let returns = session.returns()?;
    Ok(CommandResult::ok(
        serde_json::to_value(returns)?,
        text::returns_table(returns),
    ))
}
