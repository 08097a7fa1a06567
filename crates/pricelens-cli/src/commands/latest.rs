use pricelens_core::{parse_ticker_list, AnalysisSession, LatestClose};
use serde_json::json;

use crate::error::CliError;
use crate::render::text;

use super::CommandResult;

/// Latest close for each ticker in a comma-separated list.
pub async fn run(session: &AnalysisSession, tickers: &str) -> Result<CommandResult, CliError> {
    let symbols = parse_ticker_list(tickers)?;
    let closes = session.latest_closes(&symbols).await;

    let warnings = closes
        .iter()
        .filter_map(|entry| match &entry.latest {
            LatestClose::NoData { reason } => Some(format!("{}: {reason}", entry.symbol)),
            LatestClose::Price { .. } => None,
        })
        .collect();

    Ok(CommandResult::ok(
        json!({ "closes": &closes }),
        text::latest_summary(&closes),
    )
    .with_warnings(warnings))
}
