use pricelens_core::{
    AnalysisRequest, AnalysisSession, BetaResult, DateRange, EnvelopeError, PriceTable, Symbol,
};
use serde::Serialize;

use crate::error::CliError;
use crate::render::text;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct FetchResponseData<'a> {
    range: DateRange,
    benchmark: &'a Symbol,
    prices: &'a PriceTable,
    betas: Option<&'a BetaResult>,
}

pub async fn run(
    session: &mut AnalysisSession,
    request: &AnalysisRequest,
) -> Result<CommandResult, CliError> {
    let snapshot = session.fetch(request).await?;

    let data = serde_json::to_value(FetchResponseData {
        range: request.range,
        benchmark: &request.benchmark,
        prices: &snapshot.report.table,
        betas: snapshot.betas.as_ref(),
    })?;
    let errors = snapshot
        .report
        .failures
        .iter()
        .map(EnvelopeError::from)
        .collect();

    Ok(CommandResult::ok(data, text::fetch_summary(snapshot))
        .with_warnings(snapshot.warnings.clone())
        .with_errors(errors))
}
