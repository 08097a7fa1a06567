use std::path::{Path, PathBuf};

use pricelens_core::{AnalysisSession, Symbol};
use serde::Serialize;

use crate::error::CliError;
use crate::render::chart;

use super::CommandResult;

pub const DEFAULT_OUTPUT: &str = "prices.svg";

#[derive(Debug, Serialize)]
struct PriceChartData {
    chart: PathBuf,
    tickers: Vec<Symbol>,
}

/// Write the closing-price line chart of the current dataset.
pub fn run(session: &AnalysisSession, output: Option<&Path>) -> Result<CommandResult, CliError> {
    let table = session.prices()?;
    let path = output.unwrap_or_else(|| Path::new(DEFAULT_OUTPUT));

    chart::write_svg(path, &chart::price_chart(table))?;

    let text = format!("Price chart written to {}\n", path.display());
    let data = serde_json::to_value(PriceChartData {
        chart: path.to_path_buf(),
        tickers: table.symbols(),
    })?;
    Ok(CommandResult::ok(data, text))
}
