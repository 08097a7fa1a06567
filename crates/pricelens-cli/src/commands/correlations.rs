use std::path::{Path, PathBuf};

use pricelens_core::{AnalysisSession, CorrelationMatrix};
use serde::Serialize;

use crate::error::CliError;
use crate::render::{chart, text};

use super::CommandResult;

pub const DEFAULT_OUTPUT: &str = "correlations.svg";

#[derive(Debug, Serialize)]
struct CorrelationData<'a> {
    correlations: &'a CorrelationMatrix,
    chart: PathBuf,
}

/// Print the correlation table and write the heatmap.
pub fn run(session: &AnalysisSession, output: Option<&Path>) -> Result<CommandResult, CliError> {
    let matrix = session.correlations()?;
    let path = output.unwrap_or_else(|| Path::new(DEFAULT_OUTPUT));

    chart::write_svg(path, &chart::correlation_heatmap(matrix))?;

    let mut rendered = String::from("Correlation Matrix:\n\n");
    rendered.push_str(&text::correlation_table(matrix));
    rendered.push_str(&format!("\nHeatmap written to {}\n", path.display()));

    let data = serde_json::to_value(CorrelationData {
        correlations: matrix,
        chart: path.to_path_buf(),
    })?;
    Ok(CommandResult::ok(data, rendered))
}
