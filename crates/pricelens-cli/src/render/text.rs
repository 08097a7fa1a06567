//! Plain-text summaries. Undefined numbers always render as `N/A`.

use std::fmt::Write as _;

use pricelens_core::{
    AnalysisSnapshot, BetaResult, CorrelationMatrix, LatestClose, ReturnSeries, TickerLatest,
};

pub const NOT_AVAILABLE: &str = "N/A";

pub fn format_number(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        String::from(NOT_AVAILABLE)
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:+.2}%", v * 100.0),
        None => String::from(NOT_AVAILABLE),
    }
}

/// `AAPL: 1.23` per ticker, `N/A` when the beta is undefined.
pub fn betas_summary(betas: &BetaResult) -> String {
    let mut out = String::from("Beta values for selected stocks:\n\n");
    for entry in &betas.estimates {
        let value = entry
            .estimate
            .value()
            .map_or_else(|| String::from(NOT_AVAILABLE), |beta| format_number(beta, 2));
        let _ = writeln!(out, "{}: {value}", entry.symbol);
    }
    out
}

/// `AAPL: $123.45` per ticker, `No Data` when nothing was returned.
pub fn latest_summary(closes: &[TickerLatest]) -> String {
    let mut out = String::from("Today's Closing Prices:\n\n");
    for entry in closes {
        match &entry.latest {
            LatestClose::Price { close, .. } => {
                let _ = writeln!(out, "{}: ${}", entry.symbol, format_number(*close, 2));
            }
            LatestClose::NoData { .. } => {
                let _ = writeln!(out, "{}: No Data", entry.symbol);
            }
        }
    }
    out
}

pub fn correlation_table(matrix: &CorrelationMatrix) -> String {
    if matrix.is_empty() {
        return String::from("No correlations to show.\n");
    }

    let width = matrix
        .symbols
        .iter()
        .map(|symbol| symbol.as_str().len())
        .max()
        .unwrap_or(0)
        .max(5);

    let mut out = format!("{:width$}", "");
    for symbol in &matrix.symbols {
        let _ = write!(out, "  {:>width$}", symbol.as_str());
    }
    out.push('\n');

    for (symbol, row) in matrix.symbols.iter().zip(&matrix.values) {
        let _ = write!(out, "{:<width$}", symbol.as_str());
        for value in row {
            let _ = write!(out, "  {:>width$}", format_number(*value, 2));
        }
        out.push('\n');
    }
    out
}

pub fn returns_table(returns: &[ReturnSeries]) -> String {
    let mut out = String::new();
    for series in returns {
        let _ = writeln!(
            out,
            "{} (total {})",
            series.symbol,
            format_percent(series.total_return())
        );
        let _ = writeln!(
            out,
            "  {:<10}  {:>12}  {:>9}  {:>10}",
            "date", "close", "daily", "cumulative"
        );
        for point in &series.points {
            let _ = writeln!(
                out,
                "  {:<10}  {:>12}  {:>9}  {:>10}",
                point.date.to_string(),
                format_number(point.close, 2),
                format_percent(point.daily_return),
                format_percent(point.cumulative_return)
            );
        }
        out.push('\n');
    }
    out
}

/// Outcome line plus per-ticker row counts after a fetch.
pub fn fetch_summary(snapshot: &AnalysisSnapshot) -> String {
    let mut out = if snapshot.betas.is_some() {
        String::from("Data fetched successfully! Betas calculated.\n\n")
    } else {
        String::from("Data fetched successfully. Betas could not be calculated.\n\n")
    };

    for series in snapshot.report.table.series() {
        let range = match (series.first(), series.last()) {
            (Some(first), Some(last)) => format!("{} to {}", first.date, last.date),
            _ => String::from("no rows"),
        };
        let _ = writeln!(out, "{}: {} rows ({range})", series.symbol, series.len());
    }
    for failure in &snapshot.report.failures {
        let _ = writeln!(out, "{}: failed ({})", failure.symbol, failure.error.message());
    }
    let _ = writeln!(
        out,
        "Total: {} rows across {} tickers",
        snapshot.report.table.observation_count(),
        snapshot.report.table.len()
    );

    if let Some(betas) = &snapshot.betas {
        out.push('\n');
        out.push_str(&betas_summary(betas));
    }
    out
}
