//! Multi-ticker fetch and shape normalization.
//!
//! Whatever the number of requested tickers, the result is a [`PriceTable`]
//! with one series per ticker that returned data. Tickers that fail are
//! reported individually instead of aborting the batch.

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{info, warn};

use crate::data_source::{DataSource, HistoryRequest, SourceError};
use crate::{DateRange, PriceTable, ProviderId, Symbol};

/// One ticker that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerFailure {
    pub symbol: Symbol,
    #[serde(serialize_with = "serialize_source_error")]
    pub error: SourceError,
}

impl TickerFailure {
    /// Warning line used by the CLI and the JSON envelope.
    pub fn warning(&self) -> String {
        format!("{}: {}", self.symbol, self.error)
    }
}

/// Result of a fetch where at least one ticker returned data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchReport {
    pub source: ProviderId,
    pub range: DateRange,
    pub table: PriceTable,
    pub failures: Vec<TickerFailure>,
}

impl FetchReport {
    pub fn warnings(&self) -> Vec<String> {
        self.failures.iter().map(TickerFailure::warning).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("no tickers were requested")]
    NoTickers,
    #[error("no data found for any ticker: {}", summarize(.failures))]
    NoData { failures: Vec<TickerFailure> },
}

impl FetchError {
    pub fn failures(&self) -> &[TickerFailure] {
        match self {
            Self::NoTickers => &[],
            Self::NoData { failures } => failures,
        }
    }
}

/// Fetch daily closes for every symbol, one request at a time.
///
/// # Errors
///
/// Returns [`FetchError::NoData`] when every ticker failed. Partial failures
/// are recorded in [`FetchReport::failures`].
pub async fn fetch_prices(
    source: &dyn DataSource,
    symbols: &[Symbol],
    range: DateRange,
) -> Result<FetchReport, FetchError> {
    if symbols.is_empty() {
        return Err(FetchError::NoTickers);
    }

    let mut table = PriceTable::new();
    let mut failures = Vec::new();

    for symbol in symbols {
        let request = HistoryRequest::new(symbol.clone(), range);
        match source.history(request).await {
            Ok(series) if !series.is_empty() => {
                info!(
                    source = %source.id(),
                    symbol = %symbol,
                    rows = series.len(),
                    "fetched price history"
                );
                table.insert(series);
            }
            Ok(_) => {
                warn!(symbol = %symbol, "source returned an empty series");
                failures.push(TickerFailure {
                    symbol: symbol.clone(),
                    error: SourceError::no_data(symbol),
                });
            }
            Err(error) => {
                warn!(symbol = %symbol, error = %error, "failed to fetch price history");
                failures.push(TickerFailure {
                    symbol: symbol.clone(),
                    error,
                });
            }
        }
    }

    if table.is_empty() {
        return Err(FetchError::NoData { failures });
    }
    info!(
        tickers = table.len(),
        rows = table.observation_count(),
        failures = failures.len(),
        "fetch complete"
    );

    Ok(FetchReport {
        source: source.id(),
        range,
        table,
        failures,
    })
}

fn summarize(failures: &[TickerFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.symbol.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn serialize_source_error<S>(error: &SourceError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::SerializeStruct;

    let mut state = serializer.serialize_struct("SourceError", 3)?;
    state.serialize_field("code", error.code())?;
    state.serialize_field("kind", &error.kind())?;
    state.serialize_field("message", error.message())?;
    state.end()
}
