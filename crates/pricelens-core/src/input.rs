//! User input validation.
//!
//! Everything a fetch needs is validated here, before any data source is
//! contacted: a bad ticker list or date never reaches the network.

use serde::Serialize;

use crate::{DateRange, Symbol, TradingDate, ValidationError};

/// Default market index used as the beta regressor.
pub const DEFAULT_BENCHMARK: &str = "^GSPC";

/// Split a comma-separated ticker list into trimmed, non-empty tokens.
///
/// Case is preserved; empty tokens (including a trailing comma) are dropped.
pub fn split_ticker_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a comma-separated ticker list into unique symbols in input order.
pub fn parse_ticker_list(input: &str) -> Result<Vec<Symbol>, ValidationError> {
    let mut symbols: Vec<Symbol> = Vec::new();
    for token in split_ticker_list(input) {
        let symbol = Symbol::parse(&token)?;
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    if symbols.is_empty() {
        return Err(ValidationError::EmptyTickerList);
    }
    Ok(symbols)
}

/// Parse a required `YYYY-MM-DD` date field.
pub fn parse_date_field(input: &str) -> Result<TradingDate, ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::MissingDate);
    }
    TradingDate::parse(input)
}

/// A fully validated fetch-and-analyze request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub symbols: Vec<Symbol>,
    pub range: DateRange,
    pub benchmark: Symbol,
}

impl AnalysisRequest {
    pub fn new(
        symbols: Vec<Symbol>,
        range: DateRange,
        benchmark: Symbol,
    ) -> Result<Self, ValidationError> {
        if symbols.is_empty() {
            return Err(ValidationError::EmptyTickerList);
        }
        Ok(Self {
            symbols,
            range,
            benchmark,
        })
    }

    /// Validate raw form input.
    ///
    /// Dates are checked before tickers so a missing date is reported first,
    /// the same order the input form presents them.
    pub fn parse(
        tickers: &str,
        start: &str,
        end: &str,
        benchmark: &str,
    ) -> Result<Self, ValidationError> {
        let start = parse_date_field(start)?;
        let end = parse_date_field(end)?;
        let range = DateRange::new(start, end)?;
        let symbols = parse_ticker_list(tickers)?;
        let benchmark = Symbol::parse(benchmark)?;
        Self::new(symbols, range, benchmark)
    }
}
