//! Data source trait and request/error types.
//!
//! This module defines the adapter contract (`DataSource`) every price
//! provider implements. Adapters return one ticker at a time; assembling a
//! multi-ticker [`PriceTable`](crate::PriceTable) is the job of
//! [`fetch_prices`](crate::fetch::fetch_prices).
//!
//! # Endpoints
//!
//! | Method | Request | Response | Description |
//! |--------|---------|----------|-------------|
//! | `history` | [`HistoryRequest`] | [`PriceSeries`] | Daily closes over a date range |
//! | `latest_close` | [`Symbol`] | [`PriceObservation`] | Most recent daily close |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{DateRange, PriceObservation, PriceSeries, ProviderId, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    NoData,
    Internal,
}

/// Structured source error reported per ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn no_data(symbol: &Symbol) -> Self {
        Self {
            kind: SourceErrorKind::NoData,
            message: format!("no data found for ticker: {symbol}"),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::NoData => "source.no_data",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub range: DateRange,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, range: DateRange) -> Self {
        Self { symbol, range }
    }
}

/// Boxed future returned by [`DataSource`] methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Price source adapter contract.
///
/// Implementations must be `Send + Sync` so one adapter can back a whole
/// session; calls are still issued one at a time.
pub trait DataSource: Send + Sync {
    /// Returns the unique provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches daily closes for one symbol over `[range.start, range.end)`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if:
    /// - The provider is unreachable or answers with an error status
    /// - The symbol is unknown or has no rows in the range (`NoData`)
    /// - The response cannot be parsed
    fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, PriceSeries>;

    /// Fetches the most recent daily close for one symbol.
    ///
    /// # Errors
    ///
    /// Same classification as [`history`](DataSource::history).
    fn latest_close<'a>(&'a self, symbol: Symbol) -> SourceFuture<'a, PriceObservation>;
}
