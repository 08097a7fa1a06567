//! # Pricelens Core
//!
//! Price history contracts, provider adapters, and return/risk analytics for
//! the pricelens toolkit.
//!
//! ## Overview
//!
//! - **Domain models** for tickers, trading dates and price tables
//! - **Input validation** for ticker lists and date ranges
//! - **Data source trait** with Yahoo Finance and CSV adapters
//! - **Analytics**: daily/cumulative returns, Pearson correlation, OLS beta
//! - **Analysis session** owning the most recent dataset
//! - **Response envelope** for machine-readable output
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Yahoo chart API and CSV file adapters |
//! | [`analytics`] | Returns, correlation matrix, beta regression |
//! | [`data_source`] | Data source trait and request/error types |
//! | [`domain`] | Domain models (Symbol, TradingDate, PriceTable) |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`fetch`] | Multi-ticker fetch with per-ticker failures |
//! | [`http_client`] | HTTP client abstraction |
//! | [`input`] | Ticker list and date validation |
//! | [`session`] | Replace-on-write analysis state |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pricelens_core::{AnalysisRequest, AnalysisSession, YahooAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = AnalysisRequest::parse("AAPL, MSFT", "2023-01-01", "2023-12-01", "^GSPC")?;
//!     let mut session = AnalysisSession::new(Arc::new(YahooAdapter::default()));
//!
//!     let snapshot = session.fetch(&request).await?;
//!     for warning in &snapshot.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//!     if let Some(betas) = &snapshot.betas {
//!         for entry in &betas.estimates {
//!             println!("{}: {:?}", entry.symbol, entry.estimate.value());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────┐
//! │  Input          │  AnalysisRequest::parse
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  fetch_prices   │────▶│ DataSource       │
//! └────────┬────────┘     │ (Yahoo / CSV)    │
//!          │              └──────────────────┘
//!          ▼
//! ┌─────────────────┐
//! │  PriceTable     │
//! └────────┬────────┘
//!          ├──────────────┬──────────────┐
//!          ▼              ▼              ▼
//!      returns      correlation        beta
//! ```

pub mod adapters;
pub mod analytics;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod fetch;
pub mod http_client;
pub mod input;
pub mod session;
pub mod source;

// Adapter implementations
pub use adapters::{CsvSource, YahooAdapter};

// Analytics
pub use analytics::{
    compute_beta, compute_betas, compute_returns, compute_table_returns, correlation_matrix,
    pearson, BetaEstimate, BetaResult, CorrelationMatrix, ReturnPoint, ReturnSeries, TickerBeta,
    UndefinedReason,
};

// Data source trait and types
pub use data_source::{DataSource, HistoryRequest, SourceError, SourceErrorKind, SourceFuture};

// Domain models
pub use domain::{DateRange, PriceObservation, PricePoint, PriceSeries, PriceTable, Symbol, TradingDate};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

// Error types
pub use error::{CoreError, ValidationError};

// Fetching
pub use fetch::{fetch_prices, FetchError, FetchReport, TickerFailure};

// HTTP client types
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Input validation
pub use input::{parse_ticker_list, split_ticker_list, AnalysisRequest, DEFAULT_BENCHMARK};

// Session
pub use session::{AnalysisSession, AnalysisSnapshot, LatestClose, SessionError, TickerLatest};

// Source identifiers
pub use source::ProviderId;
