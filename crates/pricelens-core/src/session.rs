//! Analysis session: the single owner of fetched data and derived results.
//!
//! Each successful [`AnalysisSession::fetch`] replaces the previous snapshot
//! wholesale. A failed fetch clears it, so views never mix data from two
//! different requests.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::analytics::{
    compute_betas, compute_returns, compute_table_returns, correlation_matrix, BetaResult,
    CorrelationMatrix, ReturnSeries,
};
use crate::data_source::{DataSource, HistoryRequest, SourceError};
use crate::fetch::{fetch_prices, FetchError, FetchReport};
use crate::input::AnalysisRequest;
use crate::{PriceTable, ProviderId, Symbol, TradingDate};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("please fetch stock data first to view {view}")]
    MissingPrerequisite { view: &'static str },
    #[error("betas could not be calculated: market data for {benchmark} could not be fetched")]
    BetasUnavailable { benchmark: Symbol },
}

/// Everything derived from one successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSnapshot {
    pub request: AnalysisRequest,
    pub report: FetchReport,
    pub returns: Vec<ReturnSeries>,
    pub correlations: CorrelationMatrix,
    pub betas: Option<BetaResult>,
    pub warnings: Vec<String>,
}

/// Most recent close for one ticker, or a no-data marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LatestClose {
    Price { date: TradingDate, close: f64 },
    NoData { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerLatest {
    pub symbol: Symbol,
    #[serde(flatten)]
    pub latest: LatestClose,
}

pub struct AnalysisSession {
    source: Arc<dyn DataSource>,
    snapshot: Option<AnalysisSnapshot>,
}

impl AnalysisSession {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            snapshot: None,
        }
    }

    pub fn source_id(&self) -> ProviderId {
        self.source.id()
    }

    /// Fetch tickers and the benchmark, then recompute every derived view.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Fetch`] when no ticker returned data. The
    /// previous snapshot is discarded in that case.
    pub async fn fetch(
        &mut self,
        request: &AnalysisRequest,
    ) -> Result<&AnalysisSnapshot, SessionError> {
        let report = match fetch_prices(self.source.as_ref(), &request.symbols, request.range).await {
            Ok(report) => report,
            Err(error) => {
                self.snapshot = None;
                return Err(error.into());
            }
        };

        let returns = compute_table_returns(&report.table);
        let correlations = correlation_matrix(&report.table);
        let mut warnings = report.warnings();

        let betas = match self.benchmark_returns(request, &report.table).await {
            Ok(benchmark) => Some(compute_betas(&returns, &benchmark)),
            Err(error) => {
                warn!(benchmark = %request.benchmark, error = %error, "benchmark fetch failed");
                warnings.push(format!(
                    "betas could not be calculated: market data for {} could not be fetched",
                    request.benchmark
                ));
                None
            }
        };

        info!(
            tickers = report.table.len(),
            failures = report.failures.len(),
            betas = betas.is_some(),
            "analysis snapshot updated"
        );

        Ok(self.snapshot.insert(AnalysisSnapshot {
            request: request.clone(),
            report,
            returns,
            correlations,
            betas,
            warnings,
        }))
    }

    pub fn snapshot(&self) -> Result<&AnalysisSnapshot, SessionError> {
        self.require("data")
    }

    pub fn prices(&self) -> Result<&PriceTable, SessionError> {
        self.require("prices").map(|snapshot| &snapshot.report.table)
    }

    pub fn returns(&self) -> Result<&[ReturnSeries], SessionError> {
        self.require("returns").map(|snapshot| snapshot.returns.as_slice())
    }

    pub fn correlations(&self) -> Result<&CorrelationMatrix, SessionError> {
        self.require("metrics").map(|snapshot| &snapshot.correlations)
    }

    pub fn betas(&self) -> Result<&BetaResult, SessionError> {
        let snapshot = self.require("betas")?;
        snapshot
            .betas
            .as_ref()
            .ok_or_else(|| SessionError::BetasUnavailable {
                benchmark: snapshot.request.benchmark.clone(),
            })
    }

    /// Latest close per symbol. A failure for one symbol never fails the batch.
    pub async fn latest_closes(&self, symbols: &[Symbol]) -> Vec<TickerLatest> {
        let mut closes = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let latest = match self.source.latest_close(symbol.clone()).await {
                Ok(observation) => LatestClose::Price {
                    date: observation.date,
                    close: observation.close,
                },
                Err(error) => {
                    warn!(symbol = %symbol, error = %error, "latest close unavailable");
                    LatestClose::NoData {
                        reason: error.message().to_owned(),
                    }
                }
            };
            closes.push(TickerLatest {
                symbol: symbol.clone(),
                latest,
            });
        }
        closes
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
    }

    fn require(&self, view: &'static str) -> Result<&AnalysisSnapshot, SessionError> {
        self.snapshot
            .as_ref()
            .ok_or(SessionError::MissingPrerequisite { view })
    }

    async fn benchmark_returns(
        &self,
        request: &AnalysisRequest,
        table: &PriceTable,
    ) -> Result<ReturnSeries, SourceError> {
        if let Some(series) = table.get(&request.benchmark) {
            return Ok(compute_returns(series));
        }
        let series = self
            .source
            .history(HistoryRequest::new(request.benchmark.clone(), request.range))
            .await?;
        Ok(compute_returns(&series))
    }
}
