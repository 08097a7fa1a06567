//! Market beta via single-regressor ordinary least squares.
//!
//! Beta measures a ticker's sensitivity to the benchmark:
//! `beta = Cov(ticker, benchmark) / Var(benchmark)` over daily returns that
//! share a trading date. Each ticker is estimated independently, so one
//! degenerate ticker never aborts the batch.

use serde::Serialize;
use tracing::debug;

use super::returns::ReturnSeries;
use crate::{Symbol, TradingDate};

/// Why a beta could not be estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UndefinedReason {
    /// Fewer than two dates with a finite return on both sides.
    InsufficientOverlap { observations: usize },
    /// Zero-variance benchmark returns or a non-finite slope.
    DegenerateRegression,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BetaEstimate {
    Defined {
        beta: f64,
        alpha: f64,
        observations: usize,
    },
    Undefined {
        reason: UndefinedReason,
    },
}

impl BetaEstimate {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Defined { beta, .. } => Some(*beta),
            Self::Undefined { .. } => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerBeta {
    pub symbol: Symbol,
    #[serde(flatten)]
    pub estimate: BetaEstimate,
}

/// Beta estimates for a batch of tickers against one benchmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetaResult {
    pub benchmark: Symbol,
    pub estimates: Vec<TickerBeta>,
}

impl BetaResult {
    pub fn get(&self, symbol: &Symbol) -> Option<&BetaEstimate> {
        self.estimates
            .iter()
            .find(|entry| &entry.symbol == symbol)
            .map(|entry| &entry.estimate)
    }
}

/// Regress one ticker's daily returns on the benchmark's.
pub fn compute_beta(ticker: &ReturnSeries, benchmark: &ReturnSeries) -> BetaEstimate {
    let (x, y) = align_returns(benchmark, ticker);
    let n = x.len();
    if n < 2 {
        return BetaEstimate::Undefined {
            reason: UndefinedReason::InsufficientOverlap { observations: n },
        };
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in x.iter().zip(&y) {
        let dx = xi - mean_x;
        sxx += dx * dx;
        sxy += dx * (yi - mean_y);
    }

    if sxx == 0.0 {
        return BetaEstimate::Undefined {
            reason: UndefinedReason::DegenerateRegression,
        };
    }
    let beta = sxy / sxx;
    let alpha = mean_y - beta * mean_x;
    if !beta.is_finite() || !alpha.is_finite() {
        return BetaEstimate::Undefined {
            reason: UndefinedReason::DegenerateRegression,
        };
    }

    BetaEstimate::Defined {
        beta,
        alpha,
        observations: n,
    }
}

/// Estimate beta for every ticker against the benchmark.
pub fn compute_betas(tickers: &[ReturnSeries], benchmark: &ReturnSeries) -> BetaResult {
    let estimates = tickers
        .iter()
        .map(|ticker| {
            let estimate = compute_beta(ticker, benchmark);
            match estimate {
                BetaEstimate::Defined {
                    beta, observations, ..
                } => debug!(symbol = %ticker.symbol, beta, observations, "beta estimated"),
                BetaEstimate::Undefined { reason } => {
                    debug!(symbol = %ticker.symbol, ?reason, "beta undefined")
                }
            }
            TickerBeta {
                symbol: ticker.symbol.clone(),
                estimate,
            }
        })
        .collect();

    BetaResult {
        benchmark: benchmark.symbol.clone(),
        estimates,
    }
}

/// Inner join on trading date, keeping rows where both returns are finite.
fn align_returns(benchmark: &ReturnSeries, ticker: &ReturnSeries) -> (Vec<f64>, Vec<f64>) {
    let bench: Vec<(TradingDate, f64)> = benchmark.daily_returns().collect();
    let own: Vec<(TradingDate, f64)> = ticker.daily_returns().collect();

    let mut x = Vec::new();
    let mut y = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < bench.len() && j < own.len() {
        let (bench_date, bench_return) = bench[i];
        let (own_date, own_return) = own[j];
        match bench_date.cmp(&own_date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                if bench_return.is_finite() && own_return.is_finite() {
                    x.push(bench_return);
                    y.push(own_return);
                }
                i += 1;
                j += 1;
            }
        }
    }
    (x, y)
}
