//! Return, correlation and beta calculations.
//!
//! Every function here is pure: inputs are borrowed, results are returned.
//!
//! | Module | Output |
//! |--------|--------|
//! | [`returns`] | [`ReturnSeries`] per ticker |
//! | [`correlation`] | [`CorrelationMatrix`] over close prices |
//! | [`beta`] | [`BetaResult`] against a benchmark |

pub mod beta;
pub mod correlation;
pub mod returns;

pub use beta::{compute_beta, compute_betas, BetaEstimate, BetaResult, TickerBeta, UndefinedReason};
pub use correlation::{correlation_matrix, pearson, CorrelationMatrix};
pub use returns::{compute_returns, compute_table_returns, ReturnPoint, ReturnSeries};
