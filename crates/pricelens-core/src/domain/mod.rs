//! # Domain Models
//!
//! Canonical domain types for pricelens price histories.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker symbol (`AAPL`, `^GSPC`) |
//! | [`TradingDate`] | Calendar date with time zone stripped |
//! | [`PriceObservation`] | `(date, ticker, close)` row |
//! | [`PriceSeries`] | Date-sorted, date-unique closes for one ticker |
//! | [`PriceTable`] | Uniform multi-ticker fetch result |
//! | [`DateRange`] | Half-open `[start, end)` request window |
//!
//! All types validate their invariants at construction time.

mod models;
mod symbol;
mod trading_date;

pub use models::{DateRange, PriceObservation, PricePoint, PriceSeries, PriceTable};
pub use symbol::Symbol;
pub use trading_date::TradingDate;
