use serde::Serialize;

use crate::{PriceSeries, PriceTable, Symbol, TradingDate};

/// One row of a [`ReturnSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnPoint {
    pub date: TradingDate,
    pub close: f64,
    /// `close[i] / close[i-1] - 1`; absent on the first row.
    pub daily_return: Option<f64>,
    /// Compounded daily returns up to this row, minus one.
    pub cumulative_return: Option<f64>,
}

/// Daily and cumulative returns for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries {
    pub symbol: Symbol,
    pub points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    /// Dates and values of every defined daily return.
    pub fn daily_returns(&self) -> impl Iterator<Item = (TradingDate, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|point| point.daily_return.map(|value| (point.date, value)))
    }

    /// Cumulative return at the last row, if any return is defined.
    pub fn total_return(&self) -> Option<f64> {
        self.points.last().and_then(|point| point.cumulative_return)
    }
}

/// Derive daily and cumulative returns from a price series.
///
/// A return whose previous close is zero is left undefined and does not
/// contribute to the cumulative product.
pub fn compute_returns(series: &PriceSeries) -> ReturnSeries {
    let mut points = Vec::with_capacity(series.len());
    let mut previous: Option<f64> = None;
    let mut growth: Option<f64> = None;

    for point in series.points() {
        let daily_return = previous
            .map(|prev| point.close / prev - 1.0)
            .filter(|value| value.is_finite());
        if let Some(value) = daily_return {
            growth = Some(growth.unwrap_or(1.0) * (1.0 + value));
        }

        points.push(ReturnPoint {
            date: point.date,
            close: point.close,
            daily_return,
            cumulative_return: growth.map(|g| g - 1.0),
        });
        previous = Some(point.close);
    }

    ReturnSeries {
        symbol: series.symbol.clone(),
        points,
    }
}

/// Returns for every ticker in the table, restarted independently per ticker.
pub fn compute_table_returns(table: &PriceTable) -> Vec<ReturnSeries> {
    table.series().iter().map(compute_returns).collect()
}
