use serde::{Deserialize, Serialize};

use crate::{Symbol, TradingDate, ValidationError};

/// One closing price for one ticker on one trading date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: TradingDate,
    pub symbol: Symbol,
    pub close: f64,
}

impl PriceObservation {
    pub fn new(date: TradingDate, symbol: Symbol, close: f64) -> Result<Self, ValidationError> {
        validate_non_negative("close", close)?;
        Ok(Self {
            date,
            symbol,
            close,
        })
    }
}

/// Half-open calendar range `[start, end)` used for history requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: TradingDate,
    pub end: TradingDate,
}

impl DateRange {
    pub fn new(start: TradingDate, end: TradingDate) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: TradingDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Date point inside a [`PriceSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: TradingDate,
    pub close: f64,
}

/// Closing prices for one ticker, sorted ascending by date with unique dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from points in any order.
    ///
    /// When a date appears more than once the last point supplied wins.
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Self {
        let mut points = points;
        // Stable sort keeps input order among equal dates, so the dedup below
        // can retain the last occurrence.
        points.sort_by_key(|point| point.date);
        let mut unique: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match unique.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => unique.push(point),
            }
        }

        Self {
            symbol,
            points: unique,
        }
    }

    /// Build a series from observations, ignoring any whose ticker differs.
    pub fn from_observations(symbol: Symbol, observations: &[PriceObservation]) -> Self {
        let points = observations
            .iter()
            .filter(|observation| observation.symbol == symbol)
            .map(|observation| PricePoint {
                date: observation.date,
                close: observation.close,
            })
            .collect();
        Self::new(symbol, points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.close)
    }
}

/// Uniform fetch result: one series per ticker in request order.
///
/// Single-ticker and multi-ticker fetches produce the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    series: Vec<PriceSeries>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series, replacing any existing series for the same ticker.
    pub fn insert(&mut self, series: PriceSeries) {
        match self
            .series
            .iter_mut()
            .find(|existing| existing.symbol == series.symbol)
        {
            Some(existing) => *existing = series,
            None => self.series.push(series),
        }
    }

    pub fn series(&self) -> &[PriceSeries] {
        &self.series
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&PriceSeries> {
        self.series.iter().find(|series| &series.symbol == symbol)
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.series.iter().map(|series| series.symbol.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total number of observations across all tickers.
    pub fn observation_count(&self) -> usize {
        self.series.iter().map(PriceSeries::len).sum()
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
