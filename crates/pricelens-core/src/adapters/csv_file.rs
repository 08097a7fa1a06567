use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::data_source::{DataSource, HistoryRequest, SourceError, SourceFuture};
use crate::{PriceObservation, PriceSeries, ProviderId, Symbol, TradingDate};

const DATE_COLUMN: &str = "date";
const TICKER_COLUMN: &str = "ticker";
const CLOSE_COLUMN: &str = "close";

/// Long-format CSV price file (`Date,Ticker,Close`) served as a data source.
///
/// The file is read once when the source is opened. Rows whose date, ticker
/// or close cannot be parsed are dropped.
#[derive(Debug, Clone, Default)]
pub struct CsvSource {
    observations: Vec<PriceObservation>,
    dropped_rows: usize,
}

impl CsvSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            SourceError::unavailable(format!("failed to open CSV '{}': {e}", path.display()))
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| SourceError::invalid_request(format!("failed to read CSV headers: {e}")))?
            .clone();
        let columns = ColumnMap::resolve(&headers)?;

        let mut observations = Vec::new();
        let mut dropped_rows = 0usize;
        for (index, result) in reader.records().enumerate() {
            // Line numbers are 1-based and the header occupies line 1.
            let line = index + 2;
            let parsed = result
                .map_err(|e| e.to_string())
                .and_then(|record| columns.parse_row(&record));
            match parsed {
                Ok(observation) => observations.push(observation),
                Err(reason) => {
                    debug!(line, reason = %reason, "dropping CSV row");
                    dropped_rows += 1;
                }
            }
        }

        debug!(
            rows = observations.len(),
            dropped = dropped_rows,
            "loaded CSV price file"
        );
        Ok(Self {
            observations,
            dropped_rows,
        })
    }

    /// Number of rows skipped because they could not be parsed.
    pub const fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    fn series_for(&self, symbol: &Symbol) -> PriceSeries {
        PriceSeries::from_observations(symbol.clone(), &self.observations)
    }
}

impl DataSource for CsvSource {
    fn id(&self) -> ProviderId {
        ProviderId::Csv
    }

    fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, PriceSeries> {
        Box::pin(async move {
            let points = self
                .series_for(&req.symbol)
                .points()
                .iter()
                .filter(|point| req.range.contains(point.date))
                .copied()
                .collect::<Vec<_>>();
            if points.is_empty() {
                return Err(SourceError::no_data(&req.symbol));
            }
            Ok(PriceSeries::new(req.symbol, points))
        })
    }

    fn latest_close<'a>(&'a self, symbol: Symbol) -> SourceFuture<'a, PriceObservation> {
        Box::pin(async move {
            let series = self.series_for(&symbol);
            let point = series
                .last()
                .copied()
                .ok_or_else(|| SourceError::no_data(&symbol))?;
            Ok(PriceObservation {
                date: point.date,
                symbol,
                close: point.close,
            })
        })
    }
}

struct ColumnMap {
    date: usize,
    ticker: usize,
    close: usize,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self, SourceError> {
        let by_name: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(index, name)| (name.trim().to_ascii_lowercase(), index))
            .collect();

        let column = |name: &str| {
            by_name.get(name).copied().ok_or_else(|| {
                SourceError::invalid_request(format!("CSV is missing required column '{name}'"))
            })
        };

        Ok(Self {
            date: column(DATE_COLUMN)?,
            ticker: column(TICKER_COLUMN)?,
            close: column(CLOSE_COLUMN)?,
        })
    }

    fn parse_row(&self, record: &StringRecord) -> Result<PriceObservation, String> {
        let field = |index: usize, name: &str| {
            record
                .get(index)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| format!("missing {name}"))
        };

        let raw_date = field(self.date, DATE_COLUMN)?;
        let date = TradingDate::parse_lenient(raw_date)
            .ok_or_else(|| format!("unparseable date '{raw_date}'"))?;
        let symbol = Symbol::parse(field(self.ticker, TICKER_COLUMN)?).map_err(|e| e.to_string())?;
        let raw_close = field(self.close, CLOSE_COLUMN)?;
        let close = raw_close
            .parse::<f64>()
            .map_err(|_| format!("unparseable close '{raw_close}'"))?;

        PriceObservation::new(date, symbol, close).map_err(|e| e.to_string())
    }
}
