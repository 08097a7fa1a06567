use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::data_source::{DataSource, HistoryRequest, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{
    DateRange, PriceObservation, PricePoint, PriceSeries, ProviderId, Symbol, TradingDate,
};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart API adapter.
///
/// Daily bars are requested with `period1`/`period2` bounds. `period2` is the
/// end date at 00:00 UTC, so the end date itself is excluded.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
    adjusted: bool,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()))
    }
}

impl YahooAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            adjusted: true,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Use split/dividend adjusted closes when the response carries them.
    pub fn with_adjusted(mut self, adjusted: bool) -> Self {
        self.adjusted = adjusted;
        self
    }

    fn history_url(&self, req: &HistoryRequest) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history&includeAdjustedClose=true",
            self.base_url,
            urlencoding::encode(req.symbol.as_str()),
            req.range.start.unix_midnight_utc(),
            req.range.end.unix_midnight_utc(),
        )
    }

    fn latest_url(&self, symbol: &Symbol) -> String {
        format!(
            "{}/v8/finance/chart/{}?range=5d&interval=1d",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
        )
    }

    async fn fetch_chart(
        &self,
        symbol: &Symbol,
        url: String,
    ) -> Result<YahooChartResult, SourceError> {
        debug!(symbol = %symbol, url = %url, "requesting yahoo chart");
        let request = HttpRequest::get(url)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
        })?;

        parse_chart_response(symbol, &response)
    }
}

impl DataSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, PriceSeries> {
        Box::pin(async move {
            let url = self.history_url(&req);
            let result = self.fetch_chart(&req.symbol, url).await?;
            let series = chart_series(&req.symbol, &result, self.adjusted, Some(req.range));
            if series.is_empty() {
                return Err(SourceError::no_data(&req.symbol));
            }
            Ok(series)
        })
    }

    fn latest_close<'a>(&'a self, symbol: Symbol) -> SourceFuture<'a, PriceObservation> {
        Box::pin(async move {
            let url = self.latest_url(&symbol);
            let result = self.fetch_chart(&symbol, url).await?;

            // Latest close is the raw session close, not a back-adjusted one.
            let series = chart_series(&symbol, &result, false, None);
            if let Some(point) = series.last() {
                return PriceObservation::new(point.date, symbol.clone(), point.close)
                    .map_err(|e| SourceError::internal(e.to_string()));
            }

            match (result.meta.regular_market_price, result.meta.regular_market_time) {
                (Some(price), Some(time)) => {
                    let date = TradingDate::from_unix_timestamp(time, result.meta.gmtoffset)
                        .ok_or_else(|| SourceError::internal("invalid regularMarketTime"))?;
                    PriceObservation::new(date, symbol, price)
                        .map_err(|e| SourceError::internal(e.to_string()))
                }
                _ => Err(SourceError::no_data(&symbol)),
            }
        })
    }
}

fn parse_chart_response(
    symbol: &Symbol,
    response: &HttpResponse,
) -> Result<YahooChartResult, SourceError> {
    if response.status == 429 {
        return Err(SourceError::rate_limited("yahoo returned status 429"));
    }

    let parsed = serde_json::from_str::<YahooChartResponse>(&response.body);

    if !response.is_success() {
        if response.status == 404 {
            return Err(SourceError::no_data(symbol));
        }
        if let Ok(body) = &parsed {
            if let Some(error) = &body.chart.error {
                return Err(chart_error(symbol, error));
            }
        }
        return Err(SourceError::unavailable(format!(
            "yahoo returned status {}",
            response.status
        )));
    }

    let body = parsed
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = &body.chart.error {
        return Err(chart_error(symbol, error));
    }

    body.chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::no_data(symbol))
}

fn chart_error(symbol: &Symbol, error: &YahooChartError) -> SourceError {
    match error.code.as_str() {
        "Not Found" => SourceError::no_data(symbol),
        "Bad Request" => SourceError::invalid_request(format!(
            "yahoo rejected request for {symbol}: {}",
            error.description
        )),
        _ => SourceError::unavailable(format!(
            "yahoo chart API error: {} {}",
            error.code, error.description
        )),
    }
}

/// Convert a chart payload into a price series.
///
/// Timestamps are shifted by the exchange `gmtoffset` before the date is
/// taken. Bars with a null close, a bad timestamp, or a date outside `range`
/// are skipped.
fn chart_series(
    symbol: &Symbol,
    result: &YahooChartResult,
    adjusted: bool,
    range: Option<DateRange>,
) -> PriceSeries {
    let timestamps = result.timestamp.as_deref().unwrap_or_default();
    let raw_closes = result
        .indicators
        .quote
        .first()
        .map(|quote| quote.close.as_slice())
        .unwrap_or_default();
    let adjusted_closes = result
        .indicators
        .adjclose
        .first()
        .map(|adj| adj.adjclose.as_slice())
        .filter(|values| values.len() == timestamps.len());

    let closes = match adjusted_closes {
        Some(values) if adjusted => values,
        _ => raw_closes,
    };

    let mut points = Vec::with_capacity(timestamps.len());
    for (index, &ts) in timestamps.iter().enumerate() {
        let Some(date) = TradingDate::from_unix_timestamp(ts, result.meta.gmtoffset) else {
            debug!(symbol = %symbol, ts, "dropping bar with invalid timestamp");
            continue;
        };
        if range.is_some_and(|range| !range.contains(date)) {
            continue;
        }
        let Some(close) = closes.get(index).copied().flatten() else {
            continue;
        };
        if !close.is_finite() || close < 0.0 {
            debug!(symbol = %symbol, %date, close, "dropping bar with invalid close");
            continue;
        }
        points.push(PricePoint { date, close });
    }

    PriceSeries::new(symbol.clone(), points)
}

// Yahoo Finance chart API response structures
#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    meta: YahooChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    gmtoffset: i64,
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<f64>,
    #[serde(rename = "regularMarketTime", default)]
    regular_market_time: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Vec<YahooAdjClose>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
