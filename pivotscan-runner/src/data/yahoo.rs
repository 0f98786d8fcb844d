//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API with bounded retries
//! and exponential backoff. OHLC columns are scaled by the adjusted-close
//! ratio so the engine always sees split/dividend-adjusted prices.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; parse failures surface as `DataError::ResponseFormatChanged`.

use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

use super::provider::{DataError, DataProvider, RawBar};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let end_ts = end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true"
        )
    }

    /// Parse the chart API response into adjusted RawBars.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<RawBar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let n = timestamps.len();
        let mut bars = Vec::with_capacity(n);

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let row = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
                quote.volume.get(i).copied().flatten(),
            );

            // Skip rows with any missing OHLCV (holidays, halted sessions).
            let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = row else {
                continue;
            };

            // Scale OHLC to the adjusted close so downstream indicators see
            // split/dividend-adjusted history.
            let factor = adj_closes
                .as_ref()
                .and_then(|v| v.get(i).copied().flatten())
                .filter(|adj| adj.is_finite() && close > 0.0 && *adj > 0.0)
                .map(|adj| adj / close)
                .unwrap_or(1.0);

            bars.push(RawBar {
                date,
                open: open * factor,
                high: high * factor,
                low: low * factor,
                close: close * factor,
                volume,
            });
        }

        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(bars)
    }

    /// Execute a single HTTP request with retry logic.
    fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, DataError> {
        let url = Self::chart_url(symbol, start, end);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                std::thread::sleep(delay);
            }

            match self.client.get(&url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(DataError::SymbolNotFound {
                            symbol: symbol.to_string(),
                        });
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(DataError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if !status.is_success() {
                        last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                        continue;
                    }

                    let chart: ChartResponse = resp.json().map_err(|e| {
                        DataError::ResponseFormatChanged(format!(
                            "failed to parse response for {symbol}: {e}"
                        ))
                    })?;

                    return Self::parse_response(symbol, chart);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(DataError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| DataError::Other(format!("retries exhausted for {symbol}"))))
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, DataError> {
        self.fetch_with_retry(symbol, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_url_encodes_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let url = YahooProvider::chart_url("2330.TW", start, end);
        assert!(url.contains("/chart/2330.TW"));
        assert!(url.contains("interval=1d"));
        assert!(url.contains("period1="));
        assert!(url.contains("period2="));
    }

    #[test]
    fn parse_skips_missing_rows_and_adjusts() {
        let resp = ChartResponse {
            chart: ChartResult {
                result: Some(vec![ChartData {
                    timestamp: Some(vec![1_704_153_600, 1_704_240_000, 1_704_326_400]),
                    indicators: Indicators {
                        quote: vec![QuoteData {
                            open: vec![Some(100.0), None, Some(102.0)],
                            high: vec![Some(110.0), None, Some(112.0)],
                            low: vec![Some(95.0), None, Some(98.0)],
                            close: vec![Some(105.0), None, Some(110.0)],
                            volume: vec![Some(1000), None, Some(2000)],
                        }],
                        adjclose: Some(vec![AdjCloseData {
                            adjclose: vec![Some(52.5), None, Some(110.0)],
                        }]),
                    },
                }]),
                error: None,
            },
        };

        let bars = YahooProvider::parse_response("TEST", resp).unwrap();
        assert_eq!(bars.len(), 2); // middle row dropped

        // First row halved by the adjustment factor 52.5 / 105.
        assert!((bars[0].close - 52.5).abs() < 1e-9);
        assert!((bars[0].open - 50.0).abs() < 1e-9);
        assert!((bars[0].high - 55.0).abs() < 1e-9);
        assert_eq!(bars[0].volume, 1000);

        // Second row already at its adjusted price.
        assert!((bars[1].close - 110.0).abs() < 1e-9);
    }

    #[test]
    fn parse_maps_not_found() {
        let resp = ChartResponse {
            chart: ChartResult {
                result: None,
                error: Some(ChartError {
                    code: "Not Found".into(),
                    description: "No data found".into(),
                }),
            },
        };
        let err = YahooProvider::parse_response("NOPE.TW", resp).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn parse_empty_series_is_not_found() {
        let resp = ChartResponse {
            chart: ChartResult {
                result: Some(vec![ChartData {
                    timestamp: Some(vec![]),
                    indicators: Indicators {
                        quote: vec![QuoteData {
                            open: vec![],
                            high: vec![],
                            low: vec![],
                            close: vec![],
                            volume: vec![],
                        }],
                        adjclose: None,
                    },
                }]),
                error: None,
            },
        };
        let err = YahooProvider::parse_response("EMPTY.TW", resp).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }
}
