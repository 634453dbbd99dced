//! Alpha Vantage market data adapter.
//!
//! Fetches the full `TIME_SERIES_DAILY` history for a symbol with bounded
//! retries on network errors and a longer wait when the API reports its rate
//! limit. Malformed rows are dropped here so the core never sees them.

use crate::domain::error::FincrossError;
use crate::domain::price::DailyBar;
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

pub struct AlphaVantageAdapter {
    client: Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
    rate_limit_wait: Duration,
}

impl AlphaVantageAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, FincrossError> {
        let api_key =
            config
                .get_string("fetch", "api_key")
                .ok_or_else(|| FincrossError::ConfigMissing {
                    section: "fetch".into(),
                    key: "api_key".into(),
                })?;

        let base_url = config
            .get_string("fetch", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let max_retries = config.get_int("fetch", "max_retries", 3).max(1) as u32;
        let retry_delay = Duration::from_secs(config.get_int("fetch", "retry_delay_secs", 5) as u64);
        let rate_limit_wait =
            Duration::from_secs(config.get_int("fetch", "rate_limit_wait_secs", 60) as u64);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                FincrossError::Io(std::io::Error::other(format!(
                    "failed to build http client: {e}"
                )))
            })?;

        Ok(Self {
            client,
            api_key,
            base_url,
            max_retries,
            retry_delay,
            rate_limit_wait,
        })
    }

    fn request_url(&self, symbol: &str) -> String {
        format!(
            "{}/query?function=TIME_SERIES_DAILY&symbol={}&outputsize=full&apikey={}",
            self.base_url.trim_end_matches('/'),
            symbol,
            self.api_key
        )
    }
}

impl MarketDataPort for AlphaVantageAdapter {
    fn fetch_daily_history(&self, symbol: &str) -> Result<Vec<DailyBar>, FincrossError> {
        let url = self.request_url(symbol);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let body = match self
                .client
                .get(&url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.text())
            {
                Ok(body) => body,
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(FincrossError::Fetch {
                            symbol: symbol.to_string(),
                            reason: e.to_string(),
                        });
                    }
                    thread::sleep(self.retry_delay);
                    continue;
                }
            };

            match classify_response(symbol, &body)? {
                DailyPayload::RateLimited => {
                    if attempt >= self.max_retries {
                        return Err(FincrossError::RateLimited {
                            symbol: symbol.to_string(),
                            attempts: attempt,
                        });
                    }
                    thread::sleep(self.rate_limit_wait);
                }
                DailyPayload::Series { bars, skipped } => {
                    if skipped > 0 {
                        eprintln!("warning: skipped {skipped} malformed rows for {symbol}");
                    }
                    return Ok(bars);
                }
            }
        }
    }
}

#[derive(Debug)]
pub enum DailyPayload {
    Series { bars: Vec<DailyBar>, skipped: usize },
    RateLimited,
}

#[derive(Deserialize)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, RawDailyRow>>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct RawDailyRow {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Classify a raw response body: a rate-limit note, an API error, or the
/// daily series itself. Rows with unparseable dates or numbers, or negative
/// prices, are counted and dropped.
pub fn classify_response(symbol: &str, body: &str) -> Result<DailyPayload, FincrossError> {
    let response: DailyResponse =
        serde_json::from_str(body).map_err(|e| FincrossError::Fetch {
            symbol: symbol.to_string(),
            reason: format!("invalid response body: {e}"),
        })?;

    if response.note.is_some() {
        return Ok(DailyPayload::RateLimited);
    }
    if let Some(message) = response.error_message {
        return Err(FincrossError::Fetch {
            symbol: symbol.to_string(),
            reason: message,
        });
    }

    let Some(time_series) = response.time_series else {
        return Err(FincrossError::Fetch {
            symbol: symbol.to_string(),
            reason: "response contains no daily time series".into(),
        });
    };

    let mut bars = Vec::with_capacity(time_series.len());
    let mut skipped = 0;

    // BTreeMap keys are YYYY-MM-DD strings, so iteration is date-ascending.
    for (date_str, row) in &time_series {
        match parse_row(symbol, date_str, row) {
            Some(bar) => bars.push(bar),
            None => skipped += 1,
        }
    }

    Ok(DailyPayload::Series { bars, skipped })
}

fn parse_row(symbol: &str, date_str: &str, row: &RawDailyRow) -> Option<DailyBar> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
    let open: f64 = row.open.parse().ok()?;
    let high: f64 = row.high.parse().ok()?;
    let low: f64 = row.low.parse().ok()?;
    let close: f64 = row.close.parse().ok()?;
    let volume: i64 = row.volume.parse().ok()?;

    if open < 0.0 || high < 0.0 || low < 0.0 || close < 0.0 {
        return None;
    }

    Some(DailyBar {
        symbol: symbol.to_string(),
        date,
        open,
        high,
        low,
        close,
        volume,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, close: &str) -> String {
        format!(
            r#""{date}": {{
                "1. open": "100.0",
                "2. high": "110.0",
                "3. low": "90.0",
                "4. close": "{close}",
                "5. volume": "50000"
            }}"#
        )
    }

    #[test]
    fn parses_daily_series_sorted_ascending() {
        let body = format!(
            r#"{{"Time Series (Daily)": {{ {}, {} }}}}"#,
            row("2024-01-16", "106.0"),
            row("2024-01-15", "105.0"),
        );

        match classify_response("AAPL", &body).unwrap() {
            DailyPayload::Series { bars, skipped } => {
                assert_eq!(skipped, 0);
                assert_eq!(bars.len(), 2);
                assert_eq!(
                    bars[0].date,
                    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
                );
                assert!((bars[0].close - 105.0).abs() < f64::EPSILON);
                assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
                assert_eq!(bars[0].symbol, "AAPL");
            }
            other => panic!("expected series, got {other:?}"),
        }
    }

    #[test]
    fn rate_limit_note_detected() {
        let body = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#;
        assert!(matches!(
            classify_response("AAPL", body).unwrap(),
            DailyPayload::RateLimited
        ));
    }

    #[test]
    fn api_error_message_surfaces_as_fetch_error() {
        let body = r#"{"Error Message": "Invalid API call."}"#;
        let err = classify_response("ZZZZ", body).unwrap_err();
        match err {
            FincrossError::Fetch { symbol, reason } => {
                assert_eq!(symbol, "ZZZZ");
                assert_eq!(reason, "Invalid API call.");
            }
            other => panic!("expected Fetch, got {other}"),
        }
    }

    #[test]
    fn malformed_rows_are_counted_and_dropped() {
        let body = format!(
            r#"{{"Time Series (Daily)": {{
                {},
                "not-a-date": {{
                    "1. open": "1", "2. high": "1", "3. low": "1",
                    "4. close": "1", "5. volume": "1"
                }},
                "2024-01-17": {{
                    "1. open": "abc", "2. high": "1", "3. low": "1",
                    "4. close": "1", "5. volume": "1"
                }},
                "2024-01-18": {{
                    "1. open": "1", "2. high": "1", "3. low": "1",
                    "4. close": "-5.0", "5. volume": "1"
                }}
            }}}}"#,
            row("2024-01-15", "105.0"),
        );

        match classify_response("AAPL", &body).unwrap() {
            DailyPayload::Series { bars, skipped } => {
                assert_eq!(bars.len(), 1);
                assert_eq!(skipped, 3);
            }
            other => panic!("expected series, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_a_fetch_error() {
        let err = classify_response("AAPL", "<html>service down</html>").unwrap_err();
        assert!(matches!(err, FincrossError::Fetch { .. }));
    }

    #[test]
    fn missing_series_key_is_a_fetch_error() {
        let err = classify_response("AAPL", "{}").unwrap_err();
        match err {
            FincrossError::Fetch { reason, .. } => {
                assert!(reason.contains("no daily time series"));
            }
            other => panic!("expected Fetch, got {other}"),
        }
    }
}
