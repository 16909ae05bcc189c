use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::warn;

use crate::external::provider::{BarProvider, ExternalDailyBar, OutputSize, ProviderError};

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
const TIMEOUT: Duration = Duration::from_secs(30);

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageProvider {
    /// A missing key is tolerated: calls go out with an empty key and the
    /// upstream rejects them, which the ingestion path treats as any other
    /// per-symbol failure.
    pub fn from_env() -> Self {
        let api_key = std::env::var("ALPHAVANTAGE_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            warn!("ALPHAVANTAGE_API_KEY not set; equity price updates will fail");
        }

        let base_url = std::env::var("ALPHAVANTAGE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AvDailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, AvDailyBar>>,

    // When rate-limited Alpha Vantage returns:
    // { "Note": "Thank you for using Alpha Vantage! ... 5 calls per minute ..." }
    #[serde(rename = "Note")]
    note: Option<String>,

    // When invalid:
    // { "Error Message": "Invalid API call. ..." }
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AvDailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. adjusted close")]
    adjusted_close: Option<String>,
    #[serde(rename = "6. volume")]
    volume: String,
    #[serde(rename = "7. dividend amount")]
    dividend: Option<String>,
    #[serde(rename = "8. split coefficient")]
    split_coefficient: Option<String>,
}

fn parse_field(raw: &str, field: &str, date: &str) -> Result<f64, ProviderError> {
    raw.parse::<f64>()
        .map_err(|e| ProviderError::Parse(format!("{} on {}: {}", field, date, e)))
}

/// Turn a raw payload into bars sorted oldest-first. Error markers take
/// precedence over whatever else the body carries.
fn parse_daily_response(body: AvDailyResponse) -> Result<Vec<ExternalDailyBar>, ProviderError> {
    if body.note.is_some() {
        return Err(ProviderError::RateLimited);
    }

    if let Some(msg) = body.error_message {
        return Err(ProviderError::BadResponse(msg));
    }

    let series = body
        .time_series
        .ok_or_else(|| ProviderError::BadResponse("missing time series".into()))?;

    // BTreeMap is keyed by "YYYY-MM-DD", so iteration is already ascending.
    let mut out: Vec<ExternalDailyBar> = Vec::with_capacity(series.len());

    for (date_str, bar) in series {
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let close = parse_field(&bar.close, "close", &date_str)?;
        let adjusted_close = match &bar.adjusted_close {
            Some(raw) => parse_field(raw, "adjusted close", &date_str)?,
            None => close,
        };
        let dividend = match &bar.dividend {
            Some(raw) => parse_field(raw, "dividend amount", &date_str)?,
            None => 0.0,
        };
        let split_ratio = match &bar.split_coefficient {
            Some(raw) => parse_field(raw, "split coefficient", &date_str)?,
            None => 1.0,
        };

        out.push(ExternalDailyBar {
            date,
            open: parse_field(&bar.open, "open", &date_str)?,
            high: parse_field(&bar.high, "high", &date_str)?,
            low: parse_field(&bar.low, "low", &date_str)?,
            close,
            adjusted_close,
            volume: parse_field(&bar.volume, "volume", &date_str)? as i64,
            dividend,
            split_ratio,
        });
    }

    Ok(out)
}

#[async_trait]
impl BarProvider for AlphaVantageProvider {
    async fn fetch_daily_series(
        &self,
        symbol: &str,
        output: OutputSize,
    ) -> Result<Vec<ExternalDailyBar>, ProviderError> {
        let resp = self
            .client
            .get(&self.base_url)
            .timeout(TIMEOUT)
            .header(reqwest::header::USER_AGENT, "pulso-dashboard/1.0")
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("function", "TIME_SERIES_DAILY_ADJUSTED"),
                ("symbol", symbol),
                ("outputsize", output.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ProviderError::BadResponse(format!(
                "HTTP {} for {}",
                resp.status(),
                symbol
            )));
        }

        let body = resp
            .json::<AvDailyResponse>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        parse_daily_response(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> AvDailyResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn parses_adjusted_daily_series_oldest_first() {
        let body = r#"{
            "Meta Data": {"2. Symbol": "AAPL"},
            "Time Series (Daily)": {
                "2025-06-03": {
                    "1. open": "201.35", "2. high": "203.77", "3. low": "200.96",
                    "4. close": "203.27", "5. adjusted close": "203.27",
                    "6. volume": "46381600", "7. dividend amount": "0.0000",
                    "8. split coefficient": "1.0"
                },
                "2025-06-02": {
                    "1. open": "200.28", "2. high": "202.13", "3. low": "200.12",
                    "4. close": "201.70", "5. adjusted close": "201.70",
                    "6. volume": "35423300", "7. dividend amount": "0.0000",
                    "8. split coefficient": "1.0"
                }
            }
        }"#;

        let bars = parse_daily_response(response(body)).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
        assert!((bars[1].close - 203.27).abs() < 1e-9);
        assert_eq!(bars[1].volume, 46_381_600);
    }

    #[test]
    fn missing_adjusted_fields_fall_back() {
        let body = r#"{
            "Time Series (Daily)": {
                "2025-06-02": {
                    "1. open": "100.0", "2. high": "101.0", "3. low": "99.0",
                    "4. close": "100.5", "6. volume": "1000"
                }
            }
        }"#;

        let bars = parse_daily_response(response(body)).unwrap();
        assert!((bars[0].adjusted_close - 100.5).abs() < 1e-9);
        assert_eq!(bars[0].dividend, 0.0);
        assert_eq!(bars[0].split_ratio, 1.0);
    }

    #[test]
    fn rate_limit_note_is_rejected() {
        let body = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#;
        let err = parse_daily_response(response(body)).unwrap_err();
        assert!(matches!(err, ProviderError::RateLimited));
    }

    #[test]
    fn explicit_error_marker_is_rejected() {
        let body = r#"{"Error Message": "Invalid API call."}"#;
        let err = parse_daily_response(response(body)).unwrap_err();
        assert!(matches!(err, ProviderError::BadResponse(_)));
    }

    #[test]
    fn body_without_series_is_rejected() {
        let err = parse_daily_response(response("{}")).unwrap_err();
        assert!(matches!(err, ProviderError::BadResponse(_)));
    }
}
