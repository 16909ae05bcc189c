use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// One upstream daily bar, parsed but not yet persisted.
#[derive(Debug, Clone)]
pub struct ExternalDailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: i64,
    pub dividend: f64,
    pub split_ratio: f64,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSize {
    /// Latest ~100 points.
    Compact,
    /// Full history (20+ years).
    Full,
}

impl OutputSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

#[async_trait]
pub trait BarProvider: Send + Sync {
    /// Fetch the daily time series for a symbol, oldest first.
    async fn fetch_daily_series(
        &self,
        symbol: &str,
        output: OutputSize,
    ) -> Result<Vec<ExternalDailyBar>, ProviderError>;
}
