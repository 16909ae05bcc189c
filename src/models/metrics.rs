use chrono::NaiveDate;
use serde::Serialize;

/// Derived per-instrument metrics over a lookback window.
/// Everything here is recomputable from stored price bars.
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentMetrics {
    pub symbol: String,
    pub name: String,
    pub last_close: f64,
    /// (last close - first close) / first close, in percent.
    pub period_return_pct: f64,
    /// Sample stdev of daily returns, annualized with sqrt(252).
    pub annualized_volatility: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub avg_volume: f64,
    /// Rolling 20-sample mean of closes; absent for series shorter than 20.
    pub sma20: Option<f64>,
    pub days_analyzed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonPoint {
    pub date: NaiveDate,
    /// Close rescaled so the first observation of the series is 100.
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSeries {
    pub symbol: String,
    pub points: Vec<ComparisonPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    pub symbol: String,
    pub quote_kind: String,
    pub days: i64,
    pub common_dates: usize,
    /// Pearson correlation over the common date set; `None` when fewer
    /// than 5 dates overlap (unavailable, never reported as 0).
    pub correlation: Option<f64>,
}
