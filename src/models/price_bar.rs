use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One day's OHLC + volume record for an instrument.
/// Unique per (instrument_id, date).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceBar {
    pub id: Uuid,
    pub instrument_id: Uuid,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: i64,
    pub dividend: f64,
    pub split_ratio: f64,
    pub updated_at: DateTime<Utc>,
}

impl PriceBar {
    /// Intraday return in percent. Defined as 0 when the open is not
    /// positive, so a bad upstream bar can never produce a division error.
    pub fn daily_return_pct(&self) -> f64 {
        if self.open > 0.0 {
            (self.close - self.open) / self.open * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open: f64, close: f64) -> PriceBar {
        PriceBar {
            id: Uuid::new_v4(),
            instrument_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            adjusted_close: close,
            volume: 1_000,
            dividend: 0.0,
            split_ratio: 1.0,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn daily_return_for_normal_bar() {
        assert!((bar(100.0, 102.0).daily_return_pct() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn daily_return_with_zero_open_is_zero() {
        assert_eq!(bar(0.0, 102.0).daily_return_pct(), 0.0);
    }
}
