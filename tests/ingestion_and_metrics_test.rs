/// Ingestion & Metrics Property Tests
///
/// Behavioral properties of the market-data pipeline:
/// - natural-key upsert semantics (last write wins)
/// - daily-return and period-return edge cases
/// - correlation availability rules
/// - retention-pruning boundaries
/// - dashboard derived figures (variation, exchange gap)
///
/// NOTE: These tests validate the business rules over plain data; the
/// storage-backed paths enforce the same keys via UNIQUE constraints and
/// ON CONFLICT upserts against a live database.

// ---------------------------------------------------------------------------
// Upsert Semantics
// ---------------------------------------------------------------------------

#[cfg(test)]
mod upsert_semantics {
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq)]
    struct QuoteRow {
        buy: f64,
        sell: f64,
    }

    /// Insert-or-replace keyed by (kind, date), mirroring
    /// `INSERT ... ON CONFLICT (kind, date) DO UPDATE`.
    fn upsert(
        store: &mut HashMap<(String, String), QuoteRow>,
        kind: &str,
        date: &str,
        buy: f64,
        sell: f64,
    ) {
        store.insert((kind.to_string(), date.to_string()), QuoteRow { buy, sell });
    }

    #[test]
    fn second_upsert_for_same_key_leaves_one_row_with_latest_values() {
        let mut store = HashMap::new();

        upsert(&mut store, "blue", "2025-06-02", 1380.0, 1400.0);
        upsert(&mut store, "blue", "2025-06-02", 1385.0, 1405.0);

        assert_eq!(store.len(), 1);
        let row = &store[&("blue".to_string(), "2025-06-02".to_string())];
        assert_eq!(row.buy, 1385.0);
        assert_eq!(row.sell, 1405.0);
    }

    #[test]
    fn different_dates_produce_distinct_rows() {
        let mut store = HashMap::new();

        upsert(&mut store, "blue", "2025-06-02", 1380.0, 1400.0);
        upsert(&mut store, "blue", "2025-06-03", 1390.0, 1410.0);

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn different_kinds_on_one_date_produce_distinct_rows() {
        let mut store = HashMap::new();

        upsert(&mut store, "official", "2025-06-02", 1180.0, 1200.0);
        upsert(&mut store, "blue", "2025-06-02", 1380.0, 1400.0);

        assert_eq!(store.len(), 2);
    }
}

// ---------------------------------------------------------------------------
// Return Calculations
// ---------------------------------------------------------------------------

#[cfg(test)]
mod return_calculations {
    /// Daily return = (close - open) / open * 100, defined as 0 when the
    /// open is not positive.
    fn daily_return_pct(open: f64, close: f64) -> f64 {
        if open > 0.0 {
            (close - open) / open * 100.0
        } else {
            0.0
        }
    }

    /// Period return over a close series, first to last.
    fn period_return_pct(closes: &[f64]) -> f64 {
        match (closes.first(), closes.last()) {
            (Some(&first), Some(&last)) if first > 0.0 => (last - first) / first * 100.0,
            _ => 0.0,
        }
    }

    #[test]
    fn daily_return_with_zero_open_is_zero_not_an_error() {
        assert_eq!(daily_return_pct(0.0, 150.0), 0.0);
    }

    #[test]
    fn daily_return_with_negative_open_is_zero() {
        assert_eq!(daily_return_pct(-1.0, 150.0), 0.0);
    }

    #[test]
    fn three_day_synthetic_series_yields_21_percent() {
        // seeded AAPL, closes 100 -> 110 -> 121
        let closes = [100.0, 110.0, 121.0];
        assert!((period_return_pct(&closes) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn flat_series_yields_zero_percent() {
        let closes = [100.0, 100.0, 100.0];
        assert_eq!(period_return_pct(&closes), 0.0);
    }

    #[test]
    fn empty_series_yields_zero_percent() {
        assert_eq!(period_return_pct(&[]), 0.0);
    }
}

// ---------------------------------------------------------------------------
// Retention Pruning
// ---------------------------------------------------------------------------

#[cfg(test)]
mod retention_pruning {
    use chrono::{Duration, NaiveDate};

    /// Rows strictly older than the cutoff are pruned; the cutoff day
    /// itself survives.
    fn prune(rows: Vec<NaiveDate>, today: NaiveDate, days: i64) -> (Vec<NaiveDate>, usize) {
        let cutoff = today - Duration::days(days);
        let before = rows.len();
        let kept: Vec<NaiveDate> = rows.into_iter().filter(|d| *d >= cutoff).collect();
        let deleted = before - kept.len();
        (kept, deleted)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ninety_day_threshold_deletes_only_strictly_older_rows() {
        let today = date(2025, 6, 10);
        let cutoff = today - Duration::days(90); // 2025-03-12

        let rows = vec![
            cutoff - Duration::days(1), // prunable
            cutoff,                     // boundary, kept
            cutoff + Duration::days(1), // kept
            today,                      // kept
        ];

        let (kept, deleted) = prune(rows, today, 90);
        assert_eq!(deleted, 1);
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().all(|d| *d >= cutoff));
    }

    #[test]
    fn reported_count_matches_rows_removed() {
        let today = date(2025, 6, 10);
        let rows: Vec<NaiveDate> = (0..200).map(|i| today - Duration::days(i)).collect();

        let (kept, deleted) = prune(rows, today, 90);
        assert_eq!(deleted, 109); // days 91..=199
        assert_eq!(kept.len(), 91); // days 0..=90
    }

    #[test]
    fn pruning_an_empty_table_deletes_nothing() {
        let today = date(2025, 6, 10);
        let (kept, deleted) = prune(Vec::new(), today, 90);
        assert!(kept.is_empty());
        assert_eq!(deleted, 0);
    }
}

// ---------------------------------------------------------------------------
// Dashboard Figures
// ---------------------------------------------------------------------------

#[cfg(test)]
mod dashboard_figures {
    /// Day-over-day sell variation; unavailable without yesterday's row.
    fn change_pct(today_sell: f64, yesterday_sell: Option<f64>) -> Option<f64> {
        let prev = yesterday_sell?;
        if prev > 0.0 {
            Some((today_sell - prev) / prev * 100.0)
        } else {
            None
        }
    }

    /// Official-vs-blue premium.
    fn exchange_gap_pct(official_sell: f64, blue_sell: f64) -> Option<f64> {
        if official_sell > 0.0 {
            Some((blue_sell - official_sell) / official_sell * 100.0)
        } else {
            None
        }
    }

    #[test]
    fn variation_against_yesterday() {
        let change = change_pct(1050.0, Some(1000.0)).unwrap();
        assert!((change - 5.0).abs() < 1e-9);
    }

    #[test]
    fn variation_is_unavailable_without_yesterday() {
        assert_eq!(change_pct(1050.0, None), None);
    }

    #[test]
    fn gap_between_official_and_blue() {
        // official 1200, blue 1400 -> 16.67% premium
        let gap = exchange_gap_pct(1200.0, 1400.0).unwrap();
        assert!((gap - 16.666_666_666_666_668).abs() < 1e-9);
    }

    #[test]
    fn gap_is_unavailable_with_zero_official() {
        assert_eq!(exchange_gap_pct(0.0, 1400.0), None);
    }
}
