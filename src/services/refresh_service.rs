use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::db;
use crate::errors::AppError;
use crate::external::bcra::BcraClient;
use crate::external::dolar_api::DolarApiClient;
use crate::services::{indicator_service, quote_service};

pub const DEFAULT_RETENTION_DAYS: i64 = 90;

/// Outcome of one refresh round. Counts are the number of sources that
/// actually upserted a row; a failed source is simply absent from them.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshSummary {
    pub quotes_updated: usize,
    pub indicators_updated: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Sequence every adapter exactly once. No retry/backoff: a source that
/// fails this round waits for the next manual or scheduled run.
pub async fn refresh_all(
    pool: &PgPool,
    dolar: &DolarApiClient,
    bcra: &BcraClient,
) -> RefreshSummary {
    info!("Starting full data refresh");
    let started_at = Utc::now();

    let quotes_updated = quote_service::refresh_all_quotes(pool, dolar).await;
    let indicators_updated = indicator_service::refresh_all_indicators(pool, bcra).await;

    let finished_at = Utc::now();
    info!(
        "Refresh complete: {} quotes, {} indicators",
        quotes_updated, indicators_updated
    );

    RefreshSummary {
        quotes_updated,
        indicators_updated,
        started_at,
        finished_at,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PruneSummary {
    pub cutoff: NaiveDate,
    pub quotes_deleted: u64,
    pub indicators_deleted: u64,
}

pub fn retention_cutoff(today: NaiveDate, days: i64) -> NaiveDate {
    today - ChronoDuration::days(days)
}

/// Drop quotes and indicators strictly older than `today - days`.
/// Price bars are intentionally kept.
pub async fn prune_old_data(pool: &PgPool, days: i64) -> Result<PruneSummary, AppError> {
    let cutoff = retention_cutoff(Utc::now().date_naive(), days);
    info!("Pruning rows older than {}", cutoff);

    let quotes_deleted = db::quote_queries::delete_older_than(pool, cutoff).await?;
    let indicators_deleted = db::indicator_queries::delete_older_than(pool, cutoff).await?;

    info!(
        "✓ Pruned {} quotes, {} indicators",
        quotes_deleted, indicators_deleted
    );

    Ok(PruneSummary {
        cutoff,
        quotes_deleted,
        indicators_deleted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_exactly_n_days_back() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let cutoff = retention_cutoff(today, 90);
        assert_eq!(cutoff, NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
    }

    #[test]
    fn cutoff_handles_year_boundaries() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let cutoff = retention_cutoff(today, 30);
        assert_eq!(cutoff, NaiveDate::from_ymd_opt(2024, 12, 16).unwrap());
    }
}
