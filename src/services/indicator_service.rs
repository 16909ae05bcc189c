use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{error, info};

use crate::db;
use crate::errors::AppError;
use crate::external::bcra::BcraClient;
use crate::models::{EconomicIndicator, IndicatorKind};

// Variable ids on the central-bank statistics API.
const RESERVES_VARIABLE_ID: u32 = 1;
const POLICY_RATE_VARIABLE_ID: u32 = 7;

async fn refresh_indicator(
    pool: &PgPool,
    bcra: &BcraClient,
    variable_id: u32,
    kind: IndicatorKind,
    unit: &str,
) -> Option<EconomicIndicator> {
    let (date, value) = match bcra.fetch_latest(variable_id).await {
        Ok(latest) => latest,
        Err(e) => {
            error!("Failed to fetch {} from BCRA: {}", kind.as_str(), e);
            return None;
        }
    };

    match db::indicator_queries::upsert(pool, kind.as_str(), date, &value, unit).await {
        Ok(indicator) => {
            info!(
                "✓ Indicator {} upserted: {} {} ({})",
                kind.as_str(),
                indicator.value,
                indicator.unit,
                indicator.date
            );
            Some(indicator)
        }
        Err(e) => {
            error!("Failed to store {} indicator: {}", kind.as_str(), e);
            None
        }
    }
}

pub async fn refresh_reserves(pool: &PgPool, bcra: &BcraClient) -> Option<EconomicIndicator> {
    refresh_indicator(
        pool,
        bcra,
        RESERVES_VARIABLE_ID,
        IndicatorKind::Reserves,
        "Millones USD",
    )
    .await
}

pub async fn refresh_policy_rate(pool: &PgPool, bcra: &BcraClient) -> Option<EconomicIndicator> {
    refresh_indicator(
        pool,
        bcra,
        POLICY_RATE_VARIABLE_ID,
        IndicatorKind::PolicyRate,
        "%",
    )
    .await
}

/// Refresh every tracked indicator; returns how many were upserted.
pub async fn refresh_all_indicators(pool: &PgPool, bcra: &BcraClient) -> usize {
    let mut updated = 0;
    if refresh_reserves(pool, bcra).await.is_some() {
        updated += 1;
    }
    if refresh_policy_rate(pool, bcra).await.is_some() {
        updated += 1;
    }
    updated
}

pub async fn list(
    pool: &PgPool,
    kind: Option<&str>,
    date: Option<NaiveDate>,
    limit: i64,
) -> Result<Vec<EconomicIndicator>, AppError> {
    db::indicator_queries::fetch_filtered(pool, kind, date, limit)
        .await
        .map_err(|e| {
            error!("Failed to fetch indicators: {}", e);
            AppError::Db(e)
        })
}
