use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::{error, info};

use crate::db;
use crate::errors::AppError;
use crate::external::dolar_api::DolarApiClient;
use crate::models::{Quote, QuoteKind};

/// Fetch and upsert one quote kind, dated "today". Best-effort: any
/// failure is logged and swallowed, matching the no-retry policy — the
/// next manual refresh is the recovery path.
pub async fn refresh_quote(
    pool: &PgPool,
    dolar: &DolarApiClient,
    kind: QuoteKind,
) -> Option<Quote> {
    let today = Utc::now().date_naive();

    let payload = match dolar.fetch_quote(kind).await {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to fetch {} quote: {}", kind.as_str(), e);
            return None;
        }
    };

    match db::quote_queries::upsert(pool, kind.as_str(), today, &payload.compra, &payload.venta)
        .await
    {
        Ok(quote) => {
            info!("✓ Quote {} upserted: sell {}", kind.as_str(), quote.sell);
            Some(quote)
        }
        Err(e) => {
            error!("Failed to store {} quote: {}", kind.as_str(), e);
            None
        }
    }
}

/// Refresh all four kinds sequentially. A failed kind does not abort its
/// siblings; returns how many were upserted this round.
pub async fn refresh_all_quotes(pool: &PgPool, dolar: &DolarApiClient) -> usize {
    let mut updated = 0;
    for kind in QuoteKind::ALL {
        if refresh_quote(pool, dolar, kind).await.is_some() {
            updated += 1;
        }
    }
    updated
}

pub async fn list(
    pool: &PgPool,
    kind: Option<&str>,
    date: Option<NaiveDate>,
    limit: i64,
) -> Result<Vec<Quote>, AppError> {
    db::quote_queries::fetch_filtered(pool, kind, date, limit)
        .await
        .map_err(|e| {
            error!("Failed to fetch quotes: {}", e);
            AppError::Db(e)
        })
}

pub async fn latest_per_kind(pool: &PgPool) -> Result<Vec<Quote>, AppError> {
    db::quote_queries::fetch_latest_per_kind(pool).await.map_err(|e| {
        error!("Failed to fetch latest quotes: {}", e);
        AppError::Db(e)
    })
}
