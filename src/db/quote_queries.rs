use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Quote;

/// Insert-or-replace keyed by (kind, date). Last write wins.
pub async fn upsert(
    pool: &PgPool,
    kind: &str,
    date: NaiveDate,
    buy: &BigDecimal,
    sell: &BigDecimal,
) -> Result<Quote, sqlx::Error> {
    sqlx::query_as::<_, Quote>(
        r#"
        INSERT INTO quotes (id, kind, date, buy, sell)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (kind, date)
        DO UPDATE SET buy = EXCLUDED.buy, sell = EXCLUDED.sell, updated_at = NOW()
        RETURNING id, kind, date, buy, sell, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(kind)
    .bind(date)
    .bind(buy)
    .bind(sell)
    .fetch_one(pool)
    .await
}

pub async fn fetch_filtered(
    pool: &PgPool,
    kind: Option<&str>,
    date: Option<NaiveDate>,
    limit: i64,
) -> Result<Vec<Quote>, sqlx::Error> {
    sqlx::query_as::<_, Quote>(
        r#"
        SELECT id, kind, date, buy, sell, updated_at
        FROM quotes
        WHERE ($1::text IS NULL OR kind = $1)
          AND ($2::date IS NULL OR date = $2)
        ORDER BY date DESC, kind
        LIMIT $3
        "#,
    )
    .bind(kind)
    .bind(date)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn fetch_on(pool: &PgPool, date: NaiveDate) -> Result<Vec<Quote>, sqlx::Error> {
    sqlx::query_as::<_, Quote>(
        r#"
        SELECT id, kind, date, buy, sell, updated_at
        FROM quotes
        WHERE date = $1
        ORDER BY kind
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await
}

/// Most recent quote for each kind in one query.
pub async fn fetch_latest_per_kind(pool: &PgPool) -> Result<Vec<Quote>, sqlx::Error> {
    sqlx::query_as::<_, Quote>(
        r#"
        SELECT DISTINCT ON (kind) id, kind, date, buy, sell, updated_at
        FROM quotes
        ORDER BY kind, date DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// (date, sell) pairs for one kind since `from`, oldest first.
/// Feeds the cross-asset correlation.
pub async fn fetch_sell_series(
    pool: &PgPool,
    kind: &str,
    from: NaiveDate,
) -> Result<Vec<(NaiveDate, BigDecimal)>, sqlx::Error> {
    sqlx::query_as::<_, (NaiveDate, BigDecimal)>(
        r#"
        SELECT date, sell
        FROM quotes
        WHERE kind = $1 AND date >= $2
        ORDER BY date ASC
        "#,
    )
    .bind(kind)
    .bind(from)
    .fetch_all(pool)
    .await
}

/// Delete rows strictly older than the cutoff; returns the number removed.
pub async fn delete_older_than(pool: &PgPool, cutoff: NaiveDate) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM quotes WHERE date < $1")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes")
        .fetch_one(pool)
        .await
}
