use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::EconomicIndicator;

/// Insert-or-replace keyed by (kind, date). The date is the one reported
/// by the upstream payload.
pub async fn upsert(
    pool: &PgPool,
    kind: &str,
    date: NaiveDate,
    value: &BigDecimal,
    unit: &str,
) -> Result<EconomicIndicator, sqlx::Error> {
    sqlx::query_as::<_, EconomicIndicator>(
        r#"
        INSERT INTO economic_indicators (id, kind, date, value, unit)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (kind, date)
        DO UPDATE SET value = EXCLUDED.value, unit = EXCLUDED.unit, updated_at = NOW()
        RETURNING id, kind, date, value, unit, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(kind)
    .bind(date)
    .bind(value)
    .bind(unit)
    .fetch_one(pool)
    .await
}

pub async fn fetch_filtered(
    pool: &PgPool,
    kind: Option<&str>,
    date: Option<NaiveDate>,
    limit: i64,
) -> Result<Vec<EconomicIndicator>, sqlx::Error> {
    sqlx::query_as::<_, EconomicIndicator>(
        r#"
        SELECT id, kind, date, value, unit, updated_at
        FROM economic_indicators
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

pub async fn fetch_on(pool: &PgPool, date: NaiveDate) -> Result<Vec<EconomicIndicator>, sqlx::Error> {
    sqlx::query_as::<_, EconomicIndicator>(
        r#"
        SELECT id, kind, date, value, unit, updated_at
        FROM economic_indicators
        WHERE date = $1
        ORDER BY kind
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await
}

/// Delete rows strictly older than the cutoff; returns the number removed.
pub async fn delete_older_than(pool: &PgPool, cutoff: NaiveDate) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM economic_indicators WHERE date < $1")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM economic_indicators")
        .fetch_one(pool)
        .await
}
