use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Instrument;

pub async fn fetch_by_symbol(
    pool: &PgPool,
    symbol: &str,
) -> Result<Option<Instrument>, sqlx::Error> {
    sqlx::query_as::<_, Instrument>(
        r#"
        SELECT id, symbol, name, class, country, sector, currency, active, created_at
        FROM instruments
        WHERE symbol = $1
        "#,
    )
    .bind(symbol)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_all(pool: &PgPool) -> Result<Vec<Instrument>, sqlx::Error> {
    sqlx::query_as::<_, Instrument>(
        r#"
        SELECT id, symbol, name, class, country, sector, currency, active, created_at
        FROM instruments
        ORDER BY symbol
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Active instruments, optionally narrowed by class and/or an explicit
/// symbol list.
pub async fn fetch_active(
    pool: &PgPool,
    class: Option<&str>,
    symbols: Option<&[String]>,
) -> Result<Vec<Instrument>, sqlx::Error> {
    sqlx::query_as::<_, Instrument>(
        r#"
        SELECT id, symbol, name, class, country, sector, currency, active, created_at
        FROM instruments
        WHERE active
          AND ($1::text IS NULL OR class = $1)
          AND ($2::text[] IS NULL OR symbol = ANY($2))
        ORDER BY symbol
        "#,
    )
    .bind(class)
    .bind(symbols)
    .fetch_all(pool)
    .await
}

/// Seed-style upsert keyed by symbol. Returns true when a new row was
/// created, false when an existing one was refreshed.
pub async fn upsert_seed(
    pool: &PgPool,
    symbol: &str,
    name: &str,
    class: &str,
    sector: &str,
    country: &str,
    currency: &str,
) -> Result<bool, sqlx::Error> {
    match fetch_by_symbol(pool, symbol).await? {
        Some(existing) => {
            sqlx::query(
                r#"
                UPDATE instruments
                SET name = $2, class = $3, sector = $4, country = $5, currency = $6, active = TRUE
                WHERE id = $1
                "#,
            )
            .bind(existing.id)
            .bind(name)
            .bind(class)
            .bind(sector)
            .bind(country)
            .bind(currency)
            .execute(pool)
            .await?;
            Ok(false)
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO instruments (id, symbol, name, class, sector, country, currency, active)
                VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(symbol)
            .bind(name)
            .bind(class)
            .bind(sector)
            .bind(country)
            .bind(currency)
            .execute(pool)
            .await?;
            Ok(true)
        }
    }
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM instruments")
        .fetch_one(pool)
        .await
}
