use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::external::provider::ExternalDailyBar;
use crate::models::PriceBar;

/// Insert-or-replace one bar keyed by (instrument, date).
///
/// Deliberately not wrapped in a transaction: each bar commits on its own,
/// so a failure mid-batch leaves the bars already written intact.
pub async fn upsert_bar(
    pool: &PgPool,
    instrument_id: Uuid,
    bar: &ExternalDailyBar,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO price_bars
            (id, instrument_id, date, open, high, low, close,
             adjusted_close, volume, dividend, split_ratio)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (instrument_id, date)
        DO UPDATE SET
            open = EXCLUDED.open,
            high = EXCLUDED.high,
            low = EXCLUDED.low,
            close = EXCLUDED.close,
            adjusted_close = EXCLUDED.adjusted_close,
            volume = EXCLUDED.volume,
            dividend = EXCLUDED.dividend,
            split_ratio = EXCLUDED.split_ratio,
            updated_at = NOW()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(instrument_id)
    .bind(bar.date)
    .bind(bar.open)
    .bind(bar.high)
    .bind(bar.low)
    .bind(bar.close)
    .bind(bar.adjusted_close)
    .bind(bar.volume)
    .bind(bar.dividend)
    .bind(bar.split_ratio)
    .execute(pool)
    .await?;

    Ok(())
}

/// Bars for an instrument since `from`, oldest first.
pub async fn fetch_window(
    pool: &PgPool,
    instrument_id: Uuid,
    from: NaiveDate,
) -> Result<Vec<PriceBar>, sqlx::Error> {
    sqlx::query_as::<_, PriceBar>(
        r#"
        SELECT id, instrument_id, date, open, high, low, close,
               adjusted_close, volume, dividend, split_ratio, updated_at
        FROM price_bars
        WHERE instrument_id = $1 AND date >= $2
        ORDER BY date ASC
        "#,
    )
    .bind(instrument_id)
    .bind(from)
    .fetch_all(pool)
    .await
}
