use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

use crate::db;
use crate::errors::AppError;
use crate::external::provider::{BarProvider, ExternalDailyBar, OutputSize};
use crate::models::InstrumentClass;

/// Hard cap on bars written per ingestion call, regardless of how much
/// history the upstream returns.
pub const MAX_BARS_PER_CALL: usize = 30;

/// Pause between sequential upstream calls in a batch. A throughput
/// ceiling imposed by the provider's free tier, not a scheduler.
const RATE_LIMIT_DELAY: Duration = Duration::from_secs(12);

// Initial instrument universe, loaded by the seed command.
// (symbol, name, class, sector)
pub const DEFAULT_INSTRUMENTS: &[(&str, &str, InstrumentClass, &str)] = &[
    ("AAPL", "Apple Inc.", InstrumentClass::Equity, "Technology"),
    ("MSFT", "Microsoft Corporation", InstrumentClass::Equity, "Technology"),
    ("TSLA", "Tesla Inc.", InstrumentClass::Equity, "Automotive"),
    ("GOOGL", "Alphabet Inc.", InstrumentClass::Equity, "Technology"),
    ("META", "Meta Platforms Inc.", InstrumentClass::Equity, "Technology"),
    ("NVDA", "NVIDIA Corporation", InstrumentClass::Equity, "Technology"),
    ("SPY", "SPDR S&P 500 ETF", InstrumentClass::Etf, "Index"),
    ("QQQ", "Invesco QQQ Trust", InstrumentClass::Etf, "Index"),
    ("VTI", "Vanguard Total Stock Market ETF", InstrumentClass::Etf, "Total Market"),
    ("VOO", "Vanguard S&P 500 ETF", InstrumentClass::Etf, "Index"),
    ("GLD", "SPDR Gold Shares", InstrumentClass::Etf, "Commodities"),
    ("IWM", "iShares Russell 2000 ETF", InstrumentClass::Etf, "Small Cap"),
    ("EEM", "iShares MSCI Emerging Markets ETF", InstrumentClass::Etf, "Emerging Markets"),
];

#[derive(Debug, Clone, Serialize)]
pub struct SymbolIngestResult {
    pub symbol: String,
    pub bars: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedSummary {
    pub created: usize,
    pub updated: usize,
    pub total: i64,
}

/// Drop future-dated entries (upstream clock skew) and keep at most the
/// `cap` most recent of what remains, oldest first.
pub fn select_ingestible(
    mut bars: Vec<ExternalDailyBar>,
    today: NaiveDate,
    cap: usize,
) -> Vec<ExternalDailyBar> {
    bars.retain(|b| {
        if b.date > today {
            warn!("Skipping future-dated bar {}", b.date);
            return false;
        }
        true
    });
    bars.sort_by_key(|b| b.date);

    if bars.len() > cap {
        bars.split_off(bars.len() - cap)
    } else {
        bars
    }
}

/// Ingest the daily series for one symbol.
///
/// The instrument must already be seeded; ingestion never creates one.
/// An absent instrument yields an empty result, not an error. Each bar
/// commits independently, so a mid-batch failure keeps what was written.
pub async fn ingest_daily_bars(
    pool: &PgPool,
    provider: &dyn BarProvider,
    symbol: &str,
    output: OutputSize,
) -> Result<usize, AppError> {
    let Some(instrument) = db::instrument_queries::fetch_by_symbol(pool, symbol).await? else {
        warn!("Instrument {} not seeded; skipping ingestion", symbol);
        return Ok(0);
    };

    let bars = provider.fetch_daily_series(symbol, output).await?;
    let selected = select_ingestible(bars, Utc::now().date_naive(), MAX_BARS_PER_CALL);

    let mut written = 0;
    for bar in &selected {
        match db::price_bar_queries::upsert_bar(pool, instrument.id, bar).await {
            Ok(()) => written += 1,
            Err(e) => error!("Failed to upsert bar {} for {}: {}", bar.date, symbol, e),
        }
    }

    info!("✓ {}: {} bars ingested", symbol, written);
    Ok(written)
}

/// Batch ingestion: strictly sequential, with a fixed delay between
/// upstream calls. A failed symbol is logged and recorded as zero bars.
pub async fn ingest_many(
    pool: &PgPool,
    provider: &dyn BarProvider,
    symbols: &[String],
    output: OutputSize,
) -> Vec<SymbolIngestResult> {
    let mut results = Vec::with_capacity(symbols.len());

    for (i, symbol) in symbols.iter().enumerate() {
        info!("Processing {}/{}: {}", i + 1, symbols.len(), symbol);

        let bars = match ingest_daily_bars(pool, provider, symbol, output).await {
            Ok(n) => n,
            Err(e) => {
                error!("✗ {}: {}", symbol, e);
                0
            }
        };
        results.push(SymbolIngestResult {
            symbol: symbol.clone(),
            bars,
        });

        if i + 1 < symbols.len() {
            sleep(RATE_LIMIT_DELAY).await;
        }
    }

    results
}

/// Load the fixed initial instrument list. Idempotent; reports how many
/// rows were created vs refreshed.
pub async fn seed_instruments(pool: &PgPool) -> Result<SeedSummary, AppError> {
    let mut created = 0;
    let mut updated = 0;

    for (symbol, name, class, sector) in DEFAULT_INSTRUMENTS {
        match db::instrument_queries::upsert_seed(
            pool,
            symbol,
            name,
            class.as_str(),
            sector,
            "USA",
            "USD",
        )
        .await
        {
            Ok(true) => {
                info!("✓ Created instrument {} - {}", symbol, name);
                created += 1;
            }
            Ok(false) => {
                info!("↻ Updated instrument {}", symbol);
                updated += 1;
            }
            Err(e) => error!("Failed to seed instrument {}: {}", symbol, e),
        }
    }

    let total = db::instrument_queries::count(pool).await?;
    info!("Seed complete: {} created, {} updated, {} total", created, updated, total);

    Ok(SeedSummary {
        created,
        updated,
        total,
    })
}

/// Development helper: write a synthetic random-walk history so the
/// dashboard has data without an API key.
pub async fn generate_mock(pool: &PgPool, symbol: &str) -> Result<usize, AppError> {
    let Some(instrument) = db::instrument_queries::fetch_by_symbol(pool, symbol).await? else {
        warn!("Instrument {} not seeded; cannot generate mock data", symbol);
        return Ok(0);
    };

    let today = Utc::now().date_naive();
    let mut close = 100.0_f64;
    let mut written = 0;

    for i in (0..180i64).rev() {
        let open = close;
        close *= 1.0 + (rand::random::<f64>() - 0.5) * 0.02;
        let high = open.max(close) * 1.01;
        let low = open.min(close) * 0.99;
        let volume = (1_000_000.0 + rand::random::<f64>() * 4_000_000.0) as i64;

        let bar = ExternalDailyBar {
            date: today - ChronoDuration::days(i),
            open,
            high,
            low,
            close,
            adjusted_close: close,
            volume,
            dividend: 0.0,
            split_ratio: 1.0,
        };

        match db::price_bar_queries::upsert_bar(pool, instrument.id, &bar).await {
            Ok(()) => written += 1,
            Err(e) => error!("Failed to upsert mock bar {} for {}: {}", bar.date, symbol, e),
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: NaiveDate) -> ExternalDailyBar {
        ExternalDailyBar {
            date,
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.5,
            adjusted_close: 100.5,
            volume: 1_000,
            dividend: 0.0,
            split_ratio: 1.0,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn future_dated_bars_are_silently_excluded() {
        let today = day(10);
        let bars = vec![bar(day(9)), bar(day(10)), bar(day(11))];

        let selected = select_ingestible(bars, today, MAX_BARS_PER_CALL);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|b| b.date <= today));
    }

    #[test]
    fn ingestion_is_capped_at_the_most_recent_entries() {
        let today = day(30);
        let bars: Vec<_> = (1..=30).map(|d| bar(day(d))).collect();

        let selected = select_ingestible(bars, today, 5);
        assert_eq!(selected.len(), 5);
        // the cap keeps the newest entries, oldest first
        assert_eq!(selected[0].date, day(26));
        assert_eq!(selected[4].date, day(30));
    }

    #[test]
    fn selection_keeps_everything_under_the_cap() {
        let today = day(10);
        let bars = vec![bar(day(8)), bar(day(9))];
        let selected = select_ingestible(bars, today, MAX_BARS_PER_CALL);
        assert_eq!(selected.len(), 2);
    }
}
