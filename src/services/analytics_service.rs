use std::collections::HashMap;

use bigdecimal::ToPrimitive;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::error;

use crate::db;
use crate::errors::AppError;
use crate::models::{
    ComparisonPoint, ComparisonSeries, CorrelationReport, Instrument, InstrumentMetrics, PriceBar,
    QuoteKind,
};
use crate::services::indicators;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const SMA_WINDOW: usize = 20;

/// Correlation against a quote series needs at least this many shared
/// dates; below it the figure is reported as unavailable, never 0.
pub const MIN_CORRELATION_OVERLAP: usize = 5;

/// Instrument plus its bars inside the lookback window, oldest first.
/// `None` when the instrument is unknown or has no data in the window.
async fn load_window(
    pool: &PgPool,
    symbol: &str,
    days: i64,
) -> Result<Option<(Instrument, Vec<PriceBar>)>, AppError> {
    let Some(instrument) = db::instrument_queries::fetch_by_symbol(pool, symbol).await? else {
        return Ok(None);
    };

    let from = Utc::now().date_naive() - ChronoDuration::days(days);
    let bars = db::price_bar_queries::fetch_window(pool, instrument.id, from).await?;
    if bars.is_empty() {
        return Ok(None);
    }

    Ok(Some((instrument, bars)))
}

/// Derive the metric set for one instrument from its bars. Pure.
pub fn compute_metrics(instrument: &Instrument, bars: &[PriceBar]) -> InstrumentMetrics {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let daily_returns: Vec<f64> = bars.iter().map(|b| b.daily_return_pct()).collect();

    let first_close = closes.first().copied().unwrap_or(0.0);
    let last_close = closes.last().copied().unwrap_or(0.0);
    let period_return_pct = if first_close > 0.0 {
        (last_close - first_close) / first_close * 100.0
    } else {
        0.0
    };

    let annualized_volatility =
        indicators::sample_std(&daily_returns) * TRADING_DAYS_PER_YEAR.sqrt();

    let sma20 = indicators::sma(&closes, SMA_WINDOW)
        .last()
        .copied()
        .flatten();

    let period_high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let period_low = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    let avg_volume = indicators::mean(&bars.iter().map(|b| b.volume as f64).collect::<Vec<_>>());

    InstrumentMetrics {
        symbol: instrument.symbol.clone(),
        name: instrument.name.clone(),
        last_close,
        period_return_pct,
        annualized_volatility,
        period_high,
        period_low,
        avg_volume,
        sma20,
        days_analyzed: bars.len(),
    }
}

pub async fn instrument_metrics(
    pool: &PgPool,
    symbol: &str,
    days: i64,
) -> Result<Option<InstrumentMetrics>, AppError> {
    Ok(load_window(pool, symbol, days)
        .await?
        .map(|(instrument, bars)| compute_metrics(&instrument, &bars)))
}

/// Metrics for several symbols; symbols without data are skipped rather
/// than failing the whole table.
pub async fn metrics_table(
    pool: &PgPool,
    symbols: &[String],
    days: i64,
) -> Result<Vec<InstrumentMetrics>, AppError> {
    let mut table = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        if let Some(metrics) = instrument_metrics(pool, symbol, days).await? {
            table.push(metrics);
        }
    }
    Ok(table)
}

/// Raw bars for one symbol. `None` when the instrument is unknown.
pub async fn bars_window(
    pool: &PgPool,
    symbol: &str,
    days: i64,
) -> Result<Option<Vec<PriceBar>>, AppError> {
    let Some(instrument) = db::instrument_queries::fetch_by_symbol(pool, symbol).await? else {
        return Ok(None);
    };

    let from = Utc::now().date_naive() - ChronoDuration::days(days);
    let bars = db::price_bar_queries::fetch_window(pool, instrument.id, from).await?;
    Ok(Some(bars))
}

/// Closes rescaled to a common base of 100 at each series' first
/// observation, so instruments of different price scale are comparable.
pub async fn comparison_series(
    pool: &PgPool,
    symbols: &[String],
    days: i64,
) -> Result<Vec<ComparisonSeries>, AppError> {
    let mut out = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let Some((instrument, bars)) = load_window(pool, symbol, days).await? else {
            continue;
        };

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let normalized = indicators::normalize_base_100(&closes);
        if normalized.is_empty() {
            continue;
        }

        let points = bars
            .iter()
            .zip(normalized.into_iter())
            .map(|(bar, value)| ComparisonPoint {
                date: bar.date,
                value,
            })
            .collect();

        out.push(ComparisonSeries {
            symbol: instrument.symbol,
            points,
        });
    }

    Ok(out)
}

/// Align two dated series on their common dates and correlate. Returns
/// the overlap size alongside the coefficient so callers can surface why
/// a figure is unavailable.
pub fn correlate_series(
    bars: &[(NaiveDate, f64)],
    quotes: &[(NaiveDate, f64)],
    min_overlap: usize,
) -> (usize, Option<f64>) {
    let by_date: HashMap<NaiveDate, f64> = quotes.iter().copied().collect();

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (date, close) in bars {
        if let Some(sell) = by_date.get(date) {
            xs.push(*close);
            ys.push(*sell);
        }
    }

    if xs.len() < min_overlap {
        return (xs.len(), None);
    }

    (xs.len(), indicators::pearson(&xs, &ys))
}

pub async fn correlation_with_quote(
    pool: &PgPool,
    symbol: &str,
    kind: QuoteKind,
    days: i64,
) -> Result<Option<CorrelationReport>, AppError> {
    let Some((instrument, bars)) = load_window(pool, symbol, days).await? else {
        return Ok(None);
    };

    let from = Utc::now().date_naive() - ChronoDuration::days(days);
    let quote_rows = db::quote_queries::fetch_sell_series(pool, kind.as_str(), from)
        .await
        .map_err(|e| {
            error!("Failed to fetch {} sell series: {}", kind.as_str(), e);
            AppError::Db(e)
        })?;

    let close_series: Vec<(NaiveDate, f64)> = bars.iter().map(|b| (b.date, b.close)).collect();
    let sell_series: Vec<(NaiveDate, f64)> = quote_rows
        .iter()
        .map(|(date, sell)| (*date, sell.to_f64().unwrap_or(0.0)))
        .collect();

    let (common_dates, correlation) =
        correlate_series(&close_series, &sell_series, MIN_CORRELATION_OVERLAP);

    Ok(Some(CorrelationReport {
        symbol: instrument.symbol,
        quote_kind: kind.as_str().to_string(),
        days,
        common_dates,
        correlation,
    }))
}
