use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::db;
use crate::errors::AppError;
use crate::models::{
    ComparisonSeries, CorrelationReport, Instrument, InstrumentMetrics, PriceBar, QuoteKind,
};
use crate::services::analytics_service;
use crate::state::AppState;

const DEFAULT_LOOKBACK_DAYS: i64 = 30;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/instruments", get(list_instruments))
        .route("/metrics", get(get_metrics_table))
        .route("/compare", get(get_comparison))
        .route("/:symbol/bars", get(get_bars))
        .route("/:symbol/correlation", get(get_correlation))
}

#[derive(Debug, Deserialize)]
pub struct MarketParams {
    /// Comma-separated symbol list; defaults to every active instrument.
    symbols: Option<String>,
    days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct WindowParams {
    days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CorrelationParams {
    kind: Option<String>,
    days: Option<i64>,
}

fn parse_symbols(raw: Option<&str>) -> Option<Vec<String>> {
    let symbols: Vec<String> = raw?
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        None
    } else {
        Some(symbols)
    }
}

fn lookback(days: Option<i64>) -> Result<i64, AppError> {
    let days = days.unwrap_or(DEFAULT_LOOKBACK_DAYS);
    if days < 1 {
        return Err(AppError::Validation("days must be positive".to_string()));
    }
    Ok(days)
}

async fn resolve_symbols(
    state: &AppState,
    raw: Option<&str>,
) -> Result<Vec<String>, AppError> {
    if let Some(symbols) = parse_symbols(raw) {
        return Ok(symbols);
    }

    let instruments = db::instrument_queries::fetch_active(&state.pool, None, None).await?;
    Ok(instruments.into_iter().map(|i| i.symbol).collect())
}

/// GET /api/market/instruments
async fn list_instruments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Instrument>>, AppError> {
    info!("GET /api/market/instruments - Listing instruments");
    let instruments = db::instrument_queries::fetch_all(&state.pool).await?;
    Ok(Json(instruments))
}

/// GET /api/market/metrics?symbols=AAPL,MSFT&days=30
async fn get_metrics_table(
    State(state): State<AppState>,
    Query(params): Query<MarketParams>,
) -> Result<Json<Vec<InstrumentMetrics>>, AppError> {
    info!("GET /api/market/metrics - Building metrics table");

    let days = lookback(params.days)?;
    let symbols = resolve_symbols(&state, params.symbols.as_deref()).await?;
    let table = analytics_service::metrics_table(&state.pool, &symbols, days).await?;
    Ok(Json(table))
}

/// GET /api/market/compare?symbols=AAPL,SPY&days=30
///
/// Base-100 normalized close series for side-by-side charting.
async fn get_comparison(
    State(state): State<AppState>,
    Query(params): Query<MarketParams>,
) -> Result<Json<Vec<ComparisonSeries>>, AppError> {
    info!("GET /api/market/compare - Building comparison series");

    let days = lookback(params.days)?;
    let symbols = resolve_symbols(&state, params.symbols.as_deref()).await?;
    let series = analytics_service::comparison_series(&state.pool, &symbols, days).await?;
    Ok(Json(series))
}

/// GET /api/market/:symbol/bars?days=30
async fn get_bars(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<Vec<PriceBar>>, AppError> {
    let symbol = symbol.to_uppercase();
    info!("GET /api/market/{}/bars - Fetching price bars", symbol);

    let days = lookback(params.days)?;
    analytics_service::bars_window(&state.pool, &symbol, days)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("instrument {} not found", symbol)))
}

/// GET /api/market/:symbol/correlation?kind=blue&days=30
async fn get_correlation(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<CorrelationParams>,
) -> Result<Json<CorrelationReport>, AppError> {
    let symbol = symbol.to_uppercase();
    info!("GET /api/market/{}/correlation - Computing correlation", symbol);

    let days = lookback(params.days)?;
    let kind_str = params.kind.as_deref().unwrap_or("blue");
    let kind = QuoteKind::from_string(kind_str)
        .ok_or_else(|| AppError::Validation(format!("unknown quote kind: {}", kind_str)))?;

    analytics_service::correlation_with_quote(&state.pool, &symbol, kind, days)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!("no price data for instrument {}", symbol))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_compile() {
        let _router = router();
    }

    #[test]
    fn symbols_are_split_trimmed_and_uppercased() {
        let parsed = parse_symbols(Some("aapl, msft ,SPY")).unwrap();
        assert_eq!(parsed, vec!["AAPL", "MSFT", "SPY"]);
    }

    #[test]
    fn blank_symbol_lists_fall_through_to_default() {
        assert_eq!(parse_symbols(None), None);
        assert_eq!(parse_symbols(Some("")), None);
        assert_eq!(parse_symbols(Some(" , ,")), None);
    }
}
