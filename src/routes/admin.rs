use axum::extract::{Path, Query, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db;
use crate::errors::AppError;
use crate::external::provider::OutputSize;
use crate::models::InstrumentClass;
use crate::services::market_data_service::{self, SeedSummary, SymbolIngestResult};
use crate::services::refresh_service::{self, PruneSummary, DEFAULT_RETENTION_DAYS};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/instruments/seed", post(seed_instruments))
        .route("/market/update", post(update_market))
        .route("/market/:symbol/mock", post(generate_mock))
        .route("/retention/prune", post(prune_retention))
}

/// POST /api/admin/instruments/seed
///
/// Idempotent load of the fixed initial instrument universe.
async fn seed_instruments(State(state): State<AppState>) -> Result<Json<SeedSummary>, AppError> {
    info!("POST /api/admin/instruments/seed - Seeding instruments");
    let summary = market_data_service::seed_instruments(&state.pool).await?;
    Ok(Json(summary))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMarketRequest {
    /// Explicit symbols to update; defaults to every active instrument.
    pub symbols: Option<Vec<String>>,
    /// Restrict to one instrument class (equity/etf/index).
    pub class: Option<String>,
    /// Full 20+ year history instead of the recent window.
    #[serde(default)]
    pub full: bool,
}

#[derive(Debug, Serialize)]
pub struct UpdateMarketSummary {
    pub requested: usize,
    pub succeeded: usize,
    pub total_bars: usize,
    pub results: Vec<SymbolIngestResult>,
}

/// POST /api/admin/market/update
///
/// Sequential batch ingestion over the selected instruments, honoring
/// the upstream rate limit between calls.
async fn update_market(
    State(state): State<AppState>,
    body: Option<Json<UpdateMarketRequest>>,
) -> Result<Json<UpdateMarketSummary>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    info!("POST /api/admin/market/update - Batch market update");

    if let Some(class) = request.class.as_deref() {
        if InstrumentClass::from_string(class).is_none() {
            return Err(AppError::Validation(format!(
                "unknown instrument class: {}",
                class
            )));
        }
    }

    let requested_symbols = request
        .symbols
        .map(|list| list.iter().map(|s| s.trim().to_uppercase()).collect::<Vec<_>>());

    let instruments = db::instrument_queries::fetch_active(
        &state.pool,
        request.class.as_deref(),
        requested_symbols.as_deref(),
    )
    .await?;

    if instruments.is_empty() {
        warn!("No instruments matched the update request");
        return Err(AppError::Validation(
            "no active instruments matched the request".to_string(),
        ));
    }

    let symbols: Vec<String> = instruments.into_iter().map(|i| i.symbol).collect();
    let output = if request.full {
        OutputSize::Full
    } else {
        OutputSize::Compact
    };

    if request.full {
        warn!("Full-history mode requested; this will take a while");
    }

    let results = market_data_service::ingest_many(
        &state.pool,
        state.bar_provider.as_ref(),
        &symbols,
        output,
    )
    .await;

    let summary = UpdateMarketSummary {
        requested: symbols.len(),
        succeeded: results.iter().filter(|r| r.bars > 0).count(),
        total_bars: results.iter().map(|r| r.bars).sum(),
        results,
    };

    info!(
        "Market update complete: {}/{} symbols, {} bars",
        summary.succeeded, summary.requested, summary.total_bars
    );

    Ok(Json(summary))
}

/// POST /api/admin/market/:symbol/mock
///
/// Synthetic price history for local development.
async fn generate_mock(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SymbolIngestResult>, AppError> {
    let symbol = symbol.to_uppercase();
    info!("POST /api/admin/market/{}/mock - Generating mock bars", symbol);

    let bars = market_data_service::generate_mock(&state.pool, &symbol).await?;
    Ok(Json(SymbolIngestResult { symbol, bars }))
}

#[derive(Debug, Deserialize)]
pub struct PruneParams {
    days: Option<i64>,
}

/// POST /api/admin/retention/prune?days=90
async fn prune_retention(
    State(state): State<AppState>,
    Query(params): Query<PruneParams>,
) -> Result<Json<PruneSummary>, AppError> {
    let days = params.days.unwrap_or(DEFAULT_RETENTION_DAYS);
    if days < 1 {
        return Err(AppError::Validation("days must be positive".to_string()));
    }

    info!("POST /api/admin/retention/prune - Pruning data older than {} days", days);
    let summary = refresh_service::prune_old_data(&state.pool, days).await?;
    Ok(Json(summary))
}
