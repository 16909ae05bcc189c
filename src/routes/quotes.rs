use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{Quote, QuoteKind};
use crate::services::quote_service;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 100;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quotes))
        .route("/latest", get(latest_quotes))
}

#[derive(Debug, Deserialize)]
pub struct QuoteListParams {
    kind: Option<String>,
    date: Option<NaiveDate>,
    limit: Option<i64>,
}

/// GET /api/quotes?kind=blue&date=2025-06-02
async fn list_quotes(
    State(state): State<AppState>,
    Query(params): Query<QuoteListParams>,
) -> Result<Json<Vec<Quote>>, AppError> {
    info!("GET /api/quotes - Listing quotes");

    if let Some(kind) = params.kind.as_deref() {
        if QuoteKind::from_string(kind).is_none() {
            return Err(AppError::Validation(format!("unknown quote kind: {}", kind)));
        }
    }

    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 1_000);
    let quotes =
        quote_service::list(&state.pool, params.kind.as_deref(), params.date, limit).await?;
    Ok(Json(quotes))
}

/// GET /api/quotes/latest — most recent quote per kind.
async fn latest_quotes(State(state): State<AppState>) -> Result<Json<Vec<Quote>>, AppError> {
    info!("GET /api/quotes/latest - Latest quote per kind");
    let quotes = quote_service::latest_per_kind(&state.pool).await?;
    Ok(Json(quotes))
}
