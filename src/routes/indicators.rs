use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{EconomicIndicator, IndicatorKind};
use crate::services::indicator_service;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 100;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_indicators))
}

#[derive(Debug, Deserialize)]
pub struct IndicatorListParams {
    kind: Option<String>,
    date: Option<NaiveDate>,
    limit: Option<i64>,
}

/// GET /api/indicators?kind=reserves&date=2025-06-02
async fn list_indicators(
    State(state): State<AppState>,
    Query(params): Query<IndicatorListParams>,
) -> Result<Json<Vec<EconomicIndicator>>, AppError> {
    info!("GET /api/indicators - Listing indicators");

    if let Some(kind) = params.kind.as_deref() {
        if IndicatorKind::from_string(kind).is_none() {
            return Err(AppError::Validation(format!(
                "unknown indicator kind: {}",
                kind
            )));
        }
    }

    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 1_000);
    let indicators =
        indicator_service::list(&state.pool, params.kind.as_deref(), params.date, limit).await?;
    Ok(Json(indicators))
}
