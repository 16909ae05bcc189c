use std::collections::HashMap;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use bigdecimal::ToPrimitive;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::db;
use crate::errors::AppError;
use crate::models::{IndicatorKind, Quote, QuoteKind};
use crate::services::refresh_service::{self, RefreshSummary};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

#[derive(Debug, Serialize)]
pub struct DashboardQuote {
    pub kind: String,
    pub label: String,
    pub buy: f64,
    pub sell: f64,
    pub spread: f64,
    pub spread_pct: f64,
    /// Sell-price variation vs yesterday, in percent; absent when
    /// yesterday has no row for this kind.
    pub change_pct: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DashboardIndicator {
    pub kind: String,
    pub label: String,
    pub value: f64,
    pub unit: String,
    pub date: NaiveDate,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub quotes: Vec<DashboardQuote>,
    pub indicators: Vec<DashboardIndicator>,
    /// Official-vs-blue premium in percent; absent unless both quotes
    /// exist for today.
    pub exchange_gap_pct: Option<f64>,
    pub total_quotes: i64,
    pub total_indicators: i64,
}

fn sell_of(quote: &Quote) -> f64 {
    quote.sell.to_f64().unwrap_or(0.0)
}

/// GET /api/dashboard
///
/// Today's quotes with spreads and day-over-day variation, today's
/// indicators, and the official-vs-blue exchange gap.
async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>, AppError> {
    info!("GET /api/dashboard - Building dashboard summary");

    let today = Utc::now().date_naive();
    let yesterday = today - ChronoDuration::days(1);

    let today_quotes = db::quote_queries::fetch_on(&state.pool, today).await?;
    let yesterday_quotes = db::quote_queries::fetch_on(&state.pool, yesterday).await?;
    let today_indicators = db::indicator_queries::fetch_on(&state.pool, today).await?;

    let today_by_kind: HashMap<&str, &Quote> = today_quotes
        .iter()
        .map(|q| (q.kind.as_str(), q))
        .collect();
    let yesterday_by_kind: HashMap<&str, &Quote> = yesterday_quotes
        .iter()
        .map(|q| (q.kind.as_str(), q))
        .collect();

    let mut quotes = Vec::new();
    for kind in QuoteKind::ALL {
        let Some(quote) = today_by_kind.get(kind.as_str()) else {
            continue;
        };

        let change_pct = yesterday_by_kind.get(kind.as_str()).and_then(|prev| {
            let prev_sell = sell_of(prev);
            if prev_sell > 0.0 {
                Some((sell_of(quote) - prev_sell) / prev_sell * 100.0)
            } else {
                None
            }
        });

        quotes.push(DashboardQuote {
            kind: kind.as_str().to_string(),
            label: kind.display_name().to_string(),
            buy: quote.buy.to_f64().unwrap_or(0.0),
            sell: sell_of(quote),
            spread: quote.spread().to_f64().unwrap_or(0.0),
            spread_pct: quote.spread_pct(),
            change_pct,
            updated_at: quote.updated_at,
        });
    }

    let exchange_gap_pct = match (
        today_by_kind.get(QuoteKind::Official.as_str()),
        today_by_kind.get(QuoteKind::Blue.as_str()),
    ) {
        (Some(official), Some(blue)) => {
            let official_sell = sell_of(official);
            if official_sell > 0.0 {
                Some((sell_of(blue) - official_sell) / official_sell * 100.0)
            } else {
                None
            }
        }
        _ => None,
    };

    let indicators = today_indicators
        .into_iter()
        .map(|i| {
            let label = IndicatorKind::from_string(&i.kind)
                .map(|k| k.display_name().to_string())
                .unwrap_or_else(|| i.kind.clone());
            DashboardIndicator {
                label,
                kind: i.kind,
                value: i.value.to_f64().unwrap_or(0.0),
                unit: i.unit,
                date: i.date,
                updated_at: i.updated_at,
            }
        })
        .collect();

    let total_quotes = db::quote_queries::count(&state.pool).await?;
    let total_indicators = db::indicator_queries::count(&state.pool).await?;

    Ok(Json(DashboardSummary {
        date: today,
        quotes,
        indicators,
        exchange_gap_pct,
        total_quotes,
        total_indicators,
    }))
}

/// POST /api/refresh
///
/// Manual refresh of every upstream source, exactly once each.
pub async fn refresh_all_data(
    State(state): State<AppState>,
) -> Result<Json<RefreshSummary>, AppError> {
    info!("POST /api/refresh - Manual refresh of all sources");
    let summary = refresh_service::refresh_all(&state.pool, &state.dolar, &state.bcra).await;
    Ok(Json(summary))
}
