use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{admin, dashboard, health, indicators, market, quotes};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/quotes", quotes::router())
        .nest("/api/indicators", indicators::router())
        .nest("/api/dashboard", dashboard::router())
        .nest("/api/market", market::router())
        .nest("/api/admin", admin::router())
        .route("/api/refresh", post(dashboard::refresh_all_data))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
