mod app;
mod db;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use crate::external::alphavantage::AlphaVantageProvider;
use crate::external::bcra::BcraClient;
use crate::external::dolar_api::DolarApiClient;
use crate::external::provider::BarProvider;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    logging::init_logging(logging::LoggingConfig::from_env())?;

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let bar_provider: Arc<dyn BarProvider> = Arc::new(AlphaVantageProvider::from_env());

    let state = AppState {
        pool,
        bar_provider,
        dolar: DolarApiClient::new(),
        bcra: BcraClient::new(),
    };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Pulso backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
