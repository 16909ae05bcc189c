use std::sync::Arc;

use sqlx::PgPool;

use crate::external::bcra::BcraClient;
use crate::external::dolar_api::DolarApiClient;
use crate::external::provider::BarProvider;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub bar_provider: Arc<dyn BarProvider>,
    pub dolar: DolarApiClient,
    pub bcra: BcraClient,
}
