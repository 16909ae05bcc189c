pub mod analytics_service;
pub mod indicator_service;
pub mod indicators;
pub mod market_data_service;
pub mod quote_service;
pub mod refresh_service;
