pub mod alphavantage;
pub mod bcra;
pub mod dolar_api;
pub mod provider;
