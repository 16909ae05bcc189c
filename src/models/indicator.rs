use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// A single dated monetary statistic published by the central bank
// (reserves, policy rate, ...). Unique per (kind, date); the date comes
// from the upstream payload, not from the processing clock.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EconomicIndicator {
    pub id: Uuid,
    pub kind: String,
    pub date: NaiveDate,
    pub value: BigDecimal,
    pub unit: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Inflation,
    PolicyRate,
    Reserves,
    CountryRisk,
    StockIndex,
}

impl IndicatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Inflation => "inflation",
            IndicatorKind::PolicyRate => "policy_rate",
            IndicatorKind::Reserves => "reserves",
            IndicatorKind::CountryRisk => "country_risk",
            IndicatorKind::StockIndex => "stock_index",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            IndicatorKind::Inflation => "Inflación Mensual",
            IndicatorKind::PolicyRate => "Tasa de Política Monetaria",
            IndicatorKind::Reserves => "Reservas Internacionales",
            IndicatorKind::CountryRisk => "Riesgo País",
            IndicatorKind::StockIndex => "Índice Merval",
        }
    }

    pub fn from_string(s: &str) -> Option<IndicatorKind> {
        match s {
            "inflation" => Some(IndicatorKind::Inflation),
            "policy_rate" => Some(IndicatorKind::PolicyRate),
            "reserves" => Some(IndicatorKind::Reserves),
            "country_risk" => Some(IndicatorKind::CountryRisk),
            "stock_index" => Some(IndicatorKind::StockIndex),
            _ => None,
        }
    }
}
