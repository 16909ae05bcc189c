use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// A tracked international equity/ETF/index. Price bars hang off this row
// and are removed with it (ON DELETE CASCADE).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Instrument {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub class: String,
    pub country: String,
    pub sector: String,
    pub currency: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentClass {
    Equity,
    Etf,
    Index,
}

impl InstrumentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentClass::Equity => "equity",
            InstrumentClass::Etf => "etf",
            InstrumentClass::Index => "index",
        }
    }

    pub fn from_string(s: &str) -> Option<InstrumentClass> {
        match s {
            "equity" => Some(InstrumentClass::Equity),
            "etf" => Some(InstrumentClass::Etf),
            "index" => Some(InstrumentClass::Index),
            _ => None,
        }
    }
}
