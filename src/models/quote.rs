use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// A buy/sell exchange-rate pair for one peso quote kind on one date.
// Unique per (kind, date); last write wins on refresh.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub id: Uuid,
    pub kind: String,
    pub date: NaiveDate,
    pub buy: BigDecimal,
    pub sell: BigDecimal,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    pub fn spread(&self) -> BigDecimal {
        &self.sell - &self.buy
    }

    /// Sell-over-buy premium in percent; 0 when the buy price is not positive.
    pub fn spread_pct(&self) -> f64 {
        let buy = self.buy.to_f64().unwrap_or(0.0);
        let sell = self.sell.to_f64().unwrap_or(0.0);
        if buy > 0.0 {
            (sell - buy) / buy * 100.0
        } else {
            0.0
        }
    }
}

/// The four peso exchange-rate kinds tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    Official,
    Blue,
    Mep,
    Ccl,
}

impl QuoteKind {
    pub const ALL: [QuoteKind; 4] = [
        QuoteKind::Official,
        QuoteKind::Blue,
        QuoteKind::Mep,
        QuoteKind::Ccl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteKind::Official => "official",
            QuoteKind::Blue => "blue",
            QuoteKind::Mep => "mep",
            QuoteKind::Ccl => "ccl",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            QuoteKind::Official => "Dólar Oficial",
            QuoteKind::Blue => "Dólar Blue",
            QuoteKind::Mep => "Dólar MEP",
            QuoteKind::Ccl => "Dólar CCL",
        }
    }

    // Path segment under /v1/dolares/ on the upstream API.
    pub fn endpoint(&self) -> &'static str {
        match self {
            QuoteKind::Official => "oficial",
            QuoteKind::Blue => "blue",
            QuoteKind::Mep => "bolsa",
            QuoteKind::Ccl => "contadoconliqui",
        }
    }

    pub fn from_string(s: &str) -> Option<QuoteKind> {
        match s {
            "official" => Some(QuoteKind::Official),
            "blue" => Some(QuoteKind::Blue),
            "mep" => Some(QuoteKind::Mep),
            "ccl" => Some(QuoteKind::Ccl),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn quote(buy: &str, sell: &str) -> Quote {
        Quote {
            id: Uuid::new_v4(),
            kind: "blue".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            buy: BigDecimal::from_str(buy).unwrap(),
            sell: BigDecimal::from_str(sell).unwrap(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn spread_pct_is_sell_over_buy_premium() {
        let q = quote("1000.00", "1050.00");
        assert!((q.spread_pct() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn spread_pct_with_zero_buy_is_zero() {
        let q = quote("0.00", "1050.00");
        assert_eq!(q.spread_pct(), 0.0);
    }

    #[test]
    fn kind_round_trips_through_string_code() {
        for kind in QuoteKind::ALL {
            assert_eq!(QuoteKind::from_string(kind.as_str()), Some(kind));
        }
        assert_eq!(QuoteKind::from_string("crypto"), None);
    }
}
