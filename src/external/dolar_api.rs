use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::time::Duration;

use crate::external::provider::ProviderError;
use crate::models::QuoteKind;

const DEFAULT_BASE_URL: &str = "https://dolarapi.com/v1";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the public peso exchange-rate API.
/// One GET per quote kind; no auth, no retries.
#[derive(Clone)]
pub struct DolarApiClient {
    client: reqwest::Client,
    base_url: String,
}

// Upstream field names are part of the contract.
#[derive(Debug, Deserialize)]
pub struct DolarQuotePayload {
    pub compra: BigDecimal,
    pub venta: BigDecimal,
}

impl DolarApiClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub async fn fetch_quote(&self, kind: QuoteKind) -> Result<DolarQuotePayload, ProviderError> {
        let url = format!("{}/dolares/{}", self.base_url, kind.endpoint());

        let resp = self
            .client
            .get(&url)
            .timeout(TIMEOUT)
            .header(reqwest::header::USER_AGENT, "pulso-dashboard/1.0")
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ProviderError::BadResponse(format!(
                "HTTP {} for {}",
                resp.status(),
                kind.as_str()
            )));
        }

        resp.json::<DolarQuotePayload>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

impl Default for DolarApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::ToPrimitive;

    #[test]
    fn payload_parses_upstream_shape() {
        // Real payloads carry extra fields we ignore.
        let body = r#"{
            "moneda": "USD",
            "casa": "blue",
            "nombre": "Blue",
            "compra": 1385,
            "venta": 1405,
            "fechaActualizacion": "2025-06-02T14:30:00.000Z"
        }"#;

        let payload: DolarQuotePayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.compra.to_f64().unwrap(), 1385.0);
        assert_eq!(payload.venta.to_f64().unwrap(), 1405.0);
    }
}
