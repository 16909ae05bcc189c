use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

use crate::external::provider::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api.bcra.gob.ar/estadisticas/v2.0";
const TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the central-bank statistics API. Each monetary variable is
/// addressed by a numeric id; the first result element is the most recent.
#[derive(Clone)]
pub struct BcraClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct BcraResponse {
    #[serde(rename = "Results")]
    results: Vec<BcraDataPoint>,
}

#[derive(Debug, Deserialize)]
struct BcraDataPoint {
    fecha: String,
    valor: BigDecimal,
}

impl BcraClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Fetch the latest dated value of a monetary variable.
    /// The returned date is upstream-supplied, not "today".
    pub async fn fetch_latest(
        &self,
        variable_id: u32,
    ) -> Result<(NaiveDate, BigDecimal), ProviderError> {
        let url = format!("{}/DatosVariable/{}", self.base_url, variable_id);

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
                "HTTP {} for variable {}",
                resp.status(),
                variable_id
            )));
        }

        let body = resp
            .json::<BcraResponse>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let latest = body.results.into_iter().next().ok_or_else(|| {
            ProviderError::BadResponse(format!("empty results for variable {}", variable_id))
        })?;

        let date = NaiveDate::parse_from_str(&latest.fecha, "%Y-%m-%d")
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok((date, latest.valor))
    }
}

impl Default for BcraClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::ToPrimitive;

    #[test]
    fn response_parses_results_list() {
        let body = r#"{
            "status": 200,
            "Results": [
                {"idVariable": 1, "fecha": "2025-05-30", "valor": 38750.0},
                {"idVariable": 1, "fecha": "2025-05-29", "valor": 38500.0}
            ]
        }"#;

        let parsed: BcraResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].fecha, "2025-05-30");
        assert_eq!(parsed.results[0].valor.to_f64().unwrap(), 38750.0);
    }

    #[test]
    fn malformed_date_is_a_parse_error() {
        let err = NaiveDate::parse_from_str("30/05/2025", "%Y-%m-%d");
        assert!(err.is_err());
    }
}
