//! exchangerate-api.com client (keyless last-resort forex source)

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};

const PROVIDER: &str = "exchangerate-api";

/// Keyless public rate-lookup client, used as the final forex fallback tier
#[derive(Debug, Clone)]
pub struct ExchangeRateClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

impl ExchangeRateClient {
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.exchange_rate_base_url.clone(),
            timeout: config.request_timeout,
        }
    }

    /// All rates against the given base currency
    pub async fn latest_rates(&self, base: &str) -> Result<HashMap<String, f64>> {
        let url = format!("{}/latest/{}", self.base_url, base.to_uppercase());
        let response = self.client.get(&url).timeout(self.timeout).send().await?;
        if !response.status().is_success() {
            return Err(MarketError::HttpStatus {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }
        let data: LatestResponse = response.json().await?;
        if data.rates.is_empty() {
            return Err(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "rates",
            });
        }
        Ok(data.rates)
    }

    /// Current rate for one pair
    pub async fn rate(&self, base: &str, quote: &str) -> Result<f64> {
        let rates = self.latest_rates(base).await?;
        rates
            .get(&quote.to_uppercase())
            .copied()
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "quote currency in rates",
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_response_parsing() {
        let body = r#"{"base": "EUR", "date": "2025-01-02", "rates": {"USD": 1.08, "GBP": 0.85}}"#;
        let parsed: LatestResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.rates.get("USD"), Some(&1.08));
    }
}
