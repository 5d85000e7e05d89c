//! CryptoCompare API client

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::records::{CoinMetadata, CryptoPriceOverview, ExchangeListing, Ohlc};

const PROVIDER: &str = "CryptoCompare";

/// CryptoCompare API client
///
/// Works without a credential at reduced rate limits; the key is attached as
/// a query parameter when configured.
#[derive(Debug, Clone)]
pub struct CryptoCompareClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl CryptoCompareClient {
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.cryptocompare_base_url.clone(),
            api_key: config.cryptocompare_api_key.clone(),
            timeout: config.request_timeout,
        }
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{path}", self.base_url);
        let mut request = self.client.get(&url).timeout(self.timeout).query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key.as_str())]);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MarketError::HttpStatus {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    /// Current price, 24h change, market cap and volume for a coin
    pub async fn price_overview(&self, symbol: &str) -> Result<CryptoPriceOverview> {
        let symbol = symbol.to_uppercase();
        let data = self
            .get_json(
                "pricemultifull",
                &[("fsyms", symbol.clone()), ("tsyms", "USD".to_string())],
            )
            .await?;

        let raw = data
            .get("RAW")
            .and_then(|r| r.get(&symbol))
            .and_then(|s| s.get("USD"))
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "RAW.<symbol>.USD",
            })?;

        Ok(CryptoPriceOverview {
            price: number(raw, "PRICE")?,
            percent_change_24h: number(raw, "CHANGEPCT24HOUR")?,
            market_cap_usd: number(raw, "MKTCAP")?,
            volume_24h_usd: number(raw, "VOLUME24HOURTO")?,
        })
    }

    /// Most recent daily OHLC bar
    ///
    /// `lookback_days` controls how much history is requested; only the
    /// latest bar is returned either way.
    pub async fn daily_ohlc(&self, symbol: &str, lookback_days: u32) -> Result<Ohlc> {
        let data = self
            .get_json(
                "v2/histoday",
                &[
                    ("fsym", symbol.to_uppercase()),
                    ("tsym", "USD".to_string()),
                    ("limit", lookback_days.to_string()),
                ],
            )
            .await?;

        let bars = data
            .get("Data")
            .and_then(|d| d.get("Data"))
            .and_then(Value::as_array)
            .filter(|bars| !bars.is_empty())
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "Data.Data",
            })?;

        let latest = &bars[bars.len() - 1];
        Ok(Ohlc {
            open: number(latest, "open")?,
            high: number(latest, "high")?,
            low: number(latest, "low")?,
            close: number(latest, "close")?,
        })
    }

    /// Top exchanges the coin trades on against USD
    pub async fn top_exchanges(&self, symbol: &str, limit: u32) -> Result<Vec<ExchangeListing>> {
        let symbol = symbol.to_uppercase();
        let data = self
            .get_json(
                "top/exchanges/full",
                &[
                    ("fsym", symbol.clone()),
                    ("tsym", "USD".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let exchanges = data
            .get("Data")
            .and_then(|d| d.get("Exchanges"))
            .or_else(|| data.get("Data"))
            .and_then(Value::as_array)
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "Data",
            })?;

        Ok(exchanges
            .iter()
            .map(|exchange| ExchangeListing {
                exchange_name: exchange
                    .get("exchange")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                pair: format!("{symbol}/USD"),
                volume_24h: exchange.get("volume24h").and_then(Value::as_f64),
                price: exchange.get("price").and_then(Value::as_f64),
            })
            .collect())
    }

    /// Descriptive metadata (algorithm, proof type, description) for a coin
    pub async fn coin_metadata(&self, symbol: &str) -> Result<CoinMetadata> {
        let symbol = symbol.to_uppercase();
        let data = self.get_json("coinlist", &[]).await?;

        let coin = data
            .get("Data")
            .and_then(|d| d.get(&symbol))
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "Data.<symbol>",
            })?;

        let field = |key: &str| {
            coin.get(key)
                .and_then(Value::as_str)
                .map(ToString::to_string)
        };

        Ok(CoinMetadata {
            symbol: field("Symbol").unwrap_or(symbol),
            name: field("CoinName"),
            full_name: field("FullName"),
            algorithm: field("Algorithm"),
            proof_type: field("ProofType"),
            description: field("Description"),
        })
    }
}

fn number(value: &Value, key: &str) -> Result<f64> {
    value
        .get(key)
        .and_then(Value::as_f64)
        .ok_or(MarketError::UnexpectedPayload {
            provider: PROVIDER,
            expected: "numeric field",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_without_credential() {
        let client = CryptoCompareClient::new(&MarketConfig::default());
        assert!(client.api_key.is_none());
        assert_eq!(client.base_url, "https://min-api.cryptocompare.com/data");
    }

    #[test]
    fn test_number_extraction() {
        let value = serde_json::json!({"PRICE": 42000.5, "NAME": "x"});
        assert_eq!(number(&value, "PRICE").ok(), Some(42000.5));
        assert!(number(&value, "NAME").is_err());
        assert!(number(&value, "MISSING").is_err());
    }
}
