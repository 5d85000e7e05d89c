//! CoinGecko API client

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::records::{AthAtl, Mover, SupplyInfo};

const PROVIDER: &str = "CoinGecko";

/// CoinGecko API client (keyless public API)
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

/// One candidate from the fuzzy search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchCoin {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchCoin>,
}

/// One row from the ranked market listing
#[derive(Debug, Clone, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap: Option<f64>,
}

impl CoinGeckoClient {
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.coingecko_base_url.clone(),
            timeout: config.request_timeout,
        }
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .query(params)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(MarketError::HttpStatus {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }

    /// Fuzzy search for coins matching a free-text query
    pub async fn search(&self, query: &str) -> Result<Vec<SearchCoin>> {
        let response = self
            .get("search", &[("query", query.to_string())])
            .await?;
        let data: SearchResponse = response.json().await?;
        Ok(data.coins)
    }

    /// One page of coins ranked by market capitalization, descending
    pub async fn markets_page(&self, per_page: u32, page: u32) -> Result<Vec<MarketCoin>> {
        let response = self
            .get(
                "coins/markets",
                &[
                    ("vs_currency", "usd".to_string()),
                    ("order", "market_cap_desc".to_string()),
                    ("per_page", per_page.to_string()),
                    ("page", page.to_string()),
                    ("sparkline", "false".to_string()),
                ],
            )
            .await?;
        Ok(response.json().await?)
    }

    /// Top coins by market cap as normalized mover entries
    pub async fn top_movers(&self, limit: u32) -> Result<Vec<Mover>> {
        let coins = self.markets_page(limit, 1).await?;
        Ok(coins
            .into_iter()
            .map(|coin| Mover {
                symbol: coin.symbol.to_uppercase(),
                name: Some(coin.name),
                price: coin.current_price.unwrap_or(0.0),
                percent_change: coin.price_change_percentage_24h.unwrap_or(0.0),
                market_cap: coin.market_cap,
            })
            .collect())
    }

    async fn coin_market_data(&self, coin_id: &str) -> Result<Value> {
        let response = self
            .get(
                &format!("coins/{coin_id}"),
                &[
                    ("localization", "false".to_string()),
                    ("tickers", "false".to_string()),
                    ("market_data", "true".to_string()),
                    ("community_data", "false".to_string()),
                    ("developer_data", "false".to_string()),
                    ("sparkline", "false".to_string()),
                ],
            )
            .await?;
        let data: Value = response.json().await?;
        data.get("market_data")
            .cloned()
            .filter(|md| md.is_object())
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "market_data",
            })
    }

    /// Supply metrics for a resolved coin id
    pub async fn supply_info(&self, coin_id: &str) -> Result<SupplyInfo> {
        let market_data = self.coin_market_data(coin_id).await?;
        Ok(SupplyInfo {
            circulating_supply: market_data.get("circulating_supply").and_then(Value::as_f64),
            total_supply: market_data.get("total_supply").and_then(Value::as_f64),
            max_supply: market_data.get("max_supply").and_then(Value::as_f64),
        })
    }

    /// All-time high/low in USD for a resolved coin id
    pub async fn ath_atl(&self, coin_id: &str) -> Result<AthAtl> {
        let market_data = self.coin_market_data(coin_id).await?;
        let usd = |key: &str| market_data.get(key).and_then(|v| v.get("usd")).cloned();

        let ath = usd("ath")
            .and_then(|v| v.as_f64())
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "market_data.ath.usd",
            })?;
        let atl = usd("atl")
            .and_then(|v| v.as_f64())
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "market_data.atl.usd",
            })?;

        Ok(AthAtl {
            ath,
            ath_date: usd("ath_date").and_then(|v| v.as_str().map(ToString::to_string)),
            atl,
            atl_date: usd("atl_date").and_then(|v| v.as_str().map(ToString::to_string)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_parsing() {
        let body = r#"{"coins": [{"id": "bitcoin", "symbol": "btc", "name": "Bitcoin"}]}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.coins.len(), 1);
        assert_eq!(parsed.coins[0].id, "bitcoin");
        assert_eq!(parsed.coins[0].symbol, "btc");
    }

    #[test]
    fn test_market_coin_tolerates_nulls() {
        let body = r#"{"id": "x", "symbol": "x", "name": "X", "current_price": null,
                       "price_change_percentage_24h": null, "market_cap": null}"#;
        let parsed: MarketCoin = serde_json::from_str(body).unwrap();
        assert!(parsed.current_price.is_none());
    }
}
