//! Data resolution layer
//!
//! [`Markets`] owns one client per provider and exposes a fetch method per
//! (asset class, data kind) pair. Every method returns `Option`: provider
//! errors are logged and absorbed here, so callers only ever see presence or
//! absence of data.

mod crypto;
mod forex;
mod movers;
mod stock;
mod symbol;

use tracing::warn;

use crate::api::{
    AlphaVantageClient, CoinGeckoClient, CryptoCompareClient, ExchangeRateClient, FinnhubClient,
};
use crate::config::MarketConfig;
use crate::error::Result;

/// Facade over all market-data providers
#[derive(Debug, Clone)]
pub struct Markets {
    pub(crate) cryptocompare: CryptoCompareClient,
    pub(crate) coingecko: CoinGeckoClient,
    pub(crate) finnhub: FinnhubClient,
    pub(crate) alpha_vantage: AlphaVantageClient,
    pub(crate) exchange_rate: ExchangeRateClient,
}

impl Markets {
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            cryptocompare: CryptoCompareClient::new(config),
            coingecko: CoinGeckoClient::new(config),
            finnhub: FinnhubClient::new(config),
            alpha_vantage: AlphaVantageClient::new(config),
            exchange_rate: ExchangeRateClient::new(config),
        }
    }

    pub fn from_env() -> Self {
        Self::new(&MarketConfig::from_env())
    }
}

/// Convert a client result into presence/absence, logging the failure
pub(crate) fn absorb<T>(kind: &'static str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(kind, error = %err, "provider call failed");
            None
        }
    }
}
