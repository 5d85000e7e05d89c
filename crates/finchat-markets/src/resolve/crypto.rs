//! Crypto data-kind fetchers

use super::{absorb, Markets};
use crate::records::{
    AthAtl, BarInterval, CoinMetadata, CryptoPriceOverview, ExchangeListing, Ohlc, SupplyInfo,
};

const EXCHANGE_LIMIT: u32 = 5;

impl Markets {
    /// Current price, 24h change, market cap and volume
    pub async fn crypto_price_overview(&self, symbol: &str) -> Option<CryptoPriceOverview> {
        absorb(
            "crypto_price_overview",
            self.cryptocompare.price_overview(symbol).await,
        )
    }

    /// Circulating/total/max supply
    pub async fn crypto_supply_info(&self, symbol: &str) -> Option<SupplyInfo> {
        let coin_id = self.resolve_coin_id(symbol).await?;
        absorb(
            "crypto_supply_info",
            self.coingecko.supply_info(&coin_id).await,
        )
    }

    /// All-time high/low with dates
    pub async fn crypto_ath_atl(&self, symbol: &str) -> Option<AthAtl> {
        let coin_id = self.resolve_coin_id(symbol).await?;
        absorb("crypto_ath_atl", self.coingecko.ath_atl(&coin_id).await)
    }

    /// Most recent OHLC bar at the requested granularity
    pub async fn crypto_ohlc(&self, symbol: &str, interval: BarInterval) -> Option<Ohlc> {
        let lookback = u32::try_from(interval.lookback_days()).unwrap_or(1);
        absorb(
            "crypto_ohlc",
            self.cryptocompare.daily_ohlc(symbol, lookback).await,
        )
    }

    /// Top exchanges the coin trades on
    pub async fn crypto_exchange_info(&self, symbol: &str) -> Option<Vec<ExchangeListing>> {
        absorb(
            "crypto_exchange_info",
            self.cryptocompare.top_exchanges(symbol, EXCHANGE_LIMIT).await,
        )
    }

    /// Descriptive coin metadata
    pub async fn crypto_metadata(&self, symbol: &str) -> Option<CoinMetadata> {
        absorb(
            "crypto_metadata",
            self.cryptocompare.coin_metadata(symbol).await,
        )
    }
}
