//! Crypto ticker to CoinGecko coin-id resolution

use tracing::debug;

use super::{absorb, Markets};

/// Well-known ticker to coin-id mappings, checked before any network call
const COIN_IDS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("SOL", "solana"),
    ("ADA", "cardano"),
    ("DOT", "polkadot"),
    ("MATIC", "polygon"),
    ("AVAX", "avalanche-2"),
    ("LINK", "chainlink"),
    ("UNI", "uniswap"),
    ("LTC", "litecoin"),
    ("BCH", "bitcoin-cash"),
    ("XRP", "ripple"),
    ("DOGE", "dogecoin"),
    ("SHIB", "shiba-inu"),
    ("TRX", "tron"),
    ("ATOM", "cosmos"),
    ("FTM", "fantom"),
    ("ALGO", "algorand"),
    ("VET", "vechain"),
    ("ICP", "internet-computer"),
    ("NEAR", "near"),
    ("FLOW", "flow"),
    ("MANA", "decentraland"),
    ("SAND", "the-sandbox"),
    ("APE", "apecoin"),
    ("CRO", "cronos"),
    ("LDO", "lido-dao"),
];

/// Pages of the ranked listing scanned when search misses
const LISTING_PAGES: u32 = 2;
const LISTING_PAGE_SIZE: u32 = 250;

impl Markets {
    /// Map a user-supplied ticker to the coin id CoinGecko endpoints require
    ///
    /// Static table first (no network for common assets), then the fuzzy
    /// search endpoint, then the ranked listing pages; each tier requires a
    /// case-insensitive exact ticker match. `None` means the symbol could not
    /// be resolved and callers must treat the data as unavailable.
    pub async fn resolve_coin_id(&self, symbol: &str) -> Option<String> {
        let upper = symbol.to_uppercase();
        if let Some((_, id)) = COIN_IDS.iter().find(|(ticker, _)| *ticker == upper) {
            return Some((*id).to_string());
        }

        if let Some(coins) = absorb("coin_search", self.coingecko.search(symbol).await) {
            if let Some(coin) = coins
                .iter()
                .find(|coin| coin.symbol.eq_ignore_ascii_case(symbol))
            {
                debug!(symbol, id = %coin.id, "resolved coin id via search");
                return Some(coin.id.clone());
            }
        }

        for page in 1..=LISTING_PAGES {
            let coins = absorb(
                "coin_listing",
                self.coingecko.markets_page(LISTING_PAGE_SIZE, page).await,
            )?;
            if let Some(coin) = coins
                .iter()
                .find(|coin| coin.symbol.eq_ignore_ascii_case(symbol))
            {
                debug!(symbol, id = %coin.id, page, "resolved coin id via listing");
                return Some(coin.id.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketConfig;
    use std::time::Duration;

    #[tokio::test]
    async fn test_static_table_hit_never_touches_network() {
        // An unroutable base URL would make any network attempt error out
        // slowly; the static tier must answer without trying.
        let config = MarketConfig {
            coingecko_base_url: "http://127.0.0.1:1/api/v3".to_string(),
            request_timeout: Duration::from_millis(100),
            ..MarketConfig::default()
        };
        let markets = Markets::new(&config);
        assert_eq!(markets.resolve_coin_id("btc").await.as_deref(), Some("bitcoin"));
        assert_eq!(markets.resolve_coin_id("LDO").await.as_deref(), Some("lido-dao"));
    }

    #[test]
    fn test_table_tickers_are_uppercase() {
        for (ticker, _) in COIN_IDS {
            assert_eq!(*ticker, ticker.to_uppercase());
        }
    }
}
