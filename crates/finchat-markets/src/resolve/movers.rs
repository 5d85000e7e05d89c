//! Top market movers per asset class

use super::{absorb, Markets};
use crate::chain::FallbackChain;
use crate::records::{AssetClass, Mover};

/// Large-cap US symbols in descending market-cap order, swept for the
/// primary stock movers tier
const LARGE_CAPS: &[(&str, &str)] = &[
    ("AAPL", "Apple"),
    ("MSFT", "Microsoft"),
    ("NVDA", "NVIDIA"),
    ("GOOGL", "Alphabet"),
    ("AMZN", "Amazon"),
    ("META", "Meta Platforms"),
    ("BRK.B", "Berkshire Hathaway"),
    ("TSLA", "Tesla"),
    ("AVGO", "Broadcom"),
    ("JPM", "JPMorgan Chase"),
    ("V", "Visa"),
    ("WMT", "Walmart"),
    ("XOM", "Exxon Mobil"),
    ("UNH", "UnitedHealth"),
    ("MA", "Mastercard"),
];

/// Majors quoted against USD for the forex listing
const MAJOR_CURRENCIES: &[&str] = &["EUR", "JPY", "GBP", "CHF", "CAD", "AUD", "NZD", "CNY"];

impl Markets {
    /// Top `limit` assets of the class, by market capitalization where the
    /// provider exposes it
    pub async fn top_movers(&self, class: AssetClass, limit: u32) -> Option<Vec<Mover>> {
        match class {
            AssetClass::Crypto => absorb("top_movers", self.coingecko.top_movers(limit).await),
            AssetClass::Stock => self.top_stock_movers(limit).await,
            AssetClass::Forex => self.top_forex_movers(limit).await,
        }
    }

    async fn top_stock_movers(&self, limit: u32) -> Option<Vec<Mover>> {
        FallbackChain::new("stock_movers")
            .tier("Finnhub", async move {
                let mut movers = Vec::new();
                for (symbol, name) in LARGE_CAPS.iter().take(limit as usize) {
                    let Some(quote) = absorb("stock_movers", self.finnhub.quote(symbol).await)
                    else {
                        continue;
                    };
                    movers.push(Mover {
                        symbol: (*symbol).to_string(),
                        name: Some((*name).to_string()),
                        price: quote.current,
                        percent_change: quote.percent_change,
                        market_cap: None,
                    });
                }
                if movers.is_empty() {
                    None
                } else {
                    Some(movers)
                }
            })
            .tier("Alpha Vantage", async move {
                absorb(
                    "stock_movers",
                    self.alpha_vantage.top_gainers(limit as usize).await,
                )
            })
            .resolve()
            .await
    }

    async fn top_forex_movers(&self, limit: u32) -> Option<Vec<Mover>> {
        let rates = absorb("forex_movers", self.exchange_rate.latest_rates("USD").await)?;
        let movers: Vec<Mover> = MAJOR_CURRENCIES
            .iter()
            .filter_map(|currency| {
                let rate = rates.get(*currency)?;
                Some(Mover {
                    symbol: format!("USD/{currency}"),
                    name: None,
                    price: *rate,
                    percent_change: 0.0,
                    market_cap: None,
                })
            })
            .take(limit as usize)
            .collect();
        if movers.is_empty() {
            None
        } else {
            Some(movers)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_cap_universe_has_no_duplicates() {
        let mut symbols: Vec<&str> = LARGE_CAPS.iter().map(|(s, _)| *s).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), LARGE_CAPS.len());
    }
}
