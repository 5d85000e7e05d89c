//! Provider API clients
//!
//! One client per upstream. Each method wraps a single HTTP call and
//! translates that provider's wire schema into a normalized record from
//! [`crate::records`]. Failures come back as [`crate::MarketError`]; the
//! resolver layer absorbs them into absence.

pub mod alpha_vantage;
pub mod coingecko;
pub mod cryptocompare;
pub mod exchange_rate;
pub mod finnhub;

pub use alpha_vantage::AlphaVantageClient;
pub use coingecko::CoinGeckoClient;
pub use cryptocompare::CryptoCompareClient;
pub use exchange_rate::ExchangeRateClient;
pub use finnhub::FinnhubClient;
