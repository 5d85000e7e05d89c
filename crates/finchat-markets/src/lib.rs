//! Multi-provider market data with ordered fallback
//!
//! Provider clients in [`api`] each wrap one upstream REST API and translate
//! its wire schema into the normalized shapes in [`records`]. The [`resolve`]
//! layer composes clients into [`chain::FallbackChain`]s per data kind and
//! absorbs every failure into absence, so consumers only see `Option`s.

pub mod api;
pub mod chain;
pub mod config;
pub mod error;
pub mod records;
pub mod resolve;

pub use chain::FallbackChain;
pub use config::MarketConfig;
pub use error::{MarketError, Result};
pub use records::{
    AnalystRatings, AssetClass, AthAtl, BarInterval, CoinMetadata, CryptoPriceOverview,
    EarningsReport, EconomicEvent, ExchangeListing, ForexRate, Fundamentals, HistoricalRate,
    InsiderTransaction, Mover, Ohlc, StockQuote, SupplyInfo, TechnicalSnapshot,
};
pub use resolve::Markets;
