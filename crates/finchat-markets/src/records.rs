//! Normalized market data records
//!
//! Every provider client translates its wire schema into one of these shapes
//! before returning. Field-name reconciliation (`marketCapitalization` vs
//! `market_cap`, `c`/`dp`/`h`/`l` vs spelled-out names) happens inside the
//! clients, never downstream. A client either returns a fully-populated
//! record for its kind or an error, never a partial record.

use serde::{Deserialize, Serialize};

/// Asset class a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Crypto,
    Stock,
    Forex,
}

/// Bar granularity for OHLC fetch paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarInterval {
    Daily,
    Weekly,
    Monthly,
}

impl BarInterval {
    /// How many daily bars the interval spans
    pub fn lookback_days(self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }

    /// Finnhub candle resolution code
    pub fn finnhub_resolution(self) -> &'static str {
        match self {
            Self::Daily => "D",
            Self::Weekly => "W",
            Self::Monthly => "M",
        }
    }
}

/// Crypto price overview (current price plus 24h context)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoPriceOverview {
    pub price: f64,
    pub percent_change_24h: f64,
    pub market_cap_usd: f64,
    pub volume_24h_usd: f64,
}

/// Stock quote (current price plus day context)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub current: f64,
    pub percent_change: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub previous_close: f64,
}

/// A single OHLC bar, exactly these four fields, never a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Crypto supply metrics; `max_supply` is null for unlimited-supply assets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyInfo {
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
}

/// All-time high/low with dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthAtl {
    pub ath: f64,
    pub ath_date: Option<String>,
    pub atl: f64,
    pub atl_date: Option<String>,
}

/// Stock fundamental ratios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub eps: Option<f64>,
    pub beta: Option<f64>,
}

/// One reported earnings period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsReport {
    pub period: String,
    pub actual: Option<f64>,
    pub estimate: Option<f64>,
    pub surprise: Option<f64>,
    pub surprise_percent: Option<f64>,
}

/// Analyst recommendation counts for the most recent period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystRatings {
    pub period: String,
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub strong_sell: u32,
}

/// A single insider transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsiderTransaction {
    pub name: String,
    pub share: Option<i64>,
    pub change: Option<i64>,
    pub transaction_date: Option<String>,
    pub transaction_code: Option<String>,
}

/// Latest technical indicator values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub rsi: Option<f64>,
    pub sma_20: Option<f64>,
}

/// One exchange listing a coin trades on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeListing {
    pub exchange_name: String,
    pub pair: String,
    pub volume_24h: Option<f64>,
    pub price: Option<f64>,
}

/// Descriptive coin metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMetadata {
    pub symbol: String,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub algorithm: Option<String>,
    pub proof_type: Option<String>,
    pub description: Option<String>,
}

/// Current forex rate with day high/low
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForexRate {
    pub rate: f64,
    pub percent_change: f64,
    pub high: f64,
    pub low: f64,
}

/// Closing rate on a specific day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRate {
    pub date: String,
    pub rate: f64,
}

/// One economic calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicEvent {
    pub country: String,
    pub event: String,
    pub impact: Option<String>,
    pub actual: Option<f64>,
    pub estimate: Option<f64>,
    pub prev: Option<f64>,
    pub time: Option<String>,
}

/// One entry in a top-movers listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub symbol: String,
    pub name: Option<String>,
    pub price: f64,
    pub percent_change: f64,
    pub market_cap: Option<f64>,
}
