//! Typed intent record produced by the classifier

use serde::{Deserialize, Serialize};

/// The closed set of intents the assistant understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Greetings and small talk
    GreetingConversation,
    /// Educational/explanatory financial questions
    AnswerFinancialQuery,
    /// Price chart over a time period
    Chart,
    /// Top-N assets by market capitalization
    TopMarketMovers,

    // Cryptocurrency data
    CryptoPriceOverview,
    CryptoSupplyInfo,
    CryptoAthAtl,
    CryptoOhlc,
    CryptoExchangeInfo,
    CryptoMetadata,

    // Stock data
    StockPriceOverview,
    StockFundamentals,
    StockOhlc,
    StockEarnings,
    StockAnalystRatings,
    StockInsiderOwnership,
    StockTechnicals,

    // Forex data
    ForexExchangeRate,
    ForexOhlc,
    ForexHistoricalRate,
    ForexEconomicData,
}

impl Intent {
    /// Parse an intent from its wire tag (e.g. `"crypto_price_overview"`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(tag.trim().to_string())).ok()
    }

    /// The wire tag for this intent
    pub fn as_tag(&self) -> String {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(s)) => s,
            _ => String::new(),
        }
    }
}

/// Asset class of an extracted entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Crypto,
    Stock,
    /// Only produced by the top-movers intent
    Forex,
}

impl AssetType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "crypto" | "cryptocurrency" => Some(Self::Crypto),
            "stock" | "stocks" => Some(Self::Stock),
            "forex" | "currency" => Some(Self::Forex),
            _ => None,
        }
    }
}

/// Canonical chart/OHLC span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "7d")]
    D7,
    #[serde(rename = "30d")]
    D30,
    #[serde(rename = "90d")]
    D90,
    #[serde(rename = "1y")]
    Y1,
}

impl TimePeriod {
    /// Default span when the utterance carries no time phrase
    pub const DEFAULT: Self = Self::D30;

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "1d" => Some(Self::D1),
            "7d" => Some(Self::D7),
            "30d" => Some(Self::D30),
            "90d" => Some(Self::D90),
            "1y" => Some(Self::Y1),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::D1 => "1d",
            Self::D7 => "7d",
            Self::D30 => "30d",
            Self::D90 => "90d",
            Self::Y1 => "1y",
        }
    }

    /// Number of calendar days the span covers
    pub fn days(&self) -> i64 {
        match self {
            Self::D1 => 1,
            Self::D7 => 7,
            Self::D30 => 30,
            Self::D90 => 90,
            Self::Y1 => 365,
        }
    }
}

/// Bar granularity for OHLC fetch paths
///
/// Independent from [`TimePeriod`]: the two axes were introduced at different
/// times by different call paths and are kept separate for compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
}

impl Timeframe {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

/// Output of intent classification, consumed by the dispatcher
///
/// `intent` is always present; every other field is an explicit `Option` so
/// downstream code never probes for key existence. Constructed fresh per
/// request and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub intent: Intent,
    pub asset_symbol: Option<String>,
    pub asset_name: Option<String>,
    pub asset_type: Option<AssetType>,
    pub base_currency: Option<String>,
    pub quote_currency: Option<String>,
    pub time_period: Option<TimePeriod>,
    pub timeframe: Option<Timeframe>,
    pub limit: Option<u32>,
}

impl IntentRecord {
    /// Create a record with the given intent and all entity fields absent
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            asset_symbol: None,
            asset_name: None,
            asset_type: None,
            base_currency: None,
            quote_currency: None,
            time_period: None,
            timeframe: None,
            limit: None,
        }
    }

    /// Set both symbol and name to the same extracted token, when present
    pub(crate) fn with_symbol(mut self, symbol: Option<String>) -> Self {
        self.asset_name.clone_from(&symbol);
        self.asset_symbol = symbol;
        self
    }

    pub(crate) fn with_asset_type(mut self, asset_type: Option<AssetType>) -> Self {
        self.asset_type = asset_type;
        self
    }

    pub(crate) fn with_pair(mut self, base: String, quote: String) -> Self {
        self.base_currency = Some(base);
        self.quote_currency = Some(quote);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_tag_round_trip() {
        assert_eq!(
            Intent::from_tag("crypto_price_overview"),
            Some(Intent::CryptoPriceOverview)
        );
        assert_eq!(
            Intent::from_tag("answer_financial_query"),
            Some(Intent::AnswerFinancialQuery)
        );
        assert_eq!(Intent::from_tag("top_market_movers"), Some(Intent::TopMarketMovers));
        assert_eq!(Intent::from_tag("not_an_intent"), None);
        assert_eq!(Intent::CryptoAthAtl.as_tag(), "crypto_ath_atl");
        assert_eq!(Intent::GreetingConversation.as_tag(), "greeting_conversation");
    }

    #[test]
    fn test_time_period_tags() {
        assert_eq!(TimePeriod::from_tag("7d"), Some(TimePeriod::D7));
        assert_eq!(TimePeriod::from_tag("1Y"), Some(TimePeriod::Y1));
        assert_eq!(TimePeriod::from_tag("2w"), None);
        assert_eq!(TimePeriod::D90.as_tag(), "90d");
        assert_eq!(TimePeriod::Y1.days(), 365);
    }

    #[test]
    fn test_asset_type_aliases() {
        assert_eq!(AssetType::from_tag("cryptocurrency"), Some(AssetType::Crypto));
        assert_eq!(AssetType::from_tag("stocks"), Some(AssetType::Stock));
        assert_eq!(AssetType::from_tag("currency"), Some(AssetType::Forex));
        assert_eq!(AssetType::from_tag("bond"), None);
    }

    #[test]
    fn test_new_record_has_no_entities() {
        let record = IntentRecord::new(Intent::GreetingConversation);
        assert!(record.asset_symbol.is_none());
        assert!(record.base_currency.is_none());
        assert!(record.limit.is_none());
    }
}
