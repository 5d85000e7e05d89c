//! Deterministic pattern-based classifier
//!
//! Used whenever the LLM path is unavailable or returns something unusable.
//! The utterance is evaluated against an ordered decision list; the first
//! matching branch wins and produces a complete [`IntentRecord`].

use crate::entities::{extract_currency_pair, extract_symbol, guess_asset_type};
use crate::period::extract_time_period;
use crate::record::{AssetType, Intent, IntentRecord, Timeframe};
use regex::Regex;
use std::sync::OnceLock;

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid regex"))
        }
    };
}

cached_regex!(
    greeting_re,
    r"\b(?:hello|hi|hey|good\s+morning|good\s+afternoon|good\s+evening)\b"
);
cached_regex!(movers_re, r"\b(?:top|list|best)\s+(\d+)\b");
cached_regex!(chart_re, r"\b(?:chart|graph|plot|show\s+me|visualize)\b");
cached_regex!(supply_re, r"\b(?:supply|circulation|max\s*supply|total\s*supply)\b");
cached_regex!(ath_atl_re, r"\b(?:ath|atl|all\s*time\s*high|all\s*time\s*low)\b");
cached_regex!(exchange_re, r"\b(?:exchange|exchanges|trading\s*pairs?|where\s*to\s*buy)\b");
cached_regex!(metadata_re, r"\b(?:metadata|algorithm|proof\s*type|blockchain\s*info)\b");
cached_regex!(earnings_re, r"\b(?:earnings|quarterly|eps|annual\s*report)\b");
cached_regex!(
    fundamentals_re,
    r"\b(?:fundamentals|ratios|pe\s*ratio|market\s*cap|financial\s*health)\b"
);
cached_regex!(ratings_re, r"\b(?:analyst|ratings?|recommendations?|buy|sell|hold)\b");
cached_regex!(insider_re, r"\b(?:insider|insider\s*trading|insider\s*ownership)\b");
cached_regex!(technicals_re, r"\b(?:technical|technicals|rsi|sma|indicators?)\b");
cached_regex!(ohlc_re, r"\bohlc\b");
cached_regex!(price_re, r"\b(?:price|current|now|today|cost|worth|trading)\b");
cached_regex!(
    economic_re,
    r"\b(?:economic\s*data|economic\s*events|economic\s*calendar)\b"
);
cached_regex!(
    educational_re,
    r"\b(?:what\s+is|explain|tell\s+me\s+about|how\s+does|define)\b"
);
cached_regex!(price_word_re, r"\b(?:price|current|cost|worth)\b");
cached_regex!(historical_re, r"\b(?:historical|history|past)\b");

/// Classify an utterance without any LLM involvement
pub fn classify_fallback(utterance: &str) -> IntentRecord {
    let lower = utterance.to_lowercase();
    let symbol = extract_symbol(utterance);
    let guessed = symbol
        .as_deref()
        .and_then(|s| guess_asset_type(s, &lower));

    // a. Greetings
    if greeting_re().is_match(&lower) {
        return IntentRecord::new(Intent::GreetingConversation);
    }

    // b. Top-N movers by market cap
    if let Some(caps) = movers_re().captures(&lower) {
        let limit = caps[1].parse::<u32>().ok();
        let asset_type = if lower.contains("stock") {
            AssetType::Stock
        } else if lower.contains("forex") || lower.contains("currency") {
            AssetType::Forex
        } else {
            // "crypto" explicit or implied
            AssetType::Crypto
        };
        let mut record = IntentRecord::new(Intent::TopMarketMovers).with_asset_type(Some(asset_type));
        record.limit = limit;
        return record;
    }

    // c. Chart/visualization requests
    if chart_re().is_match(&lower) {
        let mut record = IntentRecord::new(Intent::Chart)
            .with_symbol(symbol)
            .with_asset_type(guessed);
        record.time_period = Some(extract_time_period(&lower));
        return record;
    }

    // d. Crypto-specific intents, only when the extracted symbol reads as crypto
    if guessed == Some(AssetType::Crypto) {
        let crypto_intent = if supply_re().is_match(&lower) {
            Some(Intent::CryptoSupplyInfo)
        } else if ath_atl_re().is_match(&lower) {
            Some(Intent::CryptoAthAtl)
        } else if exchange_re().is_match(&lower) {
            Some(Intent::CryptoExchangeInfo)
        } else if metadata_re().is_match(&lower) {
            Some(Intent::CryptoMetadata)
        } else {
            None
        };
        if let Some(intent) = crypto_intent {
            return IntentRecord::new(intent)
                .with_symbol(symbol)
                .with_asset_type(Some(AssetType::Crypto));
        }
    }

    // e. Stock-specific intents, symbol type unchecked
    let stock_intent = if earnings_re().is_match(&lower) {
        Some(Intent::StockEarnings)
    } else if fundamentals_re().is_match(&lower) {
        Some(Intent::StockFundamentals)
    } else if ratings_re().is_match(&lower) {
        Some(Intent::StockAnalystRatings)
    } else if insider_re().is_match(&lower) {
        Some(Intent::StockInsiderOwnership)
    } else if technicals_re().is_match(&lower) {
        Some(Intent::StockTechnicals)
    } else {
        None
    };
    if let Some(intent) = stock_intent {
        return IntentRecord::new(intent)
            .with_symbol(symbol)
            .with_asset_type(Some(AssetType::Stock));
    }

    // f. OHLC, asset class by guessed type (stock when ambiguous)
    if ohlc_re().is_match(&lower) && extract_currency_pair(utterance).is_none() {
        let intent = if guessed == Some(AssetType::Crypto) {
            Intent::CryptoOhlc
        } else {
            Intent::StockOhlc
        };
        let mut record = IntentRecord::new(intent)
            .with_symbol(symbol)
            .with_asset_type(guessed);
        record.timeframe = Some(Timeframe::Daily);
        return record;
    }

    // g. Generic price requests; when the guessed type is neither crypto nor
    // stock this branch intentionally falls through to the later branches
    // (historical behavior, ends at the educational default).
    if price_re().is_match(&lower) {
        match guessed {
            Some(AssetType::Crypto) => {
                return IntentRecord::new(Intent::CryptoPriceOverview)
                    .with_symbol(symbol)
                    .with_asset_type(Some(AssetType::Crypto));
            }
            Some(AssetType::Stock) => {
                return IntentRecord::new(Intent::StockPriceOverview)
                    .with_symbol(symbol)
                    .with_asset_type(Some(AssetType::Stock));
            }
            _ => {}
        }
    }

    // h. Forex pair detection against the upper-cased original text
    if let Some((base, quote)) = extract_currency_pair(utterance) {
        let intent = if ohlc_re().is_match(&lower) {
            Intent::ForexOhlc
        } else if historical_re().is_match(&lower) {
            Intent::ForexHistoricalRate
        } else {
            Intent::ForexExchangeRate
        };
        let mut record = IntentRecord::new(intent).with_pair(base, quote);
        if intent == Intent::ForexOhlc {
            record.timeframe = Some(Timeframe::Daily);
        }
        return record;
    }

    // i. Economic calendar
    if economic_re().is_match(&lower) {
        return IntentRecord::new(Intent::ForexEconomicData);
    }

    // j. Educational triggers, unless a price word makes this a data question
    if educational_re().is_match(&lower) && !price_word_re().is_match(&lower) {
        return IntentRecord::new(Intent::AnswerFinancialQuery).with_symbol(symbol);
    }

    // k. Default: educational, carrying whatever symbol was extracted
    IntentRecord::new(Intent::AnswerFinancialQuery).with_symbol(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TimePeriod;

    #[test]
    fn test_greeting() {
        let record = classify_fallback("hello there");
        assert_eq!(record.intent, Intent::GreetingConversation);
        assert!(record.asset_symbol.is_none());
    }

    #[test]
    fn test_greeting_word_boundary() {
        // "hi" inside another word is not a greeting
        let record = classify_fallback("explain hedging");
        assert_eq!(record.intent, Intent::AnswerFinancialQuery);
    }

    #[test]
    fn test_top_movers_stock() {
        let record = classify_fallback("top 5 stocks");
        assert_eq!(record.intent, Intent::TopMarketMovers);
        assert_eq!(record.asset_type, Some(AssetType::Stock));
        assert_eq!(record.limit, Some(5));
    }

    #[test]
    fn test_top_movers_defaults_to_crypto() {
        let record = classify_fallback("list 10 assets");
        assert_eq!(record.intent, Intent::TopMarketMovers);
        assert_eq!(record.asset_type, Some(AssetType::Crypto));
        assert_eq!(record.limit, Some(10));
    }

    #[test]
    fn test_chart_with_period() {
        let record = classify_fallback("bitcoin chart last 7 days");
        assert_eq!(record.intent, Intent::Chart);
        assert_eq!(record.asset_symbol.as_deref(), Some("BTC"));
        assert_eq!(record.asset_type, Some(AssetType::Crypto));
        assert_eq!(record.time_period, Some(TimePeriod::D7));
    }

    #[test]
    fn test_chart_defaults_to_30d() {
        let record = classify_fallback("show me AAPL graph");
        assert_eq!(record.intent, Intent::Chart);
        assert_eq!(record.time_period, Some(TimePeriod::D30));
    }

    #[test]
    fn test_crypto_supply() {
        let record = classify_fallback("BTC circulating supply");
        assert_eq!(record.intent, Intent::CryptoSupplyInfo);
        assert_eq!(record.asset_symbol.as_deref(), Some("BTC"));
    }

    #[test]
    fn test_supply_of_stock_symbol_is_not_crypto_supply() {
        // AAPL reads as stock, so the crypto-only branch must not fire
        let record = classify_fallback("AAPL supply");
        assert_ne!(record.intent, Intent::CryptoSupplyInfo);
    }

    #[test]
    fn test_crypto_ath() {
        let record = classify_fallback("ETH all time high");
        assert_eq!(record.intent, Intent::CryptoAthAtl);
    }

    #[test]
    fn test_stock_earnings() {
        let record = classify_fallback("apple earnings");
        assert_eq!(record.intent, Intent::StockEarnings);
        assert_eq!(record.asset_symbol.as_deref(), Some("AAPL"));
        assert_eq!(record.asset_type, Some(AssetType::Stock));
    }

    #[test]
    fn test_stock_fundamentals() {
        let record = classify_fallback("TSLA pe ratio");
        assert_eq!(record.intent, Intent::StockFundamentals);
    }

    #[test]
    fn test_stock_technicals() {
        let record = classify_fallback("MSFT rsi");
        assert_eq!(record.intent, Intent::StockTechnicals);
    }

    #[test]
    fn test_ohlc_crypto_vs_stock() {
        let record = classify_fallback("BTC ohlc");
        assert_eq!(record.intent, Intent::CryptoOhlc);
        assert_eq!(record.timeframe, Some(Timeframe::Daily));

        let record = classify_fallback("TSLA ohlc");
        assert_eq!(record.intent, Intent::StockOhlc);
    }

    #[test]
    fn test_price_overview_by_asset_class() {
        let record = classify_fallback("bitcoin price");
        assert_eq!(record.intent, Intent::CryptoPriceOverview);
        assert_eq!(record.asset_symbol.as_deref(), Some("BTC"));

        let record = classify_fallback("AAPL price now");
        assert_eq!(record.intent, Intent::StockPriceOverview);
        assert_eq!(record.asset_symbol.as_deref(), Some("AAPL"));
    }

    #[test]
    fn test_price_without_asset_type_falls_to_educational() {
        // Branch g intentionally falls through when no symbol was extracted;
        // the utterance lands on the educational default.
        let record = classify_fallback("price now please");
        assert_eq!(record.intent, Intent::AnswerFinancialQuery);
    }

    #[test]
    fn test_forex_exchange_rate() {
        let record = classify_fallback("EUR to USD");
        assert_eq!(record.intent, Intent::ForexExchangeRate);
        assert_eq!(record.base_currency.as_deref(), Some("EUR"));
        assert_eq!(record.quote_currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_forex_ohlc_and_historical() {
        let record = classify_fallback("EUR/USD ohlc");
        assert_eq!(record.intent, Intent::ForexOhlc);
        assert_eq!(record.timeframe, Some(Timeframe::Daily));

        let record = classify_fallback("GBP to JPY historical rate");
        assert_eq!(record.intent, Intent::ForexHistoricalRate);
    }

    #[test]
    fn test_economic_calendar() {
        let record = classify_fallback("economic calendar this week");
        assert_eq!(record.intent, Intent::ForexEconomicData);
        assert!(record.asset_symbol.is_none());
    }

    #[test]
    fn test_educational() {
        let record = classify_fallback("what is blockchain");
        assert_eq!(record.intent, Intent::AnswerFinancialQuery);
        assert!(record.asset_symbol.is_none());
        assert!(record.asset_type.is_none());
    }

    #[test]
    fn test_ticker_preserved_verbatim() {
        let record = classify_fallback("LINK");
        assert_eq!(record.asset_symbol.as_deref(), Some("LINK"));
    }

    #[test]
    fn test_default_is_educational() {
        let record = classify_fallback("hmm");
        assert_eq!(record.intent, Intent::AnswerFinancialQuery);
    }
}
