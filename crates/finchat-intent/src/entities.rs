//! Entity extraction helpers for the deterministic fallback classifier

use crate::record::AssetType;
use regex::Regex;
use std::sync::OnceLock;

/// Well-known asset names mapped to their canonical symbols
const KNOWN_ASSETS: &[(&str, &str)] = &[
    ("bitcoin", "BTC"),
    ("ethereum", "ETH"),
    ("apple", "AAPL"),
    ("tesla", "TSLA"),
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("amazon", "AMZN"),
];

/// Context keywords that force an asset-type guess
const CRYPTO_KEYWORDS: &[&str] = &["crypto", "cryptocurrency", "bitcoin", "ethereum", "coin", "token"];
const STOCK_KEYWORDS: &[&str] = &["stock", "share", "equity", "company", "corporation"];

/// Common tickers used before falling back to the length heuristic
const CRYPTO_COMMON: &[&str] = &["btc", "eth", "ada", "sol", "doge", "ltc", "xrp", "bnb"];
const STOCK_COMMON: &[&str] = &["aapl", "tsla", "msft", "googl", "amzn", "nvda", "meta"];

fn ticker_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Z]{2,5}\b").expect("valid regex"))
}

fn currency_pair() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([A-Z]{3})\s*(?:TO|/|-)\s*([A-Z]{3})\b").expect("valid regex")
    })
}

/// Extract a symbol candidate from the raw utterance
///
/// First all-caps 2-5 letter run in the original text wins, verbatim; failing
/// that, the first well-known asset name (case-insensitive) is mapped to its
/// canonical symbol.
pub fn extract_symbol(utterance: &str) -> Option<String> {
    if let Some(m) = ticker_run().find(utterance) {
        return Some(m.as_str().to_string());
    }

    let lower = utterance.to_lowercase();
    KNOWN_ASSETS
        .iter()
        .find(|(name, _)| lower.contains(name))
        .map(|(_, symbol)| (*symbol).to_string())
}

/// Guess whether a symbol refers to a crypto asset or a stock
///
/// Context keywords anywhere in the utterance take precedence, then fixed
/// membership lists of common tickers, then a coarse length heuristic
/// (3 letters reads as crypto, 4+ as stock). The length heuristic is a known
/// source of misclassification for 4-letter crypto tickers.
pub fn guess_asset_type(symbol: &str, utterance_lower: &str) -> Option<AssetType> {
    if CRYPTO_KEYWORDS.iter().any(|kw| utterance_lower.contains(kw)) {
        return Some(AssetType::Crypto);
    }
    if STOCK_KEYWORDS.iter().any(|kw| utterance_lower.contains(kw)) {
        return Some(AssetType::Stock);
    }

    let symbol_lower = symbol.to_lowercase();
    if CRYPTO_COMMON.contains(&symbol_lower.as_str()) {
        return Some(AssetType::Crypto);
    }
    if STOCK_COMMON.contains(&symbol_lower.as_str()) {
        return Some(AssetType::Stock);
    }

    match symbol.len() {
        3 => Some(AssetType::Crypto),
        n if n >= 4 => Some(AssetType::Stock),
        _ => None,
    }
}

/// Extract a `XXX to|/|- YYY` currency pair, case-insensitively
pub fn extract_currency_pair(utterance: &str) -> Option<(String, String)> {
    let upper = utterance.to_uppercase();
    currency_pair()
        .captures(&upper)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_extracted_verbatim() {
        assert_eq!(extract_symbol("what about MSFT today").as_deref(), Some("MSFT"));
        assert_eq!(extract_symbol("BTC ohlc").as_deref(), Some("BTC"));
        // lowercase runs are not tickers
        assert_eq!(extract_symbol("show me something nice"), None);
    }

    #[test]
    fn test_known_names_map_to_canonical_symbols() {
        assert_eq!(extract_symbol("bitcoin price").as_deref(), Some("BTC"));
        assert_eq!(extract_symbol("apple earnings").as_deref(), Some("AAPL"));
        assert_eq!(extract_symbol("Tesla fundamentals").as_deref(), Some("TSLA"));
    }

    #[test]
    fn test_first_ticker_wins_over_known_names() {
        assert_eq!(extract_symbol("ETH or bitcoin?").as_deref(), Some("ETH"));
    }

    #[test]
    fn test_guess_from_context_keywords() {
        assert_eq!(guess_asset_type("XYZ", "some crypto thing xyz"), Some(AssetType::Crypto));
        assert_eq!(guess_asset_type("XYZ", "that company stock"), Some(AssetType::Stock));
    }

    #[test]
    fn test_guess_from_membership_lists() {
        assert_eq!(guess_asset_type("DOGE", "doge please"), Some(AssetType::Crypto));
        assert_eq!(guess_asset_type("NVDA", "nvda please"), Some(AssetType::Stock));
    }

    #[test]
    fn test_guess_length_heuristic() {
        assert_eq!(guess_asset_type("XLM", "xlm"), Some(AssetType::Crypto));
        assert_eq!(guess_asset_type("ORCL", "orcl"), Some(AssetType::Stock));
        assert_eq!(guess_asset_type("GE", "ge"), None);
    }

    #[test]
    fn test_currency_pair_forms() {
        assert_eq!(
            extract_currency_pair("EUR to USD"),
            Some(("EUR".to_string(), "USD".to_string()))
        );
        assert_eq!(
            extract_currency_pair("usd/jpy rate"),
            Some(("USD".to_string(), "JPY".to_string()))
        );
        assert_eq!(
            extract_currency_pair("GBP-CHF"),
            Some(("GBP".to_string(), "CHF".to_string()))
        );
        assert_eq!(extract_currency_pair("bitcoin price"), None);
    }
}
