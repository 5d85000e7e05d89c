//! Provider configuration

use std::time::Duration;

/// Configuration for all market-data providers
///
/// Credentials are optional: a missing key degrades that provider to an
/// immediate failure, so fallback chains keep working with partial
/// credentials instead of crashing at startup.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub finnhub_api_key: Option<String>,
    pub alpha_vantage_api_key: Option<String>,
    pub cryptocompare_api_key: Option<String>,

    pub cryptocompare_base_url: String,
    pub coingecko_base_url: String,
    pub finnhub_base_url: String,
    pub alpha_vantage_base_url: String,
    pub exchange_rate_base_url: String,

    /// Per-request timeout applied to every outbound call
    pub request_timeout: Duration,

    /// Alpha Vantage requests per minute (free tier: 5)
    pub alpha_vantage_rate_limit: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            finnhub_api_key: None,
            alpha_vantage_api_key: None,
            cryptocompare_api_key: None,
            cryptocompare_base_url: "https://min-api.cryptocompare.com/data".to_string(),
            coingecko_base_url: "https://api.coingecko.com/api/v3".to_string(),
            finnhub_base_url: "https://finnhub.io/api/v1".to_string(),
            alpha_vantage_base_url: "https://www.alphavantage.co/query".to_string(),
            exchange_rate_base_url: "https://api.exchangerate-api.com/v4".to_string(),
            request_timeout: Duration::from_secs(15),
            alpha_vantage_rate_limit: 5,
        }
    }
}

impl MarketConfig {
    /// Load credentials from the environment, leaving base URLs at their
    /// defaults
    pub fn from_env() -> Self {
        Self {
            finnhub_api_key: std::env::var("FINNHUB_API_KEY").ok(),
            alpha_vantage_api_key: std::env::var("ALPHA_VANTAGE_API_KEY").ok(),
            cryptocompare_api_key: std::env::var("CRYPTOCOMPARE_API_KEY").ok(),
            ..Self::default()
        }
    }

    pub fn with_finnhub_key(mut self, key: impl Into<String>) -> Self {
        self.finnhub_api_key = Some(key.into());
        self
    }

    pub fn with_alpha_vantage_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    pub fn with_cryptocompare_key(mut self, key: impl Into<String>) -> Self {
        self.cryptocompare_api_key = Some(key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_credentials() {
        let config = MarketConfig::default();
        assert!(config.finnhub_api_key.is_none());
        assert!(config.alpha_vantage_api_key.is_none());
        assert!(config.cryptocompare_api_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_builder_setters() {
        let config = MarketConfig::default()
            .with_finnhub_key("fh")
            .with_request_timeout(Duration::from_secs(5));
        assert_eq!(config.finnhub_api_key.as_deref(), Some("fh"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
