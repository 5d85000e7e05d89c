//! Error types for market data operations

use thiserror::Error;

/// Result type for market data operations
pub type Result<T> = std::result::Result<T, MarketError>;

/// Errors that can occur while fetching market data
///
/// These stay internal to the provider clients and the fallback chains;
/// resolvers absorb them into `None` so callers only ever see presence or
/// absence of data.
#[derive(Error, Debug)]
pub enum MarketError {
    /// The credential for a provider is not configured
    #[error("missing credential for {0}")]
    MissingCredential(&'static str),

    /// Provider returned a non-success HTTP status
    #[error("{provider} returned HTTP {status}")]
    HttpStatus { provider: &'static str, status: u16 },

    /// Provider embedded an error marker in a 200 response body
    #[error("{provider} error: {message}")]
    ProviderError {
        provider: &'static str,
        message: String,
    },

    /// Provider signalled a rate limit
    #[error("{provider} rate limit exceeded")]
    RateLimited { provider: &'static str },

    /// Response body was missing an expected key or had the wrong shape
    #[error("{provider} payload missing {expected}")]
    UnexpectedPayload {
        provider: &'static str,
        expected: &'static str,
    },

    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response was not valid JSON of the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MarketError::MissingCredential("Finnhub");
        assert_eq!(err.to_string(), "missing credential for Finnhub");

        let err = MarketError::UnexpectedPayload {
            provider: "CryptoCompare",
            expected: "RAW",
        };
        assert_eq!(err.to_string(), "CryptoCompare payload missing RAW");
    }
}
