//! Alpha Vantage API client

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::records::{AnalystRatings, EarningsReport, Fundamentals, Mover, Ohlc, StockQuote};

const PROVIDER: &str = "Alpha Vantage";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
///
/// The free tier allows 5 requests per minute; a process-wide limiter gates
/// every call so chains that fall through to this provider do not burn the
/// quota on bursts.
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageClient {
    pub fn new(config: &MarketConfig) -> Self {
        let per_minute = NonZeroU32::new(config.alpha_vantage_rate_limit)
            .unwrap_or(NonZeroU32::new(5).expect("nonzero literal"));
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));
        Self {
            client: Client::new(),
            base_url: config.alpha_vantage_base_url.clone(),
            api_key: config.alpha_vantage_api_key.clone(),
            timeout: config.request_timeout,
            rate_limiter,
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(MarketError::MissingCredential(PROVIDER))
    }

    async fn query(&self, function: &str, params: &[(&str, String)]) -> Result<Value> {
        let apikey = self.api_key()?.to_string();
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(&self.base_url)
            .timeout(self.timeout)
            .query(&[("function", function.to_string())])
            .query(params)
            .query(&[("apikey", apikey)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(MarketError::HttpStatus {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let data: Value = response.json().await?;
        // Alpha Vantage reports failures inside 200 bodies.
        if let Some(error) = data.get("Error Message") {
            return Err(MarketError::ProviderError {
                provider: PROVIDER,
                message: error.to_string(),
            });
        }
        if data.get("Note").is_some() || data.get("Information").is_some() {
            return Err(MarketError::RateLimited { provider: PROVIDER });
        }
        Ok(data)
    }

    /// Current quote via `GLOBAL_QUOTE`, remapped to the Finnhub-style shape
    pub async fn global_quote(&self, symbol: &str) -> Result<StockQuote> {
        let data = self
            .query("GLOBAL_QUOTE", &[("symbol", symbol.to_uppercase())])
            .await?;
        let quote = data
            .get("Global Quote")
            .filter(|q| q.as_object().is_some_and(|o| !o.is_empty()))
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "Global Quote",
            })?;

        let field = |key: &str| {
            quote
                .get(key)
                .and_then(Value::as_str)
                .and_then(parse_number)
                .ok_or(MarketError::UnexpectedPayload {
                    provider: PROVIDER,
                    expected: "quote field",
                })
        };

        Ok(StockQuote {
            current: field("05. price")?,
            percent_change: field("10. change percent").unwrap_or(0.0),
            high: field("03. high")?,
            low: field("04. low")?,
            open: field("02. open")?,
            previous_close: field("08. previous close")?,
        })
    }

    async fn overview(&self, symbol: &str) -> Result<Value> {
        let data = self
            .query("OVERVIEW", &[("symbol", symbol.to_uppercase())])
            .await?;
        if data.as_object().is_none_or(serde_json::Map::is_empty) {
            return Err(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "company overview",
            });
        }
        Ok(data)
    }

    /// Fundamental ratios via `OVERVIEW`, remapped to the Finnhub metric names
    pub async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        let overview = self.overview(symbol).await?;
        let field = |key: &str| {
            overview
                .get(key)
                .and_then(Value::as_str)
                .and_then(parse_number)
        };
        Ok(Fundamentals {
            market_cap: field("MarketCapitalization").map(|v| v / 1_000_000.0),
            pe_ratio: field("PERatio"),
            eps: field("EPS"),
            beta: field("Beta"),
        })
    }

    /// Analyst rating counts via the `AnalystRating*` overview fields
    pub async fn analyst_ratings(&self, symbol: &str) -> Result<AnalystRatings> {
        let overview = self.overview(symbol).await?;
        let count = |key: &str| {
            overview
                .get(key)
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<u32>().ok())
        };
        let strong_buy = count("AnalystRatingStrongBuy");
        let buy = count("AnalystRatingBuy");
        if strong_buy.is_none() && buy.is_none() {
            return Err(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "AnalystRating fields",
            });
        }
        Ok(AnalystRatings {
            period: overview
                .get("LatestQuarter")
                .and_then(Value::as_str)
                .unwrap_or("current")
                .to_string(),
            strong_buy: strong_buy.unwrap_or(0),
            buy: buy.unwrap_or(0),
            hold: count("AnalystRatingHold").unwrap_or(0),
            sell: count("AnalystRatingSell").unwrap_or(0),
            strong_sell: count("AnalystRatingStrongSell").unwrap_or(0),
        })
    }

    /// Daily bars in ascending date order
    pub async fn daily_series(&self, symbol: &str) -> Result<Vec<(String, Ohlc)>> {
        let data = self
            .query("TIME_SERIES_DAILY", &[("symbol", symbol.to_uppercase())])
            .await?;
        let series = data
            .get("Time Series (Daily)")
            .and_then(Value::as_object)
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "Time Series (Daily)",
            })?;

        let mut bars: Vec<(String, Ohlc)> = series
            .iter()
            .filter_map(|(date, values)| {
                Some((date.clone(), parse_series_bar(values)?))
            })
            .collect();
        bars.sort_by(|a, b| a.0.cmp(&b.0));
        if bars.is_empty() {
            return Err(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "daily bars",
            });
        }
        Ok(bars)
    }

    /// Latest hourly bar via `TIME_SERIES_INTRADAY`
    pub async fn intraday_latest(&self, symbol: &str) -> Result<Ohlc> {
        let data = self
            .query(
                "TIME_SERIES_INTRADAY",
                &[
                    ("symbol", symbol.to_uppercase()),
                    ("interval", "60min".to_string()),
                ],
            )
            .await?;
        let series = data
            .get("Time Series (60min)")
            .and_then(Value::as_object)
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "Time Series (60min)",
            })?;

        series
            .iter()
            .max_by(|a, b| a.0.cmp(b.0))
            .and_then(|(_, values)| parse_series_bar(values))
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "intraday bars",
            })
    }

    /// Reported quarterly earnings via `EARNINGS`, most recent first
    pub async fn quarterly_earnings(&self, symbol: &str) -> Result<Vec<EarningsReport>> {
        let data = self
            .query("EARNINGS", &[("symbol", symbol.to_uppercase())])
            .await?;
        let quarters = data
            .get("quarterlyEarnings")
            .and_then(Value::as_array)
            .filter(|arr| !arr.is_empty())
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "quarterlyEarnings",
            })?;
        let field = |row: &Value, key: &str| {
            row.get(key).and_then(Value::as_str).and_then(parse_number)
        };
        Ok(quarters
            .iter()
            .map(|row| EarningsReport {
                period: row
                    .get("fiscalDateEnding")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                actual: field(row, "reportedEPS"),
                estimate: field(row, "estimatedEPS"),
                surprise: field(row, "surprise"),
                surprise_percent: field(row, "surprisePercentage"),
            })
            .collect())
    }

    /// Current exchange rate via `CURRENCY_EXCHANGE_RATE`
    pub async fn exchange_rate(&self, base: &str, quote: &str) -> Result<f64> {
        let data = self
            .query(
                "CURRENCY_EXCHANGE_RATE",
                &[
                    ("from_currency", base.to_uppercase()),
                    ("to_currency", quote.to_uppercase()),
                ],
            )
            .await?;
        data.get("Realtime Currency Exchange Rate")
            .and_then(|e| e.get("5. Exchange Rate"))
            .and_then(Value::as_str)
            .and_then(parse_number)
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "Realtime Currency Exchange Rate",
            })
    }

    /// Latest hourly high/low for a currency pair via `FX_INTRADAY`
    pub async fn fx_intraday_high_low(&self, base: &str, quote: &str) -> Result<(f64, f64)> {
        let data = self
            .query(
                "FX_INTRADAY",
                &[
                    ("from_symbol", base.to_uppercase()),
                    ("to_symbol", quote.to_uppercase()),
                    ("interval", "60min".to_string()),
                ],
            )
            .await?;
        let series = data
            .get("Time Series FX (60min)")
            .and_then(Value::as_object)
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "Time Series FX (60min)",
            })?;
        let latest = series
            .iter()
            .max_by(|a, b| a.0.cmp(b.0))
            .map(|(_, values)| values)
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "fx bars",
            })?;
        let field = |key: &str| latest.get(key).and_then(Value::as_str).and_then(parse_number);
        match (field("2. high"), field("3. low")) {
            (Some(high), Some(low)) => Ok((high, low)),
            _ => Err(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "fx high/low",
            }),
        }
    }

    async fn latest_indicator(
        &self,
        function: &str,
        series_key: &str,
        value_key: &str,
        symbol: &str,
        time_period: u32,
    ) -> Result<f64> {
        let data = self
            .query(
                function,
                &[
                    ("symbol", symbol.to_uppercase()),
                    ("interval", "daily".to_string()),
                    ("time_period", time_period.to_string()),
                    ("series_type", "close".to_string()),
                ],
            )
            .await?;
        data.get(series_key)
            .and_then(Value::as_object)
            .and_then(|series| series.iter().max_by(|a, b| a.0.cmp(b.0)))
            .and_then(|(_, values)| values.get(value_key))
            .and_then(Value::as_str)
            .and_then(parse_number)
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "indicator series",
            })
    }

    /// Latest 14-period daily RSI
    pub async fn rsi(&self, symbol: &str) -> Result<f64> {
        self.latest_indicator("RSI", "Technical Analysis: RSI", "RSI", symbol, 14)
            .await
    }

    /// Latest 20-period daily SMA
    pub async fn sma_20(&self, symbol: &str) -> Result<f64> {
        self.latest_indicator("SMA", "Technical Analysis: SMA", "SMA", symbol, 20)
            .await
    }

    /// Biggest US gainers via `TOP_GAINERS_LOSERS`
    pub async fn top_gainers(&self, limit: usize) -> Result<Vec<Mover>> {
        let data = self.query("TOP_GAINERS_LOSERS", &[]).await?;
        let gainers = data
            .get("top_gainers")
            .and_then(Value::as_array)
            .filter(|arr| !arr.is_empty())
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "top_gainers",
            })?;
        Ok(gainers
            .iter()
            .take(limit)
            .filter_map(|row| {
                let field =
                    |key: &str| row.get(key).and_then(Value::as_str).and_then(parse_number);
                Some(Mover {
                    symbol: row.get("ticker")?.as_str()?.to_string(),
                    name: None,
                    price: field("price")?,
                    percent_change: field("change_percentage").unwrap_or(0.0),
                    market_cap: None,
                })
            })
            .collect())
    }
}

/// Parse Alpha Vantage's stringly-typed numbers, tolerating `%`, `+` and
/// thousands separators
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '%' | '+' | ','))
        .collect();
    cleaned.parse().ok()
}

fn parse_series_bar(values: &Value) -> Option<Ohlc> {
    let field = |key: &str| values.get(key).and_then(Value::as_str).and_then(parse_number);
    Some(Ohlc {
        open: field("1. open")?,
        high: field("2. high")?,
        low: field("3. low")?,
        close: field("4. close")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_handles_decorations() {
        assert_eq!(parse_number("1.2345"), Some(1.2345));
        assert_eq!(parse_number("+3.51%"), Some(3.51));
        assert_eq!(parse_number("-0.82%"), Some(-0.82));
        assert_eq!(parse_number("2,954,000,000"), Some(2_954_000_000.0));
        assert_eq!(parse_number("None"), None);
    }

    #[test]
    fn test_parse_series_bar() {
        let values = serde_json::json!({
            "1. open": "170.00",
            "2. high": "172.50",
            "3. low": "169.10",
            "4. close": "171.80",
            "5. volume": "55512345"
        });
        let bar = parse_series_bar(&values).unwrap();
        assert_eq!(bar.open, 170.0);
        assert_eq!(bar.close, 171.8);
    }

    #[test]
    fn test_missing_credential() {
        let client = AlphaVantageClient::new(&MarketConfig::default());
        assert!(matches!(
            client.api_key(),
            Err(MarketError::MissingCredential("Alpha Vantage"))
        ));
    }
}
