//! Finnhub API client

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::records::{
    AnalystRatings, EarningsReport, EconomicEvent, ForexRate, Fundamentals, InsiderTransaction,
    Ohlc, StockQuote,
};

const PROVIDER: &str = "Finnhub";

/// Finnhub API client; every call requires `FINNHUB_API_KEY`
#[derive(Debug, Clone)]
pub struct FinnhubClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    c: f64,
    #[serde(default)]
    dp: Option<f64>,
    #[serde(default)]
    h: f64,
    #[serde(default)]
    l: f64,
    #[serde(default)]
    o: f64,
    #[serde(default)]
    pc: f64,
}

#[derive(Debug, Deserialize)]
struct CandleResponse {
    #[serde(default)]
    s: String,
    #[serde(default)]
    o: Vec<f64>,
    #[serde(default)]
    h: Vec<f64>,
    #[serde(default)]
    l: Vec<f64>,
    #[serde(default)]
    c: Vec<f64>,
}

impl CandleResponse {
    /// Latest bar, requiring status `ok` and at least one sample
    fn latest(&self) -> Option<Ohlc> {
        if self.s != "ok" || self.o.is_empty() {
            return None;
        }
        let last = self.o.len() - 1;
        Some(Ohlc {
            open: self.o[last],
            high: *self.h.get(last)?,
            low: *self.l.get(last)?,
            close: *self.c.get(last)?,
        })
    }
}

impl FinnhubClient {
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.finnhub_base_url.clone(),
            api_key: config.finnhub_api_key.clone(),
            timeout: config.request_timeout,
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(MarketError::MissingCredential(PROVIDER))
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let token = self.api_key()?.to_string();
        let url = format!("{}/{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .query(params)
            .query(&[("token", token)])
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        if status.as_u16() == 429 {
            return Err(MarketError::RateLimited { provider: PROVIDER });
        }
        Err(MarketError::HttpStatus {
            provider: PROVIDER,
            status: status.as_u16(),
        })
    }

    /// Current stock quote
    pub async fn quote(&self, symbol: &str) -> Result<StockQuote> {
        let data = self
            .get_json("quote", &[("symbol", symbol.to_uppercase())])
            .await?;
        let quote: QuoteResponse = serde_json::from_value(data)?;
        // Finnhub returns all-zero quotes for unknown symbols.
        if quote.c <= 0.0 {
            return Err(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "positive quote price",
            });
        }
        Ok(StockQuote {
            current: quote.c,
            percent_change: quote.dp.unwrap_or(0.0),
            high: quote.h,
            low: quote.l,
            open: quote.o,
            previous_close: quote.pc,
        })
    }

    /// Quote a forex symbol in one of Finnhub's pair formats
    ///
    /// Callers probe several formats in sequence; a zero rate means the
    /// format is not recognized and counts as failure.
    pub async fn forex_quote(&self, pair_symbol: &str) -> Result<ForexRate> {
        let data = self
            .get_json("quote", &[("symbol", pair_symbol.to_string())])
            .await?;
        let quote: QuoteResponse = serde_json::from_value(data)?;
        if quote.c <= 0.0 {
            return Err(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "positive forex rate",
            });
        }
        Ok(ForexRate {
            rate: quote.c,
            percent_change: quote.dp.unwrap_or(0.0),
            high: quote.h,
            low: quote.l,
        })
    }

    /// Fundamental metrics from the `stock/metric` endpoint
    pub async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        let data = self
            .get_json(
                "stock/metric",
                &[
                    ("symbol", symbol.to_uppercase()),
                    ("metric", "all".to_string()),
                ],
            )
            .await?;
        let metric = data
            .get("metric")
            .filter(|m| m.as_object().is_some_and(|o| !o.is_empty()))
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "metric",
            })?;
        let field = |key: &str| metric.get(key).and_then(Value::as_f64);
        Ok(Fundamentals {
            market_cap: field("marketCapitalization"),
            pe_ratio: field("peBasicExclExtraTTM"),
            eps: field("epsInclExtraItemsTTM"),
            beta: field("beta"),
        })
    }

    /// Most recent daily/weekly/monthly stock candle in a date range
    pub async fn stock_candle(
        &self,
        symbol: &str,
        resolution: &str,
        from: i64,
        to: i64,
    ) -> Result<Ohlc> {
        let data = self
            .get_json(
                "stock/candle",
                &[
                    ("symbol", symbol.to_uppercase()),
                    ("resolution", resolution.to_string()),
                    ("from", from.to_string()),
                    ("to", to.to_string()),
                ],
            )
            .await?;
        let candles: CandleResponse = serde_json::from_value(data)?;
        candles.latest().ok_or(MarketError::UnexpectedPayload {
            provider: PROVIDER,
            expected: "candle series",
        })
    }

    /// Latest forex candle for an OANDA-format pair symbol
    pub async fn forex_candle(
        &self,
        base: &str,
        quote: &str,
        resolution: &str,
        from: i64,
        to: i64,
    ) -> Result<Ohlc> {
        let symbol = format!("OANDA:{}_{}", base.to_uppercase(), quote.to_uppercase());
        let data = self
            .get_json(
                "forex/candle",
                &[
                    ("symbol", symbol),
                    ("resolution", resolution.to_string()),
                    ("from", from.to_string()),
                    ("to", to.to_string()),
                ],
            )
            .await?;
        let candles: CandleResponse = serde_json::from_value(data)?;
        candles.latest().ok_or(MarketError::UnexpectedPayload {
            provider: PROVIDER,
            expected: "candle series",
        })
    }

    /// Reported quarterly earnings, most recent first
    pub async fn earnings(&self, symbol: &str) -> Result<Vec<EarningsReport>> {
        let data = self
            .get_json("stock/earnings", &[("symbol", symbol.to_uppercase())])
            .await?;
        let reports = data.as_array().ok_or(MarketError::UnexpectedPayload {
            provider: PROVIDER,
            expected: "earnings array",
        })?;
        if reports.is_empty() {
            return Err(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "non-empty earnings array",
            });
        }
        Ok(reports
            .iter()
            .map(|report| EarningsReport {
                period: report
                    .get("period")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                actual: report.get("actual").and_then(Value::as_f64),
                estimate: report.get("estimate").and_then(Value::as_f64),
                surprise: report.get("surprise").and_then(Value::as_f64),
                surprise_percent: report.get("surprisePercent").and_then(Value::as_f64),
            })
            .collect())
    }

    /// Analyst recommendation counts for the most recent period
    pub async fn analyst_ratings(&self, symbol: &str) -> Result<AnalystRatings> {
        let data = self
            .get_json("stock/recommendation", &[("symbol", symbol.to_uppercase())])
            .await?;
        let latest = data
            .as_array()
            .and_then(|arr| arr.first())
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "recommendation array",
            })?;
        let count = |key: &str| {
            latest
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0)
        };
        Ok(AnalystRatings {
            period: latest
                .get("period")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            strong_buy: count("strongBuy"),
            buy: count("buy"),
            hold: count("hold"),
            sell: count("sell"),
            strong_sell: count("strongSell"),
        })
    }

    /// Recent insider transactions, capped at `limit`
    pub async fn insider_transactions(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<InsiderTransaction>> {
        let data = self
            .get_json(
                "stock/insider-transactions",
                &[("symbol", symbol.to_uppercase())],
            )
            .await?;
        let rows = data
            .get("data")
            .and_then(Value::as_array)
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "data",
            })?;
        Ok(rows
            .iter()
            .take(limit)
            .map(|row| InsiderTransaction {
                name: row
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                share: row.get("share").and_then(Value::as_i64),
                change: row.get("change").and_then(Value::as_i64),
                transaction_date: row
                    .get("transactionDate")
                    .and_then(Value::as_str)
                    .map(ToString::to_string),
                transaction_code: row
                    .get("transactionCode")
                    .and_then(Value::as_str)
                    .map(ToString::to_string),
            })
            .collect())
    }

    /// Upcoming/recent economic calendar events
    pub async fn economic_calendar(&self) -> Result<Vec<EconomicEvent>> {
        let data = self.get_json("calendar/economic", &[]).await?;
        let events = data
            .get("economicCalendar")
            .and_then(Value::as_array)
            .ok_or(MarketError::UnexpectedPayload {
                provider: PROVIDER,
                expected: "economicCalendar",
            })?;
        Ok(events
            .iter()
            .map(|event| EconomicEvent {
                country: event
                    .get("country")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                event: event
                    .get("event")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                impact: event
                    .get("impact")
                    .and_then(Value::as_str)
                    .map(ToString::to_string),
                actual: event.get("actual").and_then(Value::as_f64),
                estimate: event.get("estimate").and_then(Value::as_f64),
                prev: event.get("prev").and_then(Value::as_f64),
                time: event
                    .get("time")
                    .and_then(Value::as_str)
                    .map(ToString::to_string),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential() {
        let client = FinnhubClient::new(&MarketConfig::default());
        assert!(matches!(
            client.api_key(),
            Err(MarketError::MissingCredential("Finnhub"))
        ));
    }

    #[test]
    fn test_candle_latest_requires_ok_status() {
        let no_data: CandleResponse = serde_json::from_str(r#"{"s": "no_data"}"#).unwrap();
        assert!(no_data.latest().is_none());

        let ok: CandleResponse = serde_json::from_str(
            r#"{"s": "ok", "o": [1.0, 2.0], "h": [1.5, 2.5], "l": [0.5, 1.5], "c": [1.2, 2.2]}"#,
        )
        .unwrap();
        let bar = ok.latest().unwrap();
        assert_eq!(bar.open, 2.0);
        assert_eq!(bar.close, 2.2);
    }

    #[test]
    fn test_quote_parsing_tolerates_null_dp() {
        let quote: QuoteResponse =
            serde_json::from_str(r#"{"c": 170.5, "dp": null, "h": 171.0, "l": 169.0, "o": 170.0, "pc": 169.5}"#)
                .unwrap();
        assert_eq!(quote.c, 170.5);
        assert!(quote.dp.is_none());
    }
}
