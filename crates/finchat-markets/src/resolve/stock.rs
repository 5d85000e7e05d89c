//! Stock data-kind fetchers with multi-provider fallback

use chrono::Utc;

use super::{absorb, Markets};
use crate::chain::FallbackChain;
use crate::records::{
    AnalystRatings, EarningsReport, Fundamentals, InsiderTransaction, Ohlc, StockQuote,
    TechnicalSnapshot,
};

const INSIDER_LIMIT: usize = 5;

impl Markets {
    /// Current quote: Finnhub first, Alpha Vantage `GLOBAL_QUOTE` second
    pub async fn stock_quote(&self, symbol: &str) -> Option<StockQuote> {
        FallbackChain::new("stock_quote")
            .tier("Finnhub", async {
                absorb("stock_quote", self.finnhub.quote(symbol).await)
            })
            .tier("Alpha Vantage", async {
                absorb("stock_quote", self.alpha_vantage.global_quote(symbol).await)
            })
            .resolve()
            .await
    }

    /// Fundamental ratios: Finnhub metrics first, Alpha Vantage overview
    /// second
    pub async fn stock_fundamentals(&self, symbol: &str) -> Option<Fundamentals> {
        FallbackChain::new("stock_fundamentals")
            .tier("Finnhub", async {
                absorb("stock_fundamentals", self.finnhub.fundamentals(symbol).await)
            })
            .tier("Alpha Vantage", async {
                absorb(
                    "stock_fundamentals",
                    self.alpha_vantage.fundamentals(symbol).await,
                )
            })
            .resolve()
            .await
    }

    /// A single OHLC bar for the requested span
    ///
    /// Three tiers: Alpha Vantage daily series (with the 7-day aggregation
    /// special case), Finnhub candles over the span, Alpha Vantage intraday
    /// as the last resort. Only a 7-day span aggregates across bars; every
    /// other span yields the most recent single bar.
    pub async fn stock_ohlc(&self, symbol: &str, span_days: i64) -> Option<Ohlc> {
        let now = Utc::now().timestamp();
        FallbackChain::new("stock_ohlc")
            .tier("Alpha Vantage daily", async move {
                let bars = absorb("stock_ohlc", self.alpha_vantage.daily_series(symbol).await)?;
                let window_start = bars.len().saturating_sub(usize::try_from(span_days).ok()?);
                let window: Vec<Ohlc> = bars[window_start..].iter().map(|(_, bar)| *bar).collect();
                if span_days == 7 && window.len() == 7 {
                    Some(aggregate_span(&window))
                } else {
                    window.last().copied()
                }
            })
            .tier("Finnhub candle", async move {
                absorb(
                    "stock_ohlc",
                    self.finnhub
                        .stock_candle(symbol, "D", now - span_days * 86_400, now)
                        .await,
                )
            })
            .tier("Alpha Vantage intraday", async {
                absorb("stock_ohlc", self.alpha_vantage.intraday_latest(symbol).await)
            })
            .resolve()
            .await
    }

    /// Quarterly earnings: Finnhub first, Alpha Vantage `EARNINGS` second
    pub async fn stock_earnings(&self, symbol: &str) -> Option<Vec<EarningsReport>> {
        FallbackChain::new("stock_earnings")
            .tier("Finnhub", async {
                absorb("stock_earnings", self.finnhub.earnings(symbol).await)
            })
            .tier("Alpha Vantage", async {
                absorb(
                    "stock_earnings",
                    self.alpha_vantage.quarterly_earnings(symbol).await,
                )
            })
            .resolve()
            .await
    }

    /// Analyst ratings: Finnhub recommendations first, Alpha Vantage
    /// overview rating counts second
    pub async fn stock_analyst_ratings(&self, symbol: &str) -> Option<AnalystRatings> {
        FallbackChain::new("stock_analyst_ratings")
            .tier("Finnhub", async {
                absorb(
                    "stock_analyst_ratings",
                    self.finnhub.analyst_ratings(symbol).await,
                )
            })
            .tier("Alpha Vantage", async {
                absorb(
                    "stock_analyst_ratings",
                    self.alpha_vantage.analyst_ratings(symbol).await,
                )
            })
            .resolve()
            .await
    }

    /// Recent insider transactions (single provider)
    pub async fn stock_insider_transactions(
        &self,
        symbol: &str,
    ) -> Option<Vec<InsiderTransaction>> {
        absorb(
            "stock_insider",
            self.finnhub.insider_transactions(symbol, INSIDER_LIMIT).await,
        )
    }

    /// Latest RSI and SMA-20; present if at least one indicator resolved
    pub async fn stock_technicals(&self, symbol: &str) -> Option<TechnicalSnapshot> {
        let rsi = absorb("stock_technicals", self.alpha_vantage.rsi(symbol).await);
        let sma_20 = absorb("stock_technicals", self.alpha_vantage.sma_20(symbol).await);
        if rsi.is_none() && sma_20.is_none() {
            return None;
        }
        Some(TechnicalSnapshot { rsi, sma_20 })
    }
}

/// Reduce a span of daily bars to one synthetic bar
fn aggregate_span(bars: &[Ohlc]) -> Ohlc {
    Ohlc {
        open: bars.first().map_or(0.0, |bar| bar.open),
        close: bars.last().map_or(0.0, |bar| bar.close),
        high: bars.iter().map(|bar| bar.high).fold(f64::MIN, f64::max),
        low: bars.iter().map(|bar| bar.low).fold(f64::MAX, f64::min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> Ohlc {
        Ohlc {
            open,
            high,
            low,
            close,
        }
    }

    #[test]
    fn test_seven_day_aggregation_shape() {
        let bars = vec![
            bar(100.0, 105.0, 99.0, 104.0),
            bar(104.0, 108.0, 103.0, 107.0),
            bar(107.0, 110.0, 101.0, 102.0),
            bar(102.0, 103.0, 98.0, 99.0),
            bar(99.0, 112.0, 97.0, 111.0),
            bar(111.0, 113.0, 109.0, 110.0),
            bar(110.0, 111.0, 106.0, 108.0),
        ];
        let agg = aggregate_span(&bars);
        assert_eq!(agg.open, 100.0);
        assert_eq!(agg.close, 108.0);
        assert_eq!(agg.high, 113.0);
        assert_eq!(agg.low, 97.0);
    }

    #[test]
    fn test_single_bar_aggregates_to_itself() {
        let only = bar(10.0, 12.0, 9.0, 11.0);
        assert_eq!(aggregate_span(&[only]), only);
    }
}
