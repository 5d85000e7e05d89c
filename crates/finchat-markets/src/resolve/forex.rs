//! Forex data-kind fetchers

use chrono::{Duration, NaiveDate, Utc};
use tracing::debug;

use super::{absorb, Markets};
use crate::chain::FallbackChain;
use crate::records::{BarInterval, EconomicEvent, ForexRate, HistoricalRate, Ohlc};

const ECONOMIC_EVENT_LIMIT: usize = 10;

/// Pair symbol formats Finnhub may recognize, probed in order
fn finnhub_pair_formats(base: &str, quote: &str) -> [String; 4] {
    let (base, quote) = (base.to_uppercase(), quote.to_uppercase());
    [
        format!("OANDA:{base}_{quote}"),
        format!("{base}{quote}=X"),
        format!("FOREX:{base}{quote}"),
        format!("{base}{quote}"),
    ]
}

impl Markets {
    /// Current exchange rate with day high/low
    ///
    /// Three tiers: Finnhub quote probing across four pair-symbol formats,
    /// Alpha Vantage realtime rate (with a silent intraday high/low
    /// enrichment), and the keyless exchangerate-api as last resort.
    pub async fn forex_rate(&self, base: &str, quote: &str) -> Option<ForexRate> {
        FallbackChain::new("forex_rate")
            .tier("Finnhub", async {
                for pair_symbol in finnhub_pair_formats(base, quote) {
                    if let Some(rate) =
                        absorb("forex_rate", self.finnhub.forex_quote(&pair_symbol).await)
                    {
                        debug!(pair = %pair_symbol, "forex format accepted");
                        return Some(rate);
                    }
                }
                None
            })
            .tier("Alpha Vantage", async {
                let rate = absorb(
                    "forex_rate",
                    self.alpha_vantage.exchange_rate(base, quote).await,
                )?;
                // Enrichment only; a miss here must not fail the tier.
                let (high, low) = self
                    .alpha_vantage
                    .fx_intraday_high_low(base, quote)
                    .await
                    .unwrap_or((rate, rate));
                Some(ForexRate {
                    rate,
                    percent_change: 0.0,
                    high,
                    low,
                })
            })
            .tier("exchangerate-api", async {
                let rate = absorb("forex_rate", self.exchange_rate.rate(base, quote).await)?;
                Some(ForexRate {
                    rate,
                    percent_change: 0.0,
                    high: rate,
                    low: rate,
                })
            })
            .resolve()
            .await
    }

    /// Most recent OHLC bar for a pair at the requested granularity
    pub async fn forex_ohlc(
        &self,
        base: &str,
        quote: &str,
        interval: BarInterval,
    ) -> Option<Ohlc> {
        let to = Utc::now().timestamp();
        let from = to - interval.lookback_days() * 86_400;
        absorb(
            "forex_ohlc",
            self.finnhub
                .forex_candle(base, quote, interval.finnhub_resolution(), from, to)
                .await,
        )
    }

    /// Closing rate on a specific day; defaults to yesterday
    pub async fn forex_historical_rate(
        &self,
        base: &str,
        quote: &str,
        date: Option<NaiveDate>,
    ) -> Option<HistoricalRate> {
        let date = date.unwrap_or_else(|| (Utc::now() - Duration::days(1)).date_naive());
        let midnight = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp();
        let bar = absorb(
            "forex_historical_rate",
            self.finnhub
                .forex_candle(base, quote, "D", midnight - 86_400, midnight + 86_400)
                .await,
        )?;
        Some(HistoricalRate {
            date: date.to_string(),
            rate: bar.close,
        })
    }

    /// Economic calendar events, filtered by country, capped at 10
    pub async fn economic_events(&self, country: &str) -> Option<Vec<EconomicEvent>> {
        let events = absorb(
            "economic_events",
            self.finnhub.economic_calendar().await,
        )?;
        let mut filtered: Vec<EconomicEvent> = events
            .into_iter()
            .filter(|event| event.country.eq_ignore_ascii_case(country))
            .collect();
        filtered.truncate(ECONOMIC_EVENT_LIMIT);
        Some(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_format_probe_order() {
        let formats = finnhub_pair_formats("eur", "usd");
        assert_eq!(
            formats,
            [
                "OANDA:EUR_USD".to_string(),
                "EURUSD=X".to_string(),
                "FOREX:EURUSD".to_string(),
                "EURUSD".to_string(),
            ]
        );
    }
}
