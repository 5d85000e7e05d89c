//! Plain-text rendering of replies
//!
//! Presentation only; everything interesting happened before the [`Reply`]
//! was produced.

use std::fmt::Write;

use crate::dispatcher::{MarketData, Reply};

/// Render a reply as terminal-friendly text
///
/// Educational replies render as a placeholder here; the caller is expected
/// to route them to an answerer when one is configured.
pub fn render(reply: &Reply) -> String {
    match reply {
        Reply::Greeting => {
            "Hello! Ask me about crypto, stock or forex data, or any financial concept."
                .to_string()
        }
        Reply::Educational { query } => {
            format!("That sounds like a general question about \"{query}\".")
        }
        Reply::Chart {
            symbol,
            period,
            class,
        } => format!(
            "Chart request noted: {symbol} over {} ({class:?}). Chart rendering is handled by the UI layer.",
            period.as_tag()
        ),
        Reply::MissingEntity { hint } => format!("Please specify {hint}."),
        Reply::Unavailable { subject } => {
            format!("Sorry, I couldn't fetch data for {subject} right now. Please try again later.")
        }
        Reply::Data(data) => render_data(data),
    }
}

fn render_data(data: &MarketData) -> String {
    match data {
        MarketData::CryptoPrice { symbol, overview } => format!(
            "{symbol}: ${:.2} ({:+.2}% 24h), market cap ${:.0}, 24h volume ${:.0}",
            overview.price,
            overview.percent_change_24h,
            overview.market_cap_usd,
            overview.volume_24h_usd
        ),
        MarketData::Supply { symbol, supply } => {
            let fmt = |value: Option<f64>| {
                value.map_or("unlimited".to_string(), |v| format!("{v:.0}"))
            };
            format!(
                "{symbol} supply: circulating {}, total {}, max {}",
                fmt(supply.circulating_supply),
                fmt(supply.total_supply),
                fmt(supply.max_supply)
            )
        }
        MarketData::AthAtl { symbol, range } => format!(
            "{symbol}: all-time high ${:.2} ({}), all-time low ${:.4} ({})",
            range.ath,
            range.ath_date.as_deref().unwrap_or("n/a"),
            range.atl,
            range.atl_date.as_deref().unwrap_or("n/a")
        ),
        MarketData::Ohlc { symbol, bar } => format!(
            "{symbol} OHLC: open {:.2}, high {:.2}, low {:.2}, close {:.2}",
            bar.open, bar.high, bar.low, bar.close
        ),
        MarketData::Exchanges { symbol, listings } => {
            let mut out = format!("Top exchanges for {symbol}:");
            for listing in listings {
                let _ = write!(
                    out,
                    "\n  {} ({})",
                    listing.exchange_name, listing.pair
                );
            }
            out
        }
        MarketData::Metadata { metadata } => format!(
            "{}: {} (algorithm {}, proof {})",
            metadata.symbol,
            metadata.full_name.as_deref().unwrap_or("unknown"),
            metadata.algorithm.as_deref().unwrap_or("n/a"),
            metadata.proof_type.as_deref().unwrap_or("n/a")
        ),
        MarketData::StockQuote { symbol, quote } => format!(
            "{symbol}: ${:.2} ({:+.2}%), day range {:.2}-{:.2}, prev close {:.2}",
            quote.current, quote.percent_change, quote.low, quote.high, quote.previous_close
        ),
        MarketData::Fundamentals {
            symbol,
            fundamentals,
        } => {
            let fmt = |value: Option<f64>| value.map_or("n/a".to_string(), |v| format!("{v:.2}"));
            format!(
                "{symbol}: market cap {}M, P/E {}, EPS {}, beta {}",
                fmt(fundamentals.market_cap),
                fmt(fundamentals.pe_ratio),
                fmt(fundamentals.eps),
                fmt(fundamentals.beta)
            )
        }
        MarketData::Earnings { symbol, reports } => {
            let mut out = format!("Recent earnings for {symbol}:");
            for report in reports.iter().take(4) {
                let _ = write!(
                    out,
                    "\n  {}: actual {:?} vs estimate {:?}",
                    report.period, report.actual, report.estimate
                );
            }
            out
        }
        MarketData::Ratings { symbol, ratings } => format!(
            "{symbol} analyst ratings ({}): {} strong buy, {} buy, {} hold, {} sell, {} strong sell",
            ratings.period,
            ratings.strong_buy,
            ratings.buy,
            ratings.hold,
            ratings.sell,
            ratings.strong_sell
        ),
        MarketData::Insiders {
            symbol,
            transactions,
        } => {
            let mut out = format!("Recent insider activity for {symbol}:");
            for tx in transactions {
                let _ = write!(
                    out,
                    "\n  {} changed {} shares on {}",
                    tx.name,
                    tx.change.unwrap_or(0),
                    tx.transaction_date.as_deref().unwrap_or("n/a")
                );
            }
            out
        }
        MarketData::Technicals { symbol, snapshot } => {
            let fmt = |value: Option<f64>| value.map_or("n/a".to_string(), |v| format!("{v:.2}"));
            format!(
                "{symbol} technicals: RSI(14) {}, SMA(20) {}",
                fmt(snapshot.rsi),
                fmt(snapshot.sma_20)
            )
        }
        MarketData::ForexRate { base, quote, rate } => format!(
            "{base}/{quote}: {:.4} ({:+.2}%), day range {:.4}-{:.4}",
            rate.rate, rate.percent_change, rate.low, rate.high
        ),
        MarketData::ForexBar { base, quote, bar } => format!(
            "{base}/{quote} OHLC: open {:.4}, high {:.4}, low {:.4}, close {:.4}",
            bar.open, bar.high, bar.low, bar.close
        ),
        MarketData::HistoricalRate { base, quote, rate } => {
            format!("{base}/{quote} closed at {:.4} on {}", rate.rate, rate.date)
        }
        MarketData::EconomicEvents { events } => {
            let mut out = "Upcoming economic events:".to_string();
            for event in events {
                let _ = write!(
                    out,
                    "\n  [{}] {}",
                    event.country, event.event
                );
            }
            out
        }
        MarketData::Movers { class, movers } => {
            let mut out = format!("Top {class:?} movers:");
            for (rank, mover) in movers.iter().enumerate() {
                let _ = write!(
                    out,
                    "\n  {}. {} ${:.2} ({:+.2}%)",
                    rank + 1,
                    mover.symbol,
                    mover.price,
                    mover.percent_change
                );
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finchat_markets::Ohlc;

    #[test]
    fn test_render_missing_entity() {
        let text = render(&Reply::MissingEntity {
            hint: "which stock",
        });
        assert_eq!(text, "Please specify which stock.");
    }

    #[test]
    fn test_render_unavailable() {
        let text = render(&Reply::Unavailable {
            subject: "BTC".to_string(),
        });
        assert!(text.contains("couldn't fetch data for BTC"));
    }

    #[test]
    fn test_render_ohlc() {
        let text = render(&Reply::Data(MarketData::Ohlc {
            symbol: "AAPL".to_string(),
            bar: Ohlc {
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
            },
        }));
        assert!(text.starts_with("AAPL OHLC:"));
    }
}
