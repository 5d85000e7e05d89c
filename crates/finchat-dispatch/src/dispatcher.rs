//! Intent-to-handler dispatch

use finchat_intent::{AssetType, Intent, IntentClassifier, IntentRecord, TimePeriod, Timeframe};
use finchat_markets::{
    AnalystRatings, AssetClass, AthAtl, BarInterval, CoinMetadata, CryptoPriceOverview,
    EarningsReport, EconomicEvent, ExchangeListing, ForexRate, Fundamentals, HistoricalRate,
    InsiderTransaction, Markets, Mover, Ohlc, StockQuote, SupplyInfo, TechnicalSnapshot,
};
use serde::Serialize;
use tracing::info;

const DEFAULT_MOVER_LIMIT: u32 = 5;
const ECONOMIC_COUNTRY: &str = "US";

/// Resolved market data, tagged by kind for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketData {
    CryptoPrice {
        symbol: String,
        overview: CryptoPriceOverview,
    },
    Supply {
        symbol: String,
        supply: SupplyInfo,
    },
    AthAtl {
        symbol: String,
        range: AthAtl,
    },
    Ohlc {
        symbol: String,
        bar: Ohlc,
    },
    Exchanges {
        symbol: String,
        listings: Vec<ExchangeListing>,
    },
    Metadata {
        metadata: CoinMetadata,
    },
    StockQuote {
        symbol: String,
        quote: StockQuote,
    },
    Fundamentals {
        symbol: String,
        fundamentals: Fundamentals,
    },
    Earnings {
        symbol: String,
        reports: Vec<EarningsReport>,
    },
    Ratings {
        symbol: String,
        ratings: AnalystRatings,
    },
    Insiders {
        symbol: String,
        transactions: Vec<InsiderTransaction>,
    },
    Technicals {
        symbol: String,
        snapshot: TechnicalSnapshot,
    },
    ForexRate {
        base: String,
        quote: String,
        rate: ForexRate,
    },
    ForexBar {
        base: String,
        quote: String,
        bar: Ohlc,
    },
    HistoricalRate {
        base: String,
        quote: String,
        rate: HistoricalRate,
    },
    EconomicEvents {
        events: Vec<EconomicEvent>,
    },
    Movers {
        class: AssetClass,
        movers: Vec<Mover>,
    },
}

/// Outcome of one dispatched utterance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum Reply {
    /// Small talk; answered locally
    Greeting,
    /// Educational question, forwarded to the presentation layer's answerer
    Educational { query: String },
    /// Chart request; rendering happens outside this crate
    Chart {
        symbol: String,
        period: TimePeriod,
        class: AssetClass,
    },
    /// Resolved market data
    Data(MarketData),
    /// The intent needs an entity the utterance did not carry
    MissingEntity { hint: &'static str },
    /// Every provider tier came back empty
    Unavailable { subject: String },
}

/// Routes classified utterances to the matching data fetch
pub struct Dispatcher {
    classifier: IntentClassifier,
    markets: Markets,
}

fn asset_class(asset_type: AssetType) -> AssetClass {
    match asset_type {
        AssetType::Crypto => AssetClass::Crypto,
        AssetType::Stock => AssetClass::Stock,
        AssetType::Forex => AssetClass::Forex,
    }
}

fn bar_interval(timeframe: Option<Timeframe>) -> BarInterval {
    match timeframe {
        Some(Timeframe::Weekly) => BarInterval::Weekly,
        Some(Timeframe::Monthly) => BarInterval::Monthly,
        Some(Timeframe::Daily) | None => BarInterval::Daily,
    }
}

impl Dispatcher {
    pub fn new(classifier: IntentClassifier, markets: Markets) -> Self {
        Self {
            classifier,
            markets,
        }
    }

    pub fn from_env() -> Self {
        Self::new(IntentClassifier::from_env(), Markets::from_env())
    }

    /// Classify an utterance and resolve the resulting intent
    pub async fn handle(&self, utterance: &str) -> Reply {
        let record = self.classifier.classify(utterance).await;
        info!(intent = %record.intent.as_tag(), "dispatching");
        self.dispatch(utterance, &record).await
    }

    /// Resolve an already-classified record
    #[allow(clippy::too_many_lines)]
    pub async fn dispatch(&self, utterance: &str, record: &IntentRecord) -> Reply {
        let symbol = record
            .asset_symbol
            .as_deref()
            .or(record.asset_name.as_deref())
            .map(str::to_uppercase);

        match record.intent {
            Intent::GreetingConversation => Reply::Greeting,
            Intent::AnswerFinancialQuery => Reply::Educational {
                query: utterance.to_string(),
            },

            Intent::Chart => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which asset to chart",
                    };
                };
                let Some(asset_type) = record.asset_type else {
                    return Reply::MissingEntity {
                        hint: "whether this is a crypto or stock asset",
                    };
                };
                Reply::Chart {
                    symbol,
                    period: record.time_period.unwrap_or(TimePeriod::DEFAULT),
                    class: asset_class(asset_type),
                }
            }

            Intent::TopMarketMovers => {
                let class = record
                    .asset_type
                    .map_or(AssetClass::Crypto, asset_class);
                let limit = record.limit.unwrap_or(DEFAULT_MOVER_LIMIT);
                match self.markets.top_movers(class, limit).await {
                    Some(movers) => Reply::Data(MarketData::Movers { class, movers }),
                    None => Reply::Unavailable {
                        subject: "top movers".to_string(),
                    },
                }
            }

            Intent::CryptoPriceOverview => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which cryptocurrency",
                    };
                };
                match self.markets.crypto_price_overview(&symbol).await {
                    Some(overview) => Reply::Data(MarketData::CryptoPrice { symbol, overview }),
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::CryptoSupplyInfo => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which cryptocurrency's supply",
                    };
                };
                match self.markets.crypto_supply_info(&symbol).await {
                    Some(supply) => Reply::Data(MarketData::Supply { symbol, supply }),
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::CryptoAthAtl => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which cryptocurrency's highs and lows",
                    };
                };
                match self.markets.crypto_ath_atl(&symbol).await {
                    Some(range) => Reply::Data(MarketData::AthAtl { symbol, range }),
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::CryptoOhlc => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which cryptocurrency's OHLC data",
                    };
                };
                let interval = bar_interval(record.timeframe);
                match self.markets.crypto_ohlc(&symbol, interval).await {
                    Some(bar) => Reply::Data(MarketData::Ohlc { symbol, bar }),
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::CryptoExchangeInfo => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which cryptocurrency's exchanges",
                    };
                };
                match self.markets.crypto_exchange_info(&symbol).await {
                    Some(listings) => Reply::Data(MarketData::Exchanges { symbol, listings }),
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::CryptoMetadata => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which cryptocurrency",
                    };
                };
                match self.markets.crypto_metadata(&symbol).await {
                    Some(metadata) => Reply::Data(MarketData::Metadata { metadata }),
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::StockPriceOverview => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity { hint: "which stock" };
                };
                match self.markets.stock_quote(&symbol).await {
                    Some(quote) => Reply::Data(MarketData::StockQuote { symbol, quote }),
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::StockFundamentals => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which stock's fundamentals",
                    };
                };
                match self.markets.stock_fundamentals(&symbol).await {
                    Some(fundamentals) => {
                        Reply::Data(MarketData::Fundamentals { symbol, fundamentals })
                    }
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::StockOhlc => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which stock's OHLC data",
                    };
                };
                let span_days = record.time_period.unwrap_or(TimePeriod::DEFAULT).days();
                match self.markets.stock_ohlc(&symbol, span_days).await {
                    Some(bar) => Reply::Data(MarketData::Ohlc { symbol, bar }),
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::StockEarnings => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which stock's earnings",
                    };
                };
                match self.markets.stock_earnings(&symbol).await {
                    Some(reports) => Reply::Data(MarketData::Earnings { symbol, reports }),
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::StockAnalystRatings => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which stock's ratings",
                    };
                };
                match self.markets.stock_analyst_ratings(&symbol).await {
                    Some(ratings) => Reply::Data(MarketData::Ratings { symbol, ratings }),
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::StockInsiderOwnership => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which stock's insider activity",
                    };
                };
                match self.markets.stock_insider_transactions(&symbol).await {
                    Some(transactions) => {
                        Reply::Data(MarketData::Insiders { symbol, transactions })
                    }
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::StockTechnicals => {
                let Some(symbol) = symbol else {
                    return Reply::MissingEntity {
                        hint: "which stock's indicators",
                    };
                };
                match self.markets.stock_technicals(&symbol).await {
                    Some(snapshot) => Reply::Data(MarketData::Technicals { symbol, snapshot }),
                    None => Reply::Unavailable { subject: symbol },
                }
            }

            Intent::ForexExchangeRate => {
                let Some((base, quote)) = currency_pair(record) else {
                    return Reply::MissingEntity {
                        hint: "the currency pair (e.g. EUR to USD)",
                    };
                };
                match self.markets.forex_rate(&base, &quote).await {
                    Some(rate) => Reply::Data(MarketData::ForexRate { base, quote, rate }),
                    None => Reply::Unavailable {
                        subject: format!("{base}/{quote}"),
                    },
                }
            }

            Intent::ForexOhlc => {
                let Some((base, quote)) = currency_pair(record) else {
                    return Reply::MissingEntity {
                        hint: "the currency pair for OHLC data",
                    };
                };
                let interval = bar_interval(record.timeframe);
                match self.markets.forex_ohlc(&base, &quote, interval).await {
                    Some(bar) => Reply::Data(MarketData::ForexBar { base, quote, bar }),
                    None => Reply::Unavailable {
                        subject: format!("{base}/{quote}"),
                    },
                }
            }

            Intent::ForexHistoricalRate => {
                let Some((base, quote)) = currency_pair(record) else {
                    return Reply::MissingEntity {
                        hint: "the currency pair and date",
                    };
                };
                match self.markets.forex_historical_rate(&base, &quote, None).await {
                    Some(rate) => Reply::Data(MarketData::HistoricalRate { base, quote, rate }),
                    None => Reply::Unavailable {
                        subject: format!("{base}/{quote}"),
                    },
                }
            }

            Intent::ForexEconomicData => {
                match self.markets.economic_events(ECONOMIC_COUNTRY).await {
                    Some(events) => Reply::Data(MarketData::EconomicEvents { events }),
                    None => Reply::Unavailable {
                        subject: "economic calendar".to_string(),
                    },
                }
            }
        }
    }
}

fn currency_pair(record: &IntentRecord) -> Option<(String, String)> {
    let base = record.base_currency.as_deref()?.to_uppercase();
    let quote = record.quote_currency.as_deref()?.to_uppercase();
    Some((base, quote))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_interval_defaults_to_daily() {
        assert_eq!(bar_interval(None), BarInterval::Daily);
        assert_eq!(bar_interval(Some(Timeframe::Weekly)), BarInterval::Weekly);
    }

    #[test]
    fn test_currency_pair_requires_both_sides() {
        let mut record = IntentRecord::new(Intent::ForexExchangeRate);
        record.base_currency = Some("eur".to_string());
        assert!(currency_pair(&record).is_none());

        record.quote_currency = Some("usd".to_string());
        assert_eq!(
            currency_pair(&record),
            Some(("EUR".to_string(), "USD".to_string()))
        );
    }
}
