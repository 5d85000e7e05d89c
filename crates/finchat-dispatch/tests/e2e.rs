//! End-to-end pipeline tests
//!
//! Run fully offline: classification uses the pattern fallback, and the
//! market layer is configured with unroutable endpoints and no credentials so
//! every provider tier fails fast. Scenarios that need live data assert the
//! classified record and the graceful-degradation path instead.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::time::Duration;

use finchat_dispatch::{Dispatcher, MarketData, Reply};
use finchat_intent::{AssetType, Intent, IntentClassifier, IntentRecord, TimePeriod};
use finchat_markets::{MarketConfig, Markets};

fn unroutable_config() -> MarketConfig {
    MarketConfig {
        cryptocompare_base_url: "http://127.0.0.1:9/data".to_string(),
        coingecko_base_url: "http://127.0.0.1:9/api/v3".to_string(),
        finnhub_base_url: "http://127.0.0.1:9/api/v1".to_string(),
        alpha_vantage_base_url: "http://127.0.0.1:9/query".to_string(),
        exchange_rate_base_url: "http://127.0.0.1:9/v4".to_string(),
        request_timeout: Duration::from_millis(200),
        ..MarketConfig::default()
    }
}

fn offline_dispatcher() -> Dispatcher {
    Dispatcher::new(IntentClassifier::fallback_only(), Markets::new(&unroutable_config()))
}

/// Serve one HTTP request with a canned JSON body, returning the base URL.
fn serve_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    std::thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while let Ok(n) = stream.read(&mut buf) {
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_bitcoin_price_classification_and_degradation() {
    let classifier = IntentClassifier::fallback_only();
    let record = classifier.classify("bitcoin price").await;
    assert_eq!(record.intent, Intent::CryptoPriceOverview);
    assert_eq!(record.asset_symbol.as_deref(), Some("BTC"));

    // With no reachable provider the pipeline degrades to a polite absence,
    // never an error.
    let reply = offline_dispatcher().handle("bitcoin price").await;
    assert!(matches!(reply, Reply::Unavailable { .. }));
}

#[tokio::test]
async fn test_bitcoin_price_resolves_from_provider_payload() {
    let base = serve_once(
        r#"{"RAW":{"BTC":{"USD":{"PRICE":65000.5,"CHANGEPCT24HOUR":2.4,"MKTCAP":1280000000000.0,"VOLUME24HOURTO":32000000000.0}}}}"#,
    );
    let config = MarketConfig {
        cryptocompare_base_url: format!("{base}/data"),
        request_timeout: Duration::from_secs(2),
        ..unroutable_config()
    };
    let dispatcher = Dispatcher::new(IntentClassifier::fallback_only(), Markets::new(&config));

    let reply = dispatcher.handle("bitcoin price").await;
    match reply {
        Reply::Data(MarketData::CryptoPrice { symbol, overview }) => {
            assert_eq!(symbol, "BTC");
            assert!((overview.price - 65000.5).abs() < f64::EPSILON);
            assert!((overview.percent_change_24h - 2.4).abs() < f64::EPSILON);
        }
        other => panic!("expected a crypto price record, got {other:?}"),
    }
}

#[tokio::test]
async fn test_educational_query_carries_no_entities() {
    let reply = offline_dispatcher().handle("what is blockchain").await;
    assert_eq!(
        reply,
        Reply::Educational {
            query: "what is blockchain".to_string()
        }
    );

    let record = IntentClassifier::fallback_only()
        .classify("what is blockchain")
        .await;
    assert_eq!(record.intent, Intent::AnswerFinancialQuery);
    assert!(record.asset_symbol.is_none());
    assert!(record.asset_type.is_none());
}

#[tokio::test]
async fn test_forex_pair_extraction() {
    let record = IntentClassifier::fallback_only().classify("EUR to USD").await;
    assert_eq!(record.intent, Intent::ForexExchangeRate);
    assert_eq!(record.base_currency.as_deref(), Some("EUR"));
    assert_eq!(record.quote_currency.as_deref(), Some("USD"));
}

#[tokio::test]
async fn test_top_five_stocks() {
    let record = IntentClassifier::fallback_only().classify("top 5 stocks").await;
    assert_eq!(record.intent, Intent::TopMarketMovers);
    assert_eq!(record.asset_type, Some(AssetType::Stock));
    assert_eq!(record.limit, Some(5));
}

#[tokio::test]
async fn test_stock_ohlc_chain_exhaustion_is_not_an_error() {
    // All three tiers (Alpha Vantage daily, Finnhub candle, Alpha Vantage
    // intraday) fail: no credentials, unroutable hosts. The reply must be a
    // calm absence.
    let mut record = IntentRecord::new(Intent::StockOhlc);
    record.asset_symbol = Some("AAPL".to_string());
    record.time_period = Some(TimePeriod::D7);

    let reply = offline_dispatcher().dispatch("AAPL ohlc last week", &record).await;
    assert_eq!(
        reply,
        Reply::Unavailable {
            subject: "AAPL".to_string()
        }
    );
}

#[tokio::test]
async fn test_missing_symbol_asks_for_one() {
    let record = IntentRecord::new(Intent::StockPriceOverview);
    let reply = offline_dispatcher().dispatch("price now please", &record).await;
    assert!(matches!(reply, Reply::MissingEntity { .. }));
}

#[tokio::test]
async fn test_greeting_short_circuits_without_data_fetch() {
    let reply = offline_dispatcher().handle("hello there").await;
    assert_eq!(reply, Reply::Greeting);
}
