//! Classification prompt construction

/// Build the single-shot classification prompt for an utterance
///
/// Embeds the full intent taxonomy with descriptions, disambiguation
/// heuristics, entity-extraction instructions and the closed JSON schema the
/// model must return.
pub fn classification_prompt(utterance: &str) -> String {
    format!(
        r#"You are a financial intent classifier. Analyze the user query and return ONLY a JSON object.

AVAILABLE INTENTS:

EDUCATIONAL/EXPLANATORY:
- answer_financial_query: user wants to understand, learn about, or get explanations of financial concepts, companies, assets, or how things work

CONVERSATION:
- greeting_conversation: basic greetings, small talk, casual conversation

VISUALIZATION:
- chart: user wants to see price charts, graphs, or visual data for stocks/crypto over time periods

MARKET LISTS:
- top_market_movers: user wants the top N assets by market capitalization (crypto, stocks, or currencies)

CRYPTOCURRENCY DATA:
- crypto_price_overview: current price, market cap, volume, price changes
- crypto_supply_info: supply metrics (circulating, total, max supply)
- crypto_ath_atl: all-time high/low prices and dates
- crypto_ohlc: open/high/low/close trading data
- crypto_exchange_info: exchange listings and trading information
- crypto_metadata: technical details, algorithms, blockchain specifications

STOCK DATA:
- stock_price_overview: current stock price, daily changes, trading info
- stock_fundamentals: financial ratios, market cap, P/E, financial health
- stock_ohlc: open/high/low/close trading data
- stock_earnings: quarterly/annual earnings reports and results
- stock_analyst_ratings: buy/sell recommendations from analysts
- stock_insider_ownership: insider trading activities
- stock_technicals: technical indicators like RSI, SMA

FOREX DATA:
- forex_exchange_rate: currency conversion rates
- forex_ohlc: currency pair OHLC data
- forex_historical_rate: historical exchange rates
- forex_economic_data: economic events affecting currencies

Read every word of the query before deciding. Words like "what", "how",
"explain" usually mean answer_financial_query; "price", "rate" and similar
words usually mean one of the crypto, stock, or forex data intents.

INTENT RULES:
1. DATA REQUESTS (user wants current/specific numbers):
   - "bitcoin price", "price of bitcoin" -> crypto_price_overview
   - "apple stock price", "aapl price" -> stock_price_overview
   - "tesla earnings", "aapl quarterly results" -> stock_earnings
   - "apple fundamentals", "msft pe ratio" -> stock_fundamentals
   - "bitcoin ohlc" -> crypto_ohlc
   - "tesla ohlc data" -> stock_ohlc
   - "usd to eur", "dollar euro rate" -> forex_exchange_rate
2. VISUAL REQUESTS: "bitcoin chart", "show me apple graph" -> chart
3. EDUCATIONAL: "what is bitcoin", "explain blockchain", "whats btc" -> answer_financial_query
4. CONVERSATION: "hello", "how are you" -> greeting_conversation
5. LISTS: "top 5 cryptos", "best 10 stocks" -> top_market_movers (set limit)

ENTITY EXTRACTION:
- Extract ANY symbol/name mentioned (BTC, Bitcoin, AAPL, Apple, Tesla, EUR, USD, ...)
- Determine if it is crypto, stock, or currency based on context
- Map time expressions ("last 7 days", "past week", "1 week", "7d", "past month",
  "3 months", "1 year", "today") onto the standard periods: 1d, 7d, 30d, 90d, 1y.
  Default to 30d for charts when no time period is mentioned.
- For forex queries, extract base and quote currencies from phrases like
  "USD to EUR", "EUR/USD rate".

USER QUERY: "{utterance}"

Return ONLY this JSON:
{{"intent": "intent_name", "asset_name": "name_if_found", "asset_symbol": "SYMBOL_IF_FOUND", "asset_type": "crypto_or_stock_or_null", "base_currency": "BASE_IF_FOREX", "quote_currency": "QUOTE_IF_FOREX", "time_period": "period_if_chart", "timeframe": null, "limit": null}}

Be precise. If someone asks "what is the price of bitcoin" they want DATA, not
education. Tesla ohlc data is stock ohlc, not crypto ohlc."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Intent;

    #[test]
    fn test_prompt_embeds_utterance() {
        let prompt = classification_prompt("bitcoin price");
        assert!(prompt.contains(r#"USER QUERY: "bitcoin price""#));
    }

    #[test]
    fn test_prompt_names_every_intent_tag() {
        let prompt = classification_prompt("x");
        for intent in [
            Intent::GreetingConversation,
            Intent::AnswerFinancialQuery,
            Intent::Chart,
            Intent::TopMarketMovers,
            Intent::CryptoPriceOverview,
            Intent::CryptoSupplyInfo,
            Intent::CryptoAthAtl,
            Intent::CryptoOhlc,
            Intent::CryptoExchangeInfo,
            Intent::CryptoMetadata,
            Intent::StockPriceOverview,
            Intent::StockFundamentals,
            Intent::StockOhlc,
            Intent::StockEarnings,
            Intent::StockAnalystRatings,
            Intent::StockInsiderOwnership,
            Intent::StockTechnicals,
            Intent::ForexExchangeRate,
            Intent::ForexOhlc,
            Intent::ForexHistoricalRate,
            Intent::ForexEconomicData,
        ] {
            assert!(
                prompt.contains(&intent.as_tag()),
                "prompt missing {}",
                intent.as_tag()
            );
        }
    }
}
