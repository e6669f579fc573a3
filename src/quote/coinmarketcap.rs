//! CoinMarketCap client for price quotes
//!
//! Queries the `quotes/latest` endpoint for a single symbol. The response
//! nests the quote as `data.{SYMBOL}.quote.{FIAT}`.

use super::{PriceQuote, QuoteError, QuoteSource};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// CoinMarketCap API base URL
pub const CMC_API_URL: &str = "https://pro-api.coinmarketcap.com";

const QUOTES_PATH: &str = "/v1/cryptocurrency/quotes/latest";
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Configuration for the CoinMarketCap client
#[derive(Debug, Clone)]
pub struct CoinMarketCapConfig {
    /// Base URL for the API
    pub base_url: String,
    /// API key sent in the `X-CMC_PRO_API_KEY` header
    pub api_key: String,
    /// Fiat currency to convert into
    pub convert: String,
    /// Request timeout
    pub timeout: Duration,
}

impl CoinMarketCapConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: CMC_API_URL.to_string(),
            api_key: api_key.into(),
            convert: "USD".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&crate::config::QuoteConfig> for CoinMarketCapConfig {
    fn from(config: &crate::config::QuoteConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            convert: config.convert.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// `quotes/latest` response body
#[derive(Debug, Deserialize)]
struct QuotesResponse {
    data: Option<HashMap<String, CoinEntry>>,
}

/// v1 returns one object per symbol, newer versions an array.
/// `Many` goes first: serde would otherwise accept an array as a tuple-form `CoinData`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoinEntry {
    Many(Vec<CoinData>),
    Single(CoinData),
}

#[derive(Debug, Deserialize)]
struct CoinData {
    #[serde(default)]
    quote: HashMap<String, FiatQuote>,
}

#[derive(Debug, Deserialize)]
struct FiatQuote {
    price: Option<Decimal>,
    market_cap: Option<Decimal>,
}

/// Client for the CoinMarketCap quotes API
pub struct CoinMarketCapClient {
    config: CoinMarketCapConfig,
    client: Client,
}

impl CoinMarketCapClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: CoinMarketCapConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn quotes_url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), QUOTES_PATH)
    }

    /// Extract the quote for `symbol` from a response body
    fn parse_quote(symbol: &str, convert: &str, body: &str) -> Result<PriceQuote, QuoteError> {
        let response: QuotesResponse = serde_json::from_str(body)
            .map_err(|e| QuoteError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        let data = response
            .data
            .ok_or_else(|| QuoteError::MalformedResponse("missing `data` object".to_string()))?;

        let coin = match data.get(symbol) {
            Some(CoinEntry::Single(coin)) => coin,
            Some(CoinEntry::Many(coins)) => coins.first().ok_or_else(|| {
                QuoteError::MalformedResponse(format!("empty entry list for {}", symbol))
            })?,
            None => {
                return Err(QuoteError::MalformedResponse(format!(
                    "no entry for {}",
                    symbol
                )))
            }
        };

        let fiat = coin.quote.get(convert).ok_or_else(|| {
            QuoteError::MalformedResponse(format!("no {} quote for {}", convert, symbol))
        })?;

        let price = fiat.price.ok_or_else(|| {
            QuoteError::MalformedResponse(format!("missing price for {}", symbol))
        })?;

        Ok(PriceQuote {
            symbol: symbol.to_string(),
            price,
            market_cap: fiat.market_cap,
        })
    }
}

#[async_trait]
impl QuoteSource for CoinMarketCapClient {
    async fn fetch_quote(&self, symbol: &str) -> Result<PriceQuote, QuoteError> {
        let symbol = symbol.trim().to_uppercase();
        let url = self.quotes_url();

        tracing::debug!(url = %url, symbol = %symbol, "Fetching quote");

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol.as_str()), ("convert", self.config.convert.as_str())])
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| QuoteError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, symbol = %symbol, "Quote API returned error status");
            return Err(QuoteError::UpstreamUnavailable(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| QuoteError::UpstreamUnavailable(e.to_string()))?;

        let quote = Self::parse_quote(&symbol, &self.config.convert, &body)?;
        tracing::debug!(symbol = %quote.symbol, price = %quote.price, "Quote fetched");
        Ok(quote)
    }
}
