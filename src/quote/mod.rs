//! Price fetcher module
//!
//! Fetches the current price (and market cap) of one asset from a
//! market-data API.

mod coinmarketcap;
mod format;
mod types;

pub use coinmarketcap::{CoinMarketCapClient, CoinMarketCapConfig, CMC_API_URL};
pub use format::{format_fixed, format_grouped};
pub use types::{PriceQuote, QuoteError};

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for quote source implementations
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the latest quote for `symbol`
    async fn fetch_quote(&self, symbol: &str) -> Result<PriceQuote, QuoteError>;

    /// Fetch price and market cap, failing when the market cap is absent or zero
    async fn fetch_market_cap(&self, symbol: &str) -> Result<(Decimal, Decimal), QuoteError> {
        let quote = self.fetch_quote(symbol).await?;
        match quote.market_cap {
            Some(market_cap) if !market_cap.is_zero() => Ok((quote.price, market_cap)),
            _ => Err(QuoteError::MalformedResponse(format!(
                "no market cap reported for {}",
                quote.symbol
            ))),
        }
    }
}
