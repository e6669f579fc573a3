//! Quote types

use rust_decimal::Decimal;
use thiserror::Error;

/// A price snapshot for one asset
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    /// Asset symbol (e.g., "BTC")
    pub symbol: String,
    /// Price in the configured fiat currency
    pub price: Decimal,
    /// Market capitalization, when the upstream reports one
    pub market_cap: Option<Decimal>,
}

/// Quote fetch errors
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The quote API could not be reached or returned a non-success status
    #[error("quote API unavailable: {0}")]
    UpstreamUnavailable(String),
    /// The quote API answered but the expected fields were absent
    #[error("malformed quote response: {0}")]
    MalformedResponse(String),
}

impl QuoteError {
    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            QuoteError::UpstreamUnavailable(_) => "upstream_unavailable",
            QuoteError::MalformedResponse(_) => "malformed_response",
        }
    }
}
