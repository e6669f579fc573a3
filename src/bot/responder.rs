//! Command responder
//!
//! Turns each supported command into a single outbound reply.

use super::Command;
use crate::poll::{PollId, PollSpec};
use crate::quote::{format_fixed, format_grouped, QuoteSource};
use crate::telegram::{ChatId, DeliveryError, Messenger};
use crate::telemetry::{increment_counter, CounterMetric};
use std::sync::Arc;

/// Reply used for any market-cap lookup failure
pub const MCAP_FAILURE_MESSAGE: &str = "Failed to retrieve market cap data.";

/// Decimal places shown by `/price`
const PRICE_PLACES: u32 = 10;
/// Decimal places for the price in `/mcap`
const MCAP_PRICE_PLACES: u32 = 12;
/// Decimal places for the market cap in `/mcap`
const MCAP_PLACES: u32 = 2;

/// Builds command replies from quote data and sends them
pub struct CommandResponder<Q: QuoteSource, M: Messenger> {
    quotes: Arc<Q>,
    messenger: Arc<M>,
    symbol: String,
}

impl<Q: QuoteSource, M: Messenger> CommandResponder<Q, M> {
    /// Create a responder for `symbol`
    pub fn new(quotes: Arc<Q>, messenger: Arc<M>, symbol: impl Into<String>) -> Self {
        Self {
            quotes,
            messenger,
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// `/start` greeting
    pub fn start(&self) -> String {
        format!("Hi! Use /price to get the current price of {}.", self.symbol)
    }

    /// `/price` reply; fetch failures become a user-facing message
    pub async fn price(&self) -> String {
        match self.quotes.fetch_quote(&self.symbol).await {
            Ok(quote) => format!(
                "The current price of {} is ${}\n Use /poll to start a poll!",
                self.symbol,
                format_fixed(quote.price, PRICE_PLACES)
            ),
            Err(e) => {
                tracing::warn!(symbol = %self.symbol, error = %e, "Price fetch failed");
                increment_counter(CounterMetric::QuoteError(e.kind()));
                format!("Failed to fetch the price. Please try again. Error: {}", e)
            }
        }
    }

    /// `/mcap` reply; failures are logged and answered with a fixed message
    pub async fn market_cap(&self) -> String {
        match self.quotes.fetch_market_cap(&self.symbol).await {
            Ok((price, market_cap)) => format!(
                "The current market cap of {} is ${} and the price is ${}.",
                self.symbol,
                format_grouped(market_cap, MCAP_PLACES),
                format_grouped(price, MCAP_PRICE_PLACES)
            ),
            Err(e) => {
                tracing::warn!(symbol = %self.symbol, error = %e, "Market cap fetch failed");
                increment_counter(CounterMetric::QuoteError(e.kind()));
                MCAP_FAILURE_MESSAGE.to_string()
            }
        }
    }

    /// `/poll`: create the prediction poll in `chat_id`
    pub async fn poll(&self, chat_id: ChatId) -> Result<PollId, DeliveryError> {
        let poll_id = self
            .messenger
            .send_poll(chat_id, &PollSpec::price_prediction())
            .await?;
        tracing::info!(chat_id, poll_id = %poll_id, "Poll created");
        Ok(poll_id)
    }

    /// Run `command` for `chat_id`, sending its reply.
    ///
    /// Returns the new poll's id for `/poll`.
    pub async fn handle(
        &self,
        chat_id: ChatId,
        command: Command,
    ) -> Result<Option<PollId>, DeliveryError> {
        increment_counter(CounterMetric::Command(command.name()));

        let reply = match command {
            Command::Start => self.start(),
            Command::Price => self.price().await,
            Command::MarketCap => self.market_cap().await,
            Command::Poll => return self.poll(chat_id).await.map(Some),
        };

        self.messenger.send_text(chat_id, &reply).await?;
        Ok(None)
    }
}
