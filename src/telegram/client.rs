//! Telegram Bot API client
//!
//! Talks to `https://api.telegram.org/bot<token>/<method>` with JSON bodies.
//! Updates are received with long polling.

use super::types::{GetUpdatesParams, SendMessageParams, SendPollParams};
use super::{ApiResponse, ChatId, DeliveryError, Message, Messenger, Update, User};
use crate::poll::{PollId, PollSpec};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Telegram Bot API base URL
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Update kinds the bot subscribes to
const ALLOWED_UPDATES: &[&str] = &["message", "poll_answer"];

/// Extra client-side time allowed on top of the long-poll timeout
const LONG_POLL_MARGIN: Duration = Duration::from_secs(10);

/// Configuration for the Telegram client
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Base URL for the Bot API
    pub api_url: String,
    /// Bot token
    pub token: String,
    /// Server-side long-poll timeout for getUpdates
    pub poll_timeout: Duration,
    /// Timeout for every other request
    pub request_timeout: Duration,
}

impl TelegramConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: TELEGRAM_API_URL.to_string(),
            token: token.into(),
            poll_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&crate::config::BotConfig> for TelegramConfig {
    fn from(config: &crate::config::BotConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            token: config.token.clone(),
            poll_timeout: Duration::from_secs(config.poll_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

/// Client for the Telegram Bot API
pub struct TelegramClient {
    config: TelegramConfig,
    client: Client,
}

impl TelegramClient {
    /// Create a new client with custom configuration
    pub fn with_config(config: TelegramConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.token,
            method
        )
    }

    /// Call a Bot API method and unwrap its result envelope
    async fn call<P, R>(
        &self,
        method: &str,
        params: &P,
        timeout: Option<Duration>,
    ) -> Result<R, DeliveryError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(self.method_url(method)).json(params);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        // The request URL embeds the token; keep it out of error messages
        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        let envelope: ApiResponse<R> = serde_json::from_str(&body).map_err(|e| {
            DeliveryError::InvalidResponse(format!("{} (HTTP {}): {}", method, status, e))
        })?;

        if !envelope.ok {
            return Err(DeliveryError::Api {
                code: envelope
                    .error_code
                    .unwrap_or_else(|| i64::from(status.as_u16())),
                description: envelope.description.unwrap_or_default(),
            });
        }

        envelope
            .result
            .ok_or_else(|| DeliveryError::InvalidResponse(format!("{}: missing result", method)))
    }

    /// Identify the bot; fails fast on an invalid token
    pub async fn get_me(&self) -> Result<User, DeliveryError> {
        self.call("getMe", &serde_json::json!({}), None).await
    }

    /// Long-poll for updates newer than `offset`
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, DeliveryError> {
        let params = GetUpdatesParams {
            offset,
            timeout: self.config.poll_timeout.as_secs(),
            allowed_updates: ALLOWED_UPDATES,
        };
        self.call(
            "getUpdates",
            &params,
            Some(self.config.poll_timeout + LONG_POLL_MARGIN),
        )
        .await
    }

    /// Send a plain text message
    pub async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<Message, DeliveryError> {
        let params = SendMessageParams { chat_id, text };
        self.call("sendMessage", &params, None).await
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), DeliveryError> {
        let message = self.send_message(chat_id, text).await?;
        tracing::debug!(chat_id, message_id = message.message_id, "Message sent");
        Ok(())
    }

    async fn send_poll(&self, chat_id: ChatId, poll: &PollSpec) -> Result<PollId, DeliveryError> {
        let params = SendPollParams {
            chat_id,
            question: &poll.question,
            options: &poll.options,
            is_anonymous: poll.is_anonymous,
        };
        let message: Message = self.call("sendPoll", &params, None).await?;
        message
            .poll
            .map(|p| p.id)
            .ok_or_else(|| DeliveryError::InvalidResponse("sendPoll: message has no poll".to_string()))
    }
}
