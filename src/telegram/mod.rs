//! Messaging transport module
//!
//! Telegram Bot API client and the `Messenger` seam used by the command
//! responder and the results announcer.

mod client;
mod types;

pub use client::{TelegramClient, TelegramConfig, TELEGRAM_API_URL};
pub use types::{ApiResponse, Chat, Message, Poll, PollAnswer, Update, User};

use crate::poll::{PollId, PollSpec};
use async_trait::async_trait;
use thiserror::Error;

/// Chat identifier (negative for groups and channels)
pub type ChatId = i64;

/// Message delivery errors
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request never produced a response (connect error, timeout)
    #[error("transport error: {0}")]
    Transport(String),
    /// The Bot API rejected the request
    #[error("Bot API error {code}: {description}")]
    Api { code: i64, description: String },
    /// The Bot API answered with something unexpected
    #[error("invalid Bot API response: {0}")]
    InvalidResponse(String),
}

/// Trait for outbound messaging implementations
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a text message
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), DeliveryError>;

    /// Create a poll, returning the platform's poll identifier
    async fn send_poll(&self, chat_id: ChatId, poll: &PollSpec) -> Result<PollId, DeliveryError>;
}
