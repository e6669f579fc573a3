//! Telegram Bot API types
//!
//! Only the fields the bot reads are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Envelope around every Bot API result
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

/// An incoming update from getUpdates
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub poll_answer: Option<PollAnswer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
    pub poll: Option<Poll>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Poll {
    pub id: String,
    pub question: String,
}

/// A user changed their answer in a non-anonymous poll
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollAnswer {
    pub poll_id: String,
    /// Absent when the vote was cast on behalf of a chat
    pub user: Option<User>,
    #[serde(default)]
    pub option_ids: Vec<u32>,
}

/// getUpdates parameters
#[derive(Debug, Serialize)]
pub(crate) struct GetUpdatesParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'a [&'a str],
}

/// sendMessage parameters
#[derive(Debug, Serialize)]
pub(crate) struct SendMessageParams<'a> {
    pub chat_id: i64,
    pub text: &'a str,
}

/// sendPoll parameters
#[derive(Debug, Serialize)]
pub(crate) struct SendPollParams<'a> {
    pub chat_id: i64,
    pub question: &'a str,
    pub options: &'a [String],
    pub is_anonymous: bool,
}
