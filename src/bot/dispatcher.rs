//! Update dispatcher
//!
//! Routes incoming updates: commands go to the responder, poll answers to
//! the vote store. Failures are logged and never stop the loop.

use super::{Command, CommandResponder};
use crate::poll::VoteStore;
use crate::quote::QuoteSource;
use crate::telegram::{Message, Messenger, PollAnswer, TelegramClient, Update};
use crate::telemetry::{increment_counter, CounterMetric};
use std::time::Duration;

/// Delay before polling again after a failed getUpdates
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Dispatches updates to the responder and the vote store
pub struct Dispatcher<Q: QuoteSource, M: Messenger> {
    responder: CommandResponder<Q, M>,
    votes: VoteStore,
    bot_username: Option<String>,
    error_backoff: Duration,
}

impl<Q: QuoteSource, M: Messenger> Dispatcher<Q, M> {
    pub fn new(responder: CommandResponder<Q, M>, votes: VoteStore) -> Self {
        Self {
            responder,
            votes,
            bot_username: None,
            error_backoff: POLL_ERROR_BACKOFF,
        }
    }

    /// Delay before polling again after a failed getUpdates
    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    /// Only accept `/cmd@name` suffixes naming this bot
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Handle one update
    pub async fn handle_update(&self, update: Update) {
        if let Some(message) = update.message {
            self.handle_message(message).await;
        } else if let Some(answer) = update.poll_answer {
            self.handle_poll_answer(answer).await;
        } else {
            tracing::trace!(update_id = update.update_id, "Ignoring update");
        }
    }

    async fn handle_message(&self, message: Message) {
        let Some(text) = message.text.as_deref() else {
            return;
        };
        let Some(command) = Command::parse(text, self.bot_username.as_deref()) else {
            return;
        };

        let chat_id = message.chat.id;
        tracing::info!(chat_id, command = %command, "Handling command");

        match self.responder.handle(chat_id, command).await {
            Ok(Some(poll_id)) => {
                tracing::debug!(chat_id, poll_id = %poll_id, "Tracking answers for new poll");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(chat_id, command = %command, error = %e, "Failed to deliver reply");
            }
        }
    }

    async fn handle_poll_answer(&self, answer: PollAnswer) {
        let Some(user) = answer.user else {
            tracing::debug!(poll_id = %answer.poll_id, "Ignoring poll answer without a user");
            return;
        };

        match self
            .votes
            .record_answer(&answer.poll_id, user.id, &answer.option_ids)
            .await
        {
            Ok(()) => {
                increment_counter(CounterMetric::VoteRecorded);
                tracing::debug!(
                    poll_id = %answer.poll_id,
                    user_id = user.id,
                    options = ?answer.option_ids,
                    "Recorded poll answer"
                );
            }
            Err(e) => {
                increment_counter(CounterMetric::VoteRejected);
                tracing::warn!(
                    poll_id = %answer.poll_id,
                    user_id = user.id,
                    error = %e,
                    "Rejected poll answer"
                );
            }
        }
    }

    /// Long-poll `client` for updates until the task is cancelled
    pub async fn run(&self, client: &TelegramClient) {
        let mut offset: Option<i64> = None;
        tracing::info!(symbol = %self.responder.symbol(), "Polling for updates");

        loop {
            let updates = match client.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!(error = %e, "getUpdates failed, backing off");
                    tokio::time::sleep(self.error_backoff).await;
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);
                self.handle_update(update).await;
            }
        }
    }
}
