//! Periodic poll result broadcaster

use crate::poll::{PollId, Tally, VoteStore};
use crate::telegram::{ChatId, Messenger};
use crate::telemetry::{increment_counter, CounterMetric};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Outcome of one announce cycle
#[derive(Debug, Clone)]
pub struct AnnounceReport {
    /// Polls whose summary was delivered (and cleared)
    pub delivered: Vec<PollId>,
    /// Polls whose summary failed and were kept for the next cycle
    pub failed: Vec<PollId>,
    pub announced_at: DateTime<Utc>,
}

impl AnnounceReport {
    pub fn is_empty(&self) -> bool {
        self.delivered.is_empty() && self.failed.is_empty()
    }
}

/// Broadcasts poll results to a fixed chat
pub struct ResultsAnnouncer<M: Messenger> {
    votes: VoteStore,
    messenger: Arc<M>,
    chat_id: ChatId,
}

impl<M: Messenger + 'static> ResultsAnnouncer<M> {
    pub fn new(votes: VoteStore, messenger: Arc<M>, chat_id: ChatId) -> Self {
        Self {
            votes,
            messenger,
            chat_id,
        }
    }

    /// Run one announce cycle.
    ///
    /// All polls are taken out of the store up front; a poll whose summary
    /// cannot be delivered is put back so the next cycle retries it.
    pub async fn announce_once(&self) -> AnnounceReport {
        let mut polls: Vec<_> = self.votes.drain().await.into_iter().collect();
        polls.sort_by(|a, b| a.0.cmp(&b.0));

        let mut report = AnnounceReport {
            delivered: Vec::new(),
            failed: Vec::new(),
            announced_at: Utc::now(),
        };

        for (poll_id, votes) in polls {
            let tally = Tally::from_votes(&votes);
            let message = tally.render();

            match self.messenger.send_text(self.chat_id, &message).await {
                Ok(()) => {
                    increment_counter(CounterMetric::Announcement { delivered: true });
                    tracing::info!(
                        poll_id = %poll_id,
                        voters = Tally::voters(&votes),
                        votes = tally.total(),
                        "Announced poll results"
                    );
                    report.delivered.push(poll_id);
                }
                Err(e) => {
                    increment_counter(CounterMetric::Announcement { delivered: false });
                    tracing::warn!(
                        poll_id = %poll_id,
                        chat_id = self.chat_id,
                        error = %e,
                        "Failed to announce poll results, keeping votes"
                    );
                    self.votes.restore(poll_id.clone(), votes).await;
                    report.failed.push(poll_id);
                }
            }
        }

        report
    }

    /// Spawn the periodic task. The first cycle runs one `period` after start.
    pub fn spawn(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval.tick().await;

            tracing::info!(
                period_secs = period.as_secs(),
                chat_id = self.chat_id,
                "Results announcer started"
            );

            loop {
                interval.tick().await;
                let report = self.announce_once().await;
                if report.is_empty() {
                    tracing::debug!("No polls to announce");
                } else {
                    tracing::info!(
                        delivered = report.delivered.len(),
                        failed = report.failed.len(),
                        announced_at = %report.announced_at.to_rfc3339(),
                        "Announce cycle complete"
                    );
                }
            }
        })
    }
}
