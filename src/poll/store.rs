//! Shared in-memory vote store

use super::{PollError, PollId, PollOption, Tally, UserId};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Answers recorded for one poll, keyed by user. An empty set marks a
/// retracted answer.
pub type PollVotes = HashMap<UserId, BTreeSet<PollOption>>;

/// Votes per poll, shared between the update handler and the announcer.
///
/// Cloning yields another handle to the same store.
#[derive(Debug, Clone, Default)]
pub struct VoteStore {
    polls: Arc<Mutex<HashMap<PollId, PollVotes>>>,
}

impl VoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user's answer, replacing any earlier one for the same poll.
    ///
    /// An empty `option_ids` retracts the user's answer; the empty selection
    /// is kept so a later [`restore`](Self::restore) cannot bring back an
    /// older answer. Any index outside
    /// the fixed option set rejects the whole answer and leaves the store
    /// untouched.
    pub async fn record_answer(
        &self,
        poll_id: &str,
        user_id: UserId,
        option_ids: &[u32],
    ) -> Result<(), PollError> {
        let selection = option_ids
            .iter()
            .map(|&i| PollOption::try_from(i))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let mut polls = self.polls.lock().await;
        polls
            .entry(poll_id.to_string())
            .or_default()
            .insert(user_id, selection);
        Ok(())
    }

    /// Take every tracked poll out of the store, leaving it empty
    pub async fn drain(&self) -> HashMap<PollId, PollVotes> {
        let mut polls = self.polls.lock().await;
        std::mem::take(&mut *polls)
    }

    /// Put back votes taken by [`drain`](Self::drain) that could not be
    /// announced. Answers recorded since the drain take precedence.
    pub async fn restore(&self, poll_id: PollId, votes: PollVotes) {
        let mut polls = self.polls.lock().await;
        let current = polls.entry(poll_id).or_default();
        for (user_id, selection) in votes {
            current.entry(user_id).or_insert(selection);
        }
    }

    /// Current tally for one poll, if it is tracked
    pub async fn tally(&self, poll_id: &str) -> Option<Tally> {
        let polls = self.polls.lock().await;
        polls.get(poll_id).map(Tally::from_votes)
    }

    /// Recorded answer of one user; `None` if they never answered or retracted
    pub async fn answer(&self, poll_id: &str, user_id: UserId) -> Option<BTreeSet<PollOption>> {
        let polls = self.polls.lock().await;
        polls
            .get(poll_id)?
            .get(&user_id)
            .filter(|selection| !selection.is_empty())
            .cloned()
    }

    /// Number of tracked polls
    pub async fn poll_count(&self) -> usize {
        self.polls.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.polls.lock().await.is_empty()
    }
}
