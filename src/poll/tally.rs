//! Vote aggregation

use super::{PollOption, PollVotes};

/// Per-option vote counts for one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    counts: [u32; PollOption::COUNT],
}

impl Tally {
    /// Count every selected option of every recorded answer
    pub fn from_votes(votes: &PollVotes) -> Self {
        let mut tally = Self::default();
        for selection in votes.values() {
            for option in selection {
                tally.counts[option.index()] += 1;
            }
        }
        tally
    }

    pub fn count(&self, option: PollOption) -> u32 {
        self.counts[option.index()]
    }

    /// Sum of all option counts
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Number of users with a non-retracted answer
    pub fn voters(votes: &PollVotes) -> usize {
        votes.values().filter(|selection| !selection.is_empty()).count()
    }

    /// Counts in ascending option index order, zero counts included
    pub fn iter(&self) -> impl Iterator<Item = (PollOption, u32)> + '_ {
        PollOption::ALL.iter().map(|o| (*o, self.counts[o.index()]))
    }

    /// Summary message listing every option index and its count
    pub fn render(&self) -> String {
        let lines: Vec<String> = self
            .iter()
            .map(|(option, count)| format!("{}: {} votes", option.index(), count))
            .collect();
        format!("Poll Results:\n{}", lines.join("\n"))
    }
}
