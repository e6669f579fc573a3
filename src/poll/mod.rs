//! Poll manager module
//!
//! Fixed option set, in-memory vote store and per-poll tallies.

mod options;
mod store;
mod tally;
mod types;

pub use options::{PollOption, PollSpec, POLL_QUESTION};
pub use store::{PollVotes, VoteStore};
pub use tally::Tally;
pub use types::{PollError, PollId, UserId};
