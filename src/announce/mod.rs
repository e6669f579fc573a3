//! Results announcer module
//!
//! Periodically tallies every tracked poll, broadcasts one summary per poll
//! and clears the polls that were delivered.

mod announcer;

pub use announcer::{AnnounceReport, ResultsAnnouncer};
