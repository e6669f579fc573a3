//! Poll types

use thiserror::Error;

/// Platform-assigned poll identifier
pub type PollId = String;

/// Platform user identifier
pub type UserId = u64;

/// Poll errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollError {
    /// An answer referenced an option outside the fixed option set
    #[error("option index {0} is out of range")]
    InvalidOption(u32),
}
