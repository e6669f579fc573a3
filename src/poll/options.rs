//! The fixed price-prediction option set

use super::PollError;
use std::fmt;

/// Question asked by every poll
pub const POLL_QUESTION: &str = "Price Prediction";

/// One of the five fixed answers, ordered by platform option index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PollOption {
    Up10,
    Up50,
    Up100,
    Moon,
    Down,
}

impl PollOption {
    /// Number of options
    pub const COUNT: usize = 5;

    /// All options in index order
    pub const ALL: [PollOption; Self::COUNT] = [
        PollOption::Up10,
        PollOption::Up50,
        PollOption::Up100,
        PollOption::Moon,
        PollOption::Down,
    ];

    /// Zero-based option index as used by the messaging platform
    pub fn index(self) -> usize {
        match self {
            PollOption::Up10 => 0,
            PollOption::Up50 => 1,
            PollOption::Up100 => 2,
            PollOption::Moon => 3,
            PollOption::Down => 4,
        }
    }

    /// Answer text shown in the poll
    pub fn label(self) -> &'static str {
        match self {
            PollOption::Up10 => "Up 10%",
            PollOption::Up50 => "Up 50%",
            PollOption::Up100 => "Up 100%",
            PollOption::Moon => "Moon",
            PollOption::Down => "Down",
        }
    }
}

impl TryFrom<u32> for PollOption {
    type Error = PollError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(PollError::InvalidOption(index))
    }
}

impl fmt::Display for PollOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A poll creation request: question plus ordered answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSpec {
    pub question: String,
    pub options: Vec<String>,
    pub is_anonymous: bool,
}

impl PollSpec {
    /// The non-anonymous price-prediction poll
    pub fn price_prediction() -> Self {
        Self {
            question: POLL_QUESTION.to_string(),
            options: PollOption::ALL
                .iter()
                .map(|o| o.label().to_string())
                .collect(),
            is_anonymous: false,
        }
    }
}
