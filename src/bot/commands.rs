//! Chat command parsing

use std::fmt;

/// A supported bot command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Price,
    MarketCap,
    Poll,
}

impl Command {
    /// Command name without the leading slash
    pub fn name(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Price => "price",
            Command::MarketCap => "mcap",
            Command::Poll => "poll",
        }
    }

    /// Parse the command at the start of a message.
    ///
    /// Accepts `/price` and `/price@BotName`; a command addressed to a
    /// different bot, unknown commands and plain text yield `None`.
    /// Trailing arguments are ignored.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        let body = first.strip_prefix('/')?;

        let (name, target) = match body.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (body, None),
        };

        if let (Some(target), Some(me)) = (target, bot_username) {
            if !target.eq_ignore_ascii_case(me) {
                return None;
            }
        }

        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Command::Start),
            "price" => Some(Command::Price),
            "mcap" => Some(Command::MarketCap),
            "poll" => Some(Command::Poll),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}
