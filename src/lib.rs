//! coin-poll-bot: Telegram bot for one coin's price and prediction polls
//!
//! This library provides the core components for:
//! - Price quotes from the CoinMarketCap API
//! - Chat command replies (`/start`, `/price`, `/mcap`, `/poll`)
//! - In-memory poll answer tracking
//! - Periodic broadcast of poll results
//! - Telegram Bot API transport

pub mod announce;
pub mod bot;
pub mod cli;
pub mod config;
pub mod poll;
pub mod quote;
pub mod telegram;
pub mod telemetry;
