//! CLI interface for coin-poll-bot
//!
//! Provides subcommands for:
//! - `run`: Start the bot
//! - `price`: Fetch one quote and print it
//! - `config`: Show the effective configuration

mod price;
mod run;

pub use price::PriceArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "coin-poll-bot")]
#[command(about = "Telegram bot that relays a coin's price and runs prediction polls")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the bot
    Run(RunArgs),
    /// Fetch the configured coin's quote once
    Price(PriceArgs),
    /// Show the effective configuration
    Config,
}
