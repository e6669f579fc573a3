use anyhow::Context;
use clap::Parser;
use coin_poll_bot::cli::{Cli, Commands};
use coin_poll_bot::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)
        .with_context(|| format!("Could not load config from {}", cli.config))?;

    // Initialize telemetry
    coin_poll_bot::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!(symbol = %config.quote.symbol, "Starting bot");
            args.execute(&config).await?;
        }
        Commands::Price(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Symbol: {} ({})", config.quote.symbol, config.quote.convert);
            println!("  Quote API: {}", config.quote.base_url);
            println!("  Bot API: {}", config.bot.api_url);
            println!("  Broadcast chat: {}", config.bot.broadcast_chat_id);
            println!(
                "  Announce: {} every {}s",
                if config.announce.enabled { "on" } else { "off" },
                config.announce.interval_secs
            );
            println!(
                "  Log: {} ({:?})",
                config.telemetry.log_level, config.telemetry.log_format
            );
        }
    }

    Ok(())
}
