//! Run command implementation

use crate::announce::ResultsAnnouncer;
use crate::bot::{CommandResponder, Dispatcher};
use crate::config::Config;
use crate::poll::VoteStore;
use crate::quote::CoinMarketCapClient;
use crate::telegram::TelegramClient;
use anyhow::Context;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Do not start the periodic results announcer
    #[arg(long)]
    pub no_announce: bool,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        config.validate()?;

        let telegram = Arc::new(TelegramClient::with_config((&config.bot).into())?);
        let quotes = Arc::new(CoinMarketCapClient::with_config((&config.quote).into())?);

        let me = telegram
            .get_me()
            .await
            .context("Bot token rejected by Telegram")?;
        tracing::info!(bot_id = me.id, username = ?me.username, "Authenticated with Telegram");

        let votes = VoteStore::new();

        let announcer_handle = if config.announce.enabled && !self.no_announce {
            let announcer = Arc::new(ResultsAnnouncer::new(
                votes.clone(),
                Arc::clone(&telegram),
                config.bot.broadcast_chat_id,
            ));
            Some(announcer.spawn(Duration::from_secs(config.announce.interval_secs)))
        } else {
            tracing::info!("Results announcer disabled");
            None
        };

        let responder = CommandResponder::new(quotes, Arc::clone(&telegram), &config.quote.symbol);
        let mut dispatcher = Dispatcher::new(responder, votes);
        if let Some(username) = me.username {
            dispatcher = dispatcher.with_bot_username(username);
        }

        tokio::select! {
            _ = dispatcher.run(&telegram) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
            }
        }

        if let Some(handle) = announcer_handle {
            handle.abort();
        }
        Ok(())
    }
}
