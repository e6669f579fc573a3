//! Configuration types for coin-poll-bot

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub bot: BotConfig,
    pub quote: QuoteConfig,
    #[serde(default)]
    pub announce: AnnounceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    /// Bot token from BotFather
    #[serde(default)]
    pub token: String,

    /// Chat that receives the periodic poll results
    pub broadcast_chat_id: i64,

    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,

    /// Long-poll timeout passed to getUpdates (seconds)
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Timeout for sendMessage/sendPoll requests (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Market-data API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteConfig {
    /// CoinMarketCap API key
    #[serde(default)]
    pub api_key: String,

    /// Asset symbol (e.g., "BTC")
    pub symbol: String,

    /// Fiat currency the quote is converted to
    #[serde(default = "default_convert")]
    pub convert: String,

    /// API base URL
    #[serde(default = "default_quote_api_url")]
    pub base_url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

/// Results announcement configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnnounceConfig {
    /// Run the periodic announcer
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between announce cycles
    #[serde(default = "default_announce_interval_secs")]
    pub interval_secs: u64,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "pretty" or "json"
    #[serde(default)]
    pub log_format: LogFormatConfig,

    /// Prometheus exporter port; exporter disabled when unset
    pub metrics_port: Option<u16>,
}

/// Log output format as written in the config file
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatConfig {
    #[default]
    Pretty,
    Json,
}

fn default_true() -> bool {
    true
}
fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}
fn default_quote_api_url() -> String {
    "https://pro-api.coinmarketcap.com".to_string()
}
fn default_convert() -> String {
    "USD".to_string()
}
fn default_poll_timeout_secs() -> u64 {
    30
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_announce_interval_secs() -> u64 {
    7 * 24 * 60 * 60 // one week
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AnnounceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_announce_interval_secs(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormatConfig::Pretty,
            metrics_port: None,
        }
    }
}

/// Environment variables that override file settings
pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
pub const ENV_CMC_API_KEY: &str = "CMC_API_KEY";
pub const ENV_COIN_SYMBOL: &str = "COIN_SYMBOL";
pub const ENV_BROADCAST_CHAT_ID: &str = "BROADCAST_CHAT_ID";

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_overrides(&std::env::vars().collect())?;
        Ok(config)
    }

    /// Apply overrides from a key/value source (normally the process environment)
    pub fn apply_overrides(&mut self, vars: &HashMap<String, String>) -> anyhow::Result<()> {
        if let Some(token) = vars.get(ENV_BOT_TOKEN) {
            self.bot.token = token.clone();
        }
        if let Some(key) = vars.get(ENV_CMC_API_KEY) {
            self.quote.api_key = key.clone();
        }
        if let Some(symbol) = vars.get(ENV_COIN_SYMBOL) {
            self.quote.symbol = symbol.clone();
        }
        if let Some(chat_id) = vars.get(ENV_BROADCAST_CHAT_ID) {
            self.bot.broadcast_chat_id = chat_id.trim().parse().map_err(|e| {
                anyhow::anyhow!("{} is not a valid chat id: {}", ENV_BROADCAST_CHAT_ID, e)
            })?;
        }
        Ok(())
    }

    /// Check the settings the bot cannot start without
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bot.token.trim().is_empty() {
            anyhow::bail!("bot token is missing (set bot.token or {})", ENV_BOT_TOKEN);
        }
        if self.quote.api_key.trim().is_empty() {
            anyhow::bail!(
                "quote API key is missing (set quote.api_key or {})",
                ENV_CMC_API_KEY
            );
        }
        if self.quote.symbol.trim().is_empty() {
            anyhow::bail!("quote.symbol must not be empty");
        }
        if self.announce.interval_secs == 0 {
            anyhow::bail!("announce.interval_secs must be positive");
        }
        Ok(())
    }
}
