//! Price command implementation

use crate::config::Config;
use crate::quote::{format_fixed, format_grouped, CoinMarketCapClient, QuoteSource};
use clap::Args;

#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Override the configured symbol
    #[arg(short, long)]
    pub symbol: Option<String>,
}

impl PriceArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let symbol = self
            .symbol
            .clone()
            .unwrap_or_else(|| config.quote.symbol.clone());
        let client = CoinMarketCapClient::with_config((&config.quote).into())?;

        let quote = client.fetch_quote(&symbol).await?;
        println!("{} price: ${}", quote.symbol, format_fixed(quote.price, 10));
        match quote.market_cap {
            Some(market_cap) => println!(
                "{} market cap: ${}",
                quote.symbol,
                format_grouped(market_cap, 2)
            ),
            None => println!("{} market cap: n/a", quote.symbol),
        }
        Ok(())
    }
}
