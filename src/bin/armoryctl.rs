//! End-to-end smoke tool: fetch the counts snapshot and all collections
//! concurrently, then print the derived summary.

use anyhow::{anyhow, Context, Result};
use armory_core::app::AppState;
use armory_core::client::ApiClient;
use armory_core::{config, summary};
use clap::Parser;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cfg = config::from_args(config::CliArgs::parse())
        .context("Failed to load configuration")?;

    let token = cfg
        .api_token
        .clone()
        .ok_or_else(|| anyhow!("API token required (set ARMORY_API_TOKEN or --api-token)"))?;

    let client = ApiClient::http(&cfg.api_url, Duration::from_millis(cfg.timeout_ms));
    let app = AppState::new(client);

    let page_size = cfg.page_size.to_string();
    let params = [("limit", page_size.as_str())];

    log::info!("[armoryctl] refreshing against {}", cfg.api_url);
    app.refresh_all(Some(&token), &params)
        .await
        .map_err(|e| anyhow!("{e}"))?;

    if let Some(error) = summary::first_error(&app) {
        return Err(anyhow!("refresh failed: {error}"));
    }

    let derived = summary::derive(&app);
    if cfg.json {
        println!("{}", serde_json::to_string_pretty(&derived)?);
    } else {
        println!("Armory summary");
        for d in &derived.domains {
            println!("  {:<10} count {:>5}  value ${:.2}", d.domain, d.count, d.total_value);
        }
        println!(
            "  {:<10} count {:>5}  value ${:.2}",
            "total", derived.total_count, derived.total_value
        );
    }

    if let Some(address) = cfg.wallet_address.as_deref() {
        app.wallet
            .fetch_transactions(Some(&token), address, Some(cfg.page_size))
            .await
            .map_err(|e| anyhow!("{e}"))?;
        match app.wallet.transactions_error() {
            Some(error) => eprintln!("transaction history unavailable: {error}"),
            None => println!("  {} recent transactions", app.wallet.transactions().len()),
        }
    }

    Ok(())
}
