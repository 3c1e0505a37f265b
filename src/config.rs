use anyhow::{anyhow, Result};
use clap::Parser;
use std::env;

/// armoryctl - Armory client core smoke tool
///
/// Fetches the counts snapshot and item collections and prints the derived
/// summary. Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "armoryctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Armory client core smoke tool", long_about = None)]
pub struct CliArgs {
    /// Armory API base URL
    #[arg(long, env = "ARMORY_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for authenticated endpoints
    #[arg(long, env = "ARMORY_API_TOKEN")]
    pub api_token: Option<String>,

    /// Wallet address for transaction history
    #[arg(long, env = "ARMORY_WALLET_ADDRESS")]
    pub wallet_address: Option<String>,

    /// Request timeout in milliseconds (1000-60000)
    #[arg(long, env = "ARMORY_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Items fetched per collection (1-100)
    #[arg(long, env = "ARMORY_PAGE_SIZE")]
    pub page_size: Option<u32>,

    /// Print the summary as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub wallet_address: Option<String>,
    pub timeout_ms: u64,
    pub page_size: u32,
    pub json: bool,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<Config> {
    let args = CliArgs::parse();
    from_args(args)
}

pub fn from_args(args: CliArgs) -> Result<Config> {
    let api_url = args
        .api_url
        .or_else(|| env::var("ARMORY_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:3000/api".to_string());
    validate_url(&api_url, "ARMORY_API_URL")?;

    let timeout_ms = args
        .timeout_ms
        .or_else(|| {
            env::var("ARMORY_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
        })
        .unwrap_or(8000);
    let timeout_ms = validate_in_range(timeout_ms, 1000, 60000, "ARMORY_TIMEOUT_MS")?;

    let page_size = args
        .page_size
        .or_else(|| env::var("ARMORY_PAGE_SIZE").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(10);
    let page_size = validate_in_range(page_size, 1, 100, "ARMORY_PAGE_SIZE")?;

    Ok(Config {
        api_url,
        api_token: args
            .api_token
            .or_else(|| env::var("ARMORY_API_TOKEN").ok()),
        wallet_address: args
            .wallet_address
            .or_else(|| env::var("ARMORY_WALLET_ADDRESS").ok()),
        timeout_ms,
        page_size,
        json: args.json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_validation_rejects_other_schemes() {
        assert!(validate_url("https://api.example.com", "X").is_ok());
        assert!(validate_url("http://localhost:3000", "X").is_ok());
        assert!(validate_url("ftp://api.example.com", "X").is_err());
        assert!(validate_url("", "X").is_err());
    }

    #[test]
    fn range_validation_is_inclusive() {
        assert!(validate_in_range(1000u64, 1000, 60000, "T").is_ok());
        assert!(validate_in_range(60000u64, 1000, 60000, "T").is_ok());
        assert!(validate_in_range(999u64, 1000, 60000, "T").is_err());
    }
}
