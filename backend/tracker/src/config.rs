//! Application configuration loaded from environment variables.

use alloy_primitives::Address;

use crate::errors::{Result, TrackerError};

#[derive(Debug, Clone)]
pub struct Config {
    /// EVM JSON-RPC endpoint (e.g. https://polygon-rpc.com)
    pub rpc_url: String,
    /// The PeriodPapaya streaming-payment contract
    pub period_papaya_address: Address,
    /// The Paynvest contract; the author every watched account subscribes to
    pub paynvest_address: Address,
    /// Subscriber accounts polled on every round
    pub watch_accounts: Vec<Address>,
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// How often (in seconds) to recompute summaries
    pub poll_interval_secs: u64,
    /// Refill period in days used when `REFILL_DAYS` cannot be read
    pub refill_days_fallback: u64,
    /// Decimals of the token the rates are denominated in
    pub token_decimals: u8,
    /// Decimals of the Paynvest share token
    pub paynvest_decimals: u8,
    /// Attempts per RPC call before giving up
    pub rpc_max_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| -> Result<String> {
            lookup(key).ok_or_else(|| TrackerError::Config(format!("Missing env var: {key}")))
        };
        let or_default = |key: &str, default: &str| var(key).unwrap_or_else(|_| default.to_string());

        Ok(Config {
            rpc_url: or_default("RPC_URL", "https://polygon-rpc.com"),
            period_papaya_address: parse_address(
                "PERIOD_PAPAYA_ADDRESS",
                &var("PERIOD_PAPAYA_ADDRESS").map_err(|_| {
                    TrackerError::Config(
                        "PERIOD_PAPAYA_ADDRESS environment variable is required".to_string(),
                    )
                })?,
            )?,
            paynvest_address: parse_address(
                "PAYNVEST_ADDRESS",
                &var("PAYNVEST_ADDRESS").map_err(|_| {
                    TrackerError::Config(
                        "PAYNVEST_ADDRESS environment variable is required".to_string(),
                    )
                })?,
            )?,
            watch_accounts: parse_accounts(&or_default("WATCH_ACCOUNTS", ""))?,
            database_url: or_default("DATABASE_URL", "sqlite:./paynvest_tracker.db"),
            api_port: or_default("API_PORT", "3001")
                .parse()
                .map_err(|_| TrackerError::Config("Invalid API_PORT".to_string()))?,
            poll_interval_secs: match or_default("POLL_INTERVAL_SECS", "60").parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(TrackerError::Config(
                        "Invalid POLL_INTERVAL_SECS".to_string(),
                    ))
                }
            },
            refill_days_fallback: match or_default("REFILL_DAYS_FALLBACK", "7").parse::<u64>() {
                Ok(days) if days > 0 => days,
                _ => {
                    return Err(TrackerError::Config(
                        "Invalid REFILL_DAYS_FALLBACK".to_string(),
                    ))
                }
            },
            token_decimals: or_default("TOKEN_DECIMALS", "18")
                .parse()
                .map_err(|_| TrackerError::Config("Invalid TOKEN_DECIMALS".to_string()))?,
            paynvest_decimals: or_default("PAYNVEST_DECIMALS", "18")
                .parse()
                .map_err(|_| TrackerError::Config("Invalid PAYNVEST_DECIMALS".to_string()))?,
            rpc_max_retries: match or_default("RPC_MAX_RETRIES", "5").parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(TrackerError::Config("Invalid RPC_MAX_RETRIES".to_string())),
            },
        })
    }
}

fn parse_address(key: &str, raw: &str) -> Result<Address> {
    raw.trim()
        .parse()
        .map_err(|_| TrackerError::Config(format!("Invalid address in {key}: {raw}")))
}

fn parse_accounts(raw: &str) -> Result<Vec<Address>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_address("WATCH_ACCOUNTS", s))
        .collect()
}
