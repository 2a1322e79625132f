//! Company data configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Companies scored when `TICKERS` is not set.
pub const DEFAULT_UNIVERSE: &[(&str, &str)] = &[
    ("Apple Inc.", "AAPL"),
    ("Microsoft Corporation", "MSFT"),
    ("Alphabet Inc.", "GOOGL"),
    ("Tesla Inc.", "TSLA"),
    ("JPMorgan Chase", "JPM"),
    ("Johnson & Johnson", "JNJ"),
    ("Procter & Gamble", "PG"),
    ("Coca-Cola", "KO"),
    ("Walmart", "WMT"),
    ("Amazon", "AMZN"),
];

/// Data environment configuration
#[derive(Debug, Clone)]
pub struct DataEnvConfig {
    pub data_path: PathBuf,
    pub cache_ttl_secs: i64,
    pub tickers: Vec<String>,
}

impl DataEnvConfig {
    pub fn from_env() -> Result<Self> {
        let tickers = match env::var("TICKERS") {
            Ok(list) => list
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => DEFAULT_UNIVERSE
                .iter()
                .map(|(_, ticker)| ticker.to_string())
                .collect(),
        };

        Ok(Self {
            data_path: PathBuf::from(
                env::var("COMPANY_DATA_PATH").unwrap_or_else(|_| "data/companies.json".to_string()),
            ),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .unwrap_or_else(|_| "600".to_string())
                .parse::<i64>()
                .context("Failed to parse CACHE_TTL_SECS")?,
            tickers,
        })
    }
}
