//! Configuration module for creditlens.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Model and Data.

mod data_config;
mod model_config;

pub use data_config::{DEFAULT_UNIVERSE, DataEnvConfig};
pub use model_config::ModelEnvConfig;

use anyhow::{Context, Result};

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelEnvConfig,
    pub data: DataEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            model: ModelEnvConfig::from_env().context("Failed to load model config")?,
            data: DataEnvConfig::from_env().context("Failed to load data config")?,
        })
    }
}
