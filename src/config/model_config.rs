//! Model configuration parsing from environment variables.
//!
//! This module handles loading boosted-regressor hyperparameters and the model path.

use crate::domain::ml::gradient_boosting::GbmParams;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Model environment configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub gbm: GbmParams,
    pub model_path: PathBuf,
}

impl ModelEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = GbmParams::default();

        let gbm = GbmParams {
            n_estimators: Self::parse_usize("MODEL_N_ESTIMATORS", defaults.n_estimators)?,
            max_depth: env::var("MODEL_MAX_DEPTH")
                .unwrap_or_else(|_| defaults.max_depth.to_string())
                .parse::<u16>()
                .context("Failed to parse MODEL_MAX_DEPTH")?,
            learning_rate: Self::parse_f64("MODEL_LEARNING_RATE", defaults.learning_rate)?,
            min_samples_split: Self::parse_usize(
                "MODEL_MIN_SAMPLES_SPLIT",
                defaults.min_samples_split,
            )?,
            min_samples_leaf: Self::parse_usize("MODEL_MIN_SAMPLES_LEAF", defaults.min_samples_leaf)?,
            subsample: Self::parse_f64("MODEL_SUBSAMPLE", defaults.subsample)?,
            seed: env::var("MODEL_SEED")
                .unwrap_or_else(|_| defaults.seed.to_string())
                .parse::<u64>()
                .context("Failed to parse MODEL_SEED")?,
        };

        if !(gbm.subsample > 0.0 && gbm.subsample <= 1.0) {
            anyhow::bail!("MODEL_SUBSAMPLE must be in (0, 1], got {}", gbm.subsample);
        }

        Ok(Self {
            gbm,
            model_path: PathBuf::from(
                env::var("MODEL_PATH").unwrap_or_else(|_| "data/model/credit_model.json".to_string()),
            ),
        })
    }

    fn parse_usize(key: &str, default: usize) -> Result<usize> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<usize>()
            .context(format!("Failed to parse {}", key))
    }

    fn parse_f64(key: &str, default: f64) -> Result<f64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<f64>()
            .context(format!("Failed to parse {}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelEnvConfig::from_env().unwrap();
        assert_eq!(config.gbm, GbmParams::default());
        assert_eq!(config.gbm.n_estimators, 100);
        assert_eq!(config.gbm.max_depth, 6);
        assert_eq!(config.gbm.seed, 42);
        assert!(config.model_path.ends_with("credit_model.json"));
    }
}
