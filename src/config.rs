//! Runtime configuration.
//!
//! Values come from command-line flags, which fall back to environment
//! variables (see `cli::args`), and finally to the defaults below.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::api::DEFAULT_TIMEOUT_SECS;
use crate::domain::Product;

/// Product id of the monthly premium subscription.
pub const DEFAULT_PRODUCT_ID: &str = "aichatty_premium_monthly";

/// Price the local billing provider offers the monthly subscription at.
const LOCAL_MONTHLY_PRICE: f64 = 4.99;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding settings.json
    pub data_dir: PathBuf,
    pub probe_timeout_secs: u64,
    pub product_id: String,
}

impl Config {
    pub fn new(
        data_dir: Option<String>,
        probe_timeout_secs: Option<u64>,
        product_id: Option<String>,
    ) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        Ok(Self {
            data_dir,
            probe_timeout_secs: probe_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            product_id: product_id.unwrap_or_else(|| DEFAULT_PRODUCT_ID.to_string()),
        })
    }

    /// Products offered by the local billing provider.
    pub fn local_catalog(&self) -> Vec<Product> {
        vec![Product::new(&self.product_id, LOCAL_MONTHLY_PRICE, "$")]
    }
}

/// `~/.aichatty`
pub fn default_data_dir() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Could not determine home directory")?
        .join(".aichatty"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_values_win() {
        let config = Config::new(
            Some("/tmp/aichatty-test".to_string()),
            Some(3),
            Some("pro".to_string()),
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/aichatty-test"));
        assert_eq!(config.probe_timeout_secs, 3);
        assert_eq!(config.local_catalog()[0].id, "pro");
    }

    #[test]
    fn test_defaults() {
        let config = Config::new(Some("/tmp/aichatty-test".to_string()), None, None).unwrap();
        assert_eq!(config.probe_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.product_id, DEFAULT_PRODUCT_ID);
    }
}
