use serde::Deserialize;
use std::time::Duration;

use crate::error::{HudError, Result};

/// HUD client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HudConfig {
    /// Interval between data requests to the host, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Prefix for currency values
    #[serde(default = "default_currency_prefix")]
    pub currency_prefix: String,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            currency_prefix: default_currency_prefix(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_currency_prefix() -> String {
    "$".to_string()
}

impl HudConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| HudError::Config(format!("Failed to parse config: {e}")))?;
        if config.poll_interval_ms == 0 {
            return Err(HudError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Poll period, never shorter than one millisecond
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
