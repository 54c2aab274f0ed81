use crate::{ConfigError, ConfigErrorResult, DEFAULT_METRICS_PORT, MIN_PORT};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Port of the Prometheus scrape endpoint
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: DEFAULT_METRICS_PORT,
        }
    }
}

impl MetricsConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.enabled && self.port < MIN_PORT {
            return Err(ConfigError::config(format!(
                "metrics.port must be >= {}, got {}",
                MIN_PORT, self.port
            )));
        }
        Ok(())
    }
}
