use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const MIN_NOTIFY_TIMEOUT_SECS: u64 = 1;
pub const MAX_NOTIFY_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 5;

/// Operator notifications. Always logged; also POSTed when a webhook is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: DEFAULT_NOTIFY_TIMEOUT_SECS,
        }
    }
}

impl NotifyConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.timeout_secs < MIN_NOTIFY_TIMEOUT_SECS
            || self.timeout_secs > MAX_NOTIFY_TIMEOUT_SECS
        {
            return Err(ConfigError::config(format!(
                "notify.timeout_secs must be {}-{}, got {}",
                MIN_NOTIFY_TIMEOUT_SECS, MAX_NOTIFY_TIMEOUT_SECS, self.timeout_secs
            )));
        }

        if let Some(url) = &self.webhook_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::config(format!(
                "notify.webhook_url must be an http(s) URL, got '{url}'"
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
