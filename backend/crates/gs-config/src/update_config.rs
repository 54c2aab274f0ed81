use crate::{ConfigError, ConfigErrorResult};

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

pub const MIN_CHECK_INTERVAL_SECS: u64 = 10;
pub const MAX_CHECK_INTERVAL_SECS: u64 = 86_400;
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 300;

pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 3_600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateProviderKind {
    #[default]
    None,
    /// JSON manifest fetched over HTTP
    Manifest,
    /// Staging directory on the local filesystem
    Local,
}

impl FromStr for UpdateProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigErrorResult<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "manifest" => Ok(Self::Manifest),
            "local" => Ok(Self::Local),
            other => Err(ConfigError::update(format!(
                "update.provider must be 'none', 'manifest' or 'local', got '{other}'"
            ))),
        }
    }
}

/// Update source. Used globally and overridable per instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    pub provider: UpdateProviderKind,
    /// Periodic check interval (0 = only on demand)
    pub check_interval_secs: u64,
    pub manifest_url: Option<String>,
    pub local_dir: Option<String>,
    /// Artifact platform to install; defaults to the host platform.
    pub platform: Option<String>,
    /// Timeout for manifest and artifact downloads
    pub request_timeout_secs: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            provider: UpdateProviderKind::default(),
            check_interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            manifest_url: None,
            local_dir: None,
            platform: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl UpdateConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.check_interval_secs != 0
            && (self.check_interval_secs < MIN_CHECK_INTERVAL_SECS
                || self.check_interval_secs > MAX_CHECK_INTERVAL_SECS)
        {
            return Err(ConfigError::update(format!(
                "update.check_interval_secs must be 0 or {}-{}, got {}",
                MIN_CHECK_INTERVAL_SECS, MAX_CHECK_INTERVAL_SECS, self.check_interval_secs
            )));
        }

        if self.request_timeout_secs < MIN_REQUEST_TIMEOUT_SECS
            || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS
        {
            return Err(ConfigError::update(format!(
                "update.request_timeout_secs must be {}-{}, got {}",
                MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS, self.request_timeout_secs
            )));
        }

        match self.provider {
            UpdateProviderKind::None => {}
            UpdateProviderKind::Manifest => match &self.manifest_url {
                Some(url) if url.starts_with("http://") || url.starts_with("https://") => {}
                Some(url) => {
                    return Err(ConfigError::update(format!(
                        "update.manifest_url must be an http(s) URL, got '{url}'"
                    )));
                }
                None => {
                    return Err(ConfigError::update(
                        "update.provider = 'manifest' requires update.manifest_url",
                    ));
                }
            },
            UpdateProviderKind::Local => {
                if self.local_dir.as_deref().is_none_or(str::is_empty) {
                    return Err(ConfigError::update(
                        "update.provider = 'local' requires update.local_dir",
                    ));
                }
            }
        }

        Ok(())
    }

    /// `None` when periodic checks are disabled.
    pub fn check_interval(&self) -> Option<Duration> {
        match (self.provider, self.check_interval_secs) {
            (UpdateProviderKind::None, _) | (_, 0) => None,
            (_, secs) => Some(Duration::from_secs(secs)),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
