use crate::{ConfigError, ConfigErrorResult};

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

pub const DEFAULT_UNIT_PREFIX: &str = "gs-";

/// How server processes are launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessBackend {
    /// Child process of the supervisor in its own process group.
    #[default]
    Direct,
    /// Transient systemd service unit created with `systemd-run`.
    Systemd,
}

impl FromStr for ProcessBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigErrorResult<Self> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "systemd" => Ok(Self::Systemd),
            other => Err(ConfigError::config(format!(
                "process.backend must be 'direct' or 'systemd', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ProcessBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Systemd => f.write_str("systemd"),
        }
    }
}

/// Unit naming strategy for the systemd backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitNaming {
    /// `{prefix}{key}.service`; a stale unit with that name is cleared first.
    #[default]
    Fixed,
    /// `{prefix}{key}-{random}.service` per launch.
    Random,
}

impl FromStr for UnitNaming {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigErrorResult<Self> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "random" => Ok(Self::Random),
            other => Err(ConfigError::config(format!(
                "process.unit_naming must be 'fixed' or 'random', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub backend: ProcessBackend,
    pub unit_naming: UnitNaming,
    pub unit_prefix: String,
    /// Run units in the user service manager (`--user`)
    pub user_scope: bool,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            backend: ProcessBackend::default(),
            unit_naming: UnitNaming::default(),
            unit_prefix: String::from(DEFAULT_UNIT_PREFIX),
            user_scope: false,
        }
    }
}

impl ProcessConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.backend == ProcessBackend::Systemd
            && !self
                .unit_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::config(format!(
                "process.unit_prefix may only contain ASCII letters, digits, '-' and '_', got '{}'",
                self.unit_prefix
            )));
        }
        Ok(())
    }
}
