use crate::{ConfigError, ConfigErrorResult, UpdateConfig};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gs_core::InstanceKey;
use serde::Deserialize;

pub const MIN_HEARTBEAT_TIMEOUT_SECS: u64 = 5;
pub const MAX_HEARTBEAT_TIMEOUT_SECS: u64 = 3_600;
pub const DEFAULT_HEARTBEAT_TIMEOUT_SECS: u64 = 60;

const BIN_DIR: &str = "bin";
const CONFIG_DIR: &str = "config";
const DATA_DIR: &str = "data";
const DUMPS_DIR: &str = "dumps";
const LOGS_DIR: &str = "logs";
const LOG_FILE: &str = "server.log";

/// One `[[instances]]` entry.
///
/// ```toml
/// [[instances]]
/// key = "arena-1"
/// root_dir = "/srv/games/arena-1"
/// executable = "arena-server"
/// control_endpoint = "http://127.0.0.1:27015/control/stop"
/// heartbeat_timeout_secs = 90
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstanceConfig {
    pub key: InstanceKey,
    /// Relative paths resolve under `{root_dir}/bin`.
    pub executable: String,
    pub root_dir: String,
    /// Defaults to `root_dir`.
    #[serde(default)]
    pub working_dir: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default = "default_heartbeat_timeout_secs")]
    pub heartbeat_timeout_secs: u64,
    /// Capture a core dump before killing an unresponsive process.
    #[serde(default)]
    pub dump_on_timeout: bool,
    /// Local URL that accepts a POST asking the server to shut down.
    #[serde(default)]
    pub control_endpoint: Option<String>,
    /// Overrides the global `[update]` section.
    #[serde(default)]
    pub update: Option<UpdateConfig>,
}

fn default_heartbeat_timeout_secs() -> u64 {
    DEFAULT_HEARTBEAT_TIMEOUT_SECS
}

impl InstanceConfig {
    /// Minimal config with defaults for everything optional.
    pub fn new(key: InstanceKey, root_dir: impl Into<String>, executable: impl Into<String>) -> Self {
        Self {
            key,
            executable: executable.into(),
            root_dir: root_dir.into(),
            working_dir: None,
            args: Vec::new(),
            env: BTreeMap::new(),
            heartbeat_timeout_secs: DEFAULT_HEARTBEAT_TIMEOUT_SECS,
            dump_on_timeout: false,
            control_endpoint: None,
            update: None,
        }
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.executable.trim().is_empty() {
            return Err(ConfigError::instance(format!(
                "instance '{}': executable cannot be empty",
                self.key
            )));
        }

        if !Path::new(&self.root_dir).is_absolute() {
            return Err(ConfigError::instance(format!(
                "instance '{}': root_dir must be an absolute path, got '{}'",
                self.key, self.root_dir
            )));
        }

        if self.heartbeat_timeout_secs < MIN_HEARTBEAT_TIMEOUT_SECS
            || self.heartbeat_timeout_secs > MAX_HEARTBEAT_TIMEOUT_SECS
        {
            return Err(ConfigError::instance(format!(
                "instance '{}': heartbeat_timeout_secs must be {}-{}, got {}",
                self.key,
                MIN_HEARTBEAT_TIMEOUT_SECS,
                MAX_HEARTBEAT_TIMEOUT_SECS,
                self.heartbeat_timeout_secs
            )));
        }

        if let Some(endpoint) = &self.control_endpoint
            && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ConfigError::instance(format!(
                "instance '{}': control_endpoint must be an http(s) URL, got '{endpoint}'",
                self.key
            )));
        }

        if let Some(update) = &self.update {
            update.validate()?;
        }

        Ok(())
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.heartbeat_timeout_secs)
    }

    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root_dir)
    }

    /// Install destination for server binaries.
    pub fn bin_dir(&self) -> PathBuf {
        self.root_path().join(BIN_DIR)
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root_path().join(CONFIG_DIR)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root_path().join(DATA_DIR)
    }

    pub fn dumps_dir(&self) -> PathBuf {
        self.root_path().join(DUMPS_DIR)
    }

    /// Server stdout and stderr are appended here.
    pub fn log_path(&self) -> PathBuf {
        self.root_path().join(LOGS_DIR).join(LOG_FILE)
    }

    pub fn program_path(&self) -> PathBuf {
        let executable = Path::new(&self.executable);
        if executable.is_absolute() {
            executable.to_path_buf()
        } else {
            self.bin_dir().join(executable)
        }
    }

    pub fn working_path(&self) -> PathBuf {
        match &self.working_dir {
            Some(dir) => PathBuf::from(dir),
            None => self.root_path(),
        }
    }
}
