use crate::{ConfigError, ConfigErrorResult, SpawnRetryConfig};

use std::time::Duration;

use serde::Deserialize;

pub const MIN_QUEUE_CAPACITY: usize = 4;
pub const MAX_QUEUE_CAPACITY: usize = 4096;
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

pub const MIN_MAX_INIT_FAILURES: u32 = 1;
pub const MAX_MAX_INIT_FAILURES: u32 = 100;
pub const DEFAULT_MAX_INIT_FAILURES: u32 = 3;

pub const MIN_STOP_REQUEST_TIMEOUT_MS: u64 = 100;
pub const MAX_STOP_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_STOP_REQUEST_TIMEOUT_MS: u64 = 2_000;

pub const MIN_STOP_GRACE_SECS: u64 = 1;
pub const MAX_STOP_GRACE_SECS: u64 = 600;
pub const DEFAULT_STOP_GRACE_SECS: u64 = 30;

pub const MIN_SHUTDOWN_TIMEOUT_SECS: u64 = 1;
pub const MAX_SHUTDOWN_TIMEOUT_SECS: u64 = 900;
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 60;

/// Settings shared by every instance supervisor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Bounded command queue size per instance
    pub queue_capacity: usize,
    /// Consecutive exits without a heartbeat before restarts are paused
    pub max_init_failures: u32,
    /// Timeout for delivering the stop request to an instance
    pub stop_request_timeout_ms: u64,
    /// How long a stopping instance may take before it is killed
    pub stop_grace_secs: u64,
    /// Upper bound on global shutdown
    pub shutdown_timeout_secs: u64,
    pub spawn_retry: SpawnRetryConfig,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_init_failures: DEFAULT_MAX_INIT_FAILURES,
            stop_request_timeout_ms: DEFAULT_STOP_REQUEST_TIMEOUT_MS,
            stop_grace_secs: DEFAULT_STOP_GRACE_SECS,
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            spawn_retry: SpawnRetryConfig::default(),
        }
    }
}

impl SupervisorConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.queue_capacity < MIN_QUEUE_CAPACITY || self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::config(format!(
                "supervisor.queue_capacity must be {}-{}, got {}",
                MIN_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY, self.queue_capacity
            )));
        }

        if self.max_init_failures < MIN_MAX_INIT_FAILURES
            || self.max_init_failures > MAX_MAX_INIT_FAILURES
        {
            return Err(ConfigError::config(format!(
                "supervisor.max_init_failures must be {}-{}, got {}",
                MIN_MAX_INIT_FAILURES, MAX_MAX_INIT_FAILURES, self.max_init_failures
            )));
        }

        if self.stop_request_timeout_ms < MIN_STOP_REQUEST_TIMEOUT_MS
            || self.stop_request_timeout_ms > MAX_STOP_REQUEST_TIMEOUT_MS
        {
            return Err(ConfigError::config(format!(
                "supervisor.stop_request_timeout_ms must be {}-{}, got {}",
                MIN_STOP_REQUEST_TIMEOUT_MS, MAX_STOP_REQUEST_TIMEOUT_MS, self.stop_request_timeout_ms
            )));
        }

        if self.stop_grace_secs < MIN_STOP_GRACE_SECS || self.stop_grace_secs > MAX_STOP_GRACE_SECS
        {
            return Err(ConfigError::config(format!(
                "supervisor.stop_grace_secs must be {}-{}, got {}",
                MIN_STOP_GRACE_SECS, MAX_STOP_GRACE_SECS, self.stop_grace_secs
            )));
        }

        if self.shutdown_timeout_secs < MIN_SHUTDOWN_TIMEOUT_SECS
            || self.shutdown_timeout_secs > MAX_SHUTDOWN_TIMEOUT_SECS
        {
            return Err(ConfigError::config(format!(
                "supervisor.shutdown_timeout_secs must be {}-{}, got {}",
                MIN_SHUTDOWN_TIMEOUT_SECS, MAX_SHUTDOWN_TIMEOUT_SECS, self.shutdown_timeout_secs
            )));
        }

        self.spawn_retry.validate()
    }

    pub fn stop_request_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_request_timeout_ms)
    }

    pub fn stop_grace(&self) -> Duration {
        Duration::from_secs(self.stop_grace_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
