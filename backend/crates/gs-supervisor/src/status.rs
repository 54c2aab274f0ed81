use gs_core::{ExitStatus, InstanceKey};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Coarse lifecycle phase of one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstancePhase {
    /// A process is running.
    Running,
    /// A graceful stop is in progress.
    Stopping,
    /// Manually stopped; no automatic restart.
    Stopped,
    /// Gave up after repeated init failures until a new build arrives.
    AwaitingUpdate,
    /// Not running, e.g. after a failed spawn.
    Down,
}

/// Point-in-time view of an instance, published after every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceStatus {
    pub key: InstanceKey,
    pub phase: InstancePhase,
    /// Pid or unit of the running process.
    pub process: Option<String>,
    pub version: Option<String>,
    pub start_generation: u64,
    pub timeout_generation: u64,
    pub consecutive_init_failures: u32,
    pub awaiting_update: bool,
    pub update_pending: bool,
    pub manually_stopped: bool,
    pub stop_reason: Option<String>,
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub last_exit: Option<ExitStatus>,
}

impl InstanceStatus {
    pub fn new(key: InstanceKey) -> Self {
        Self {
            key,
            phase: InstancePhase::Down,
            process: None,
            version: None,
            start_generation: 0,
            timeout_generation: 0,
            consecutive_init_failures: 0,
            awaiting_update: false,
            update_pending: false,
            manually_stopped: false,
            stop_reason: None,
            last_heartbeat: None,
            last_exit: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }
}
