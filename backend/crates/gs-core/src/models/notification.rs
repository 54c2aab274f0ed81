use crate::{ExitStatus, InstanceKey};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationKind {
    /// Process exited with a non-clean status.
    Crashed { status: ExitStatus },
    /// Process kept dying before its first heartbeat; restarts are suspended
    /// until an update arrives.
    NeedsIntervention { consecutive_failures: u32 },
    /// Process exited after an operator stop.
    Stopped { reason: Option<String> },
}

/// Operator-facing event raised by an instance supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub instance: InstanceKey,
    #[serde(flatten)]
    pub kind: NotificationKind,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn new(instance: InstanceKey, kind: NotificationKind) -> Self {
        Self {
            instance,
            kind,
            at: Utc::now(),
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self.kind {
            NotificationKind::Crashed { .. } => "crashed",
            NotificationKind::NeedsIntervention { .. } => "needs_intervention",
            NotificationKind::Stopped { .. } => "stopped",
        }
    }

    /// One-line human readable summary.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NotificationKind::Crashed { status } => {
                write!(f, "Server '{}' exited unexpectedly: {status}", self.instance)
            }
            NotificationKind::NeedsIntervention {
                consecutive_failures,
            } => write!(
                f,
                "Server '{}' failed to start {consecutive_failures} times in a row; \
                 restarts are paused until a new build is available",
                self.instance
            ),
            NotificationKind::Stopped { reason: Some(reason) } => {
                write!(f, "Server '{}' stopped: {reason}", self.instance)
            }
            NotificationKind::Stopped { reason: None } => {
                write!(f, "Server '{}' stopped", self.instance)
            }
        }
    }
}
