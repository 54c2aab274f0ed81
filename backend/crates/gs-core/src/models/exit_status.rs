use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a terminated process, normalized across process backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExitStatus {
    /// Backend reported a clean stop without a numeric code.
    Success,
    /// Process exited with the given code.
    ExitCode(i32),
    /// Process was terminated by a signal.
    Signaled(i32),
    /// Process was terminated by a signal and dumped core.
    CoreDumped(i32),
    /// Process was killed by the kernel or service manager OOM handling.
    OutOfMemory,
    /// Service manager reported a failure result that has no closer mapping.
    ServiceFailed(String),
    /// Service manager stopped the process because a timeout elapsed.
    Timeout,
    /// Outcome could not be determined.
    Unknown(String),
}

impl ExitStatus {
    /// Clean exits do not raise a crash notification.
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Success | Self::ExitCode(0))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ExitCode(_) => "exit_code",
            Self::Signaled(_) => "signaled",
            Self::CoreDumped(_) => "core_dumped",
            Self::OutOfMemory => "out_of_memory",
            Self::ServiceFailed(_) => "service_failed",
            Self::Timeout => "timeout",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::ExitCode(code) => write!(f, "exit code {code}"),
            Self::Signaled(signal) => write!(f, "killed by signal {signal}"),
            Self::CoreDumped(signal) => write!(f, "core dumped (signal {signal})"),
            Self::OutOfMemory => write!(f, "killed: out of memory"),
            Self::ServiceFailed(result) => write!(f, "service failed: {result}"),
            Self::Timeout => write!(f, "timed out"),
            Self::Unknown(detail) => write!(f, "unknown ({detail})"),
        }
    }
}
