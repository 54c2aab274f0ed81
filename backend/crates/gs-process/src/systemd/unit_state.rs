use crate::{ProcessError, Result};

use gs_core::{ErrorLocation, ExitStatus};

use std::panic::Location;

/// Subset of `systemctl show` output needed to track a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitProperties {
    pub load_state: String,
    pub active_state: String,
    pub sub_state: String,
    pub result: String,
    pub exec_main_status: Option<i32>,
    pub main_pid: Option<u32>,
}

impl UnitProperties {
    /// Value for `systemctl show --property=`.
    pub const QUERY: &'static str =
        "LoadState,ActiveState,SubState,Result,ExecMainStatus,MainPID";

    /// Parse `KEY=VALUE` lines. Unknown keys are ignored.
    pub fn parse(output: &str) -> Self {
        let mut props = Self::default();

        for line in output.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "LoadState" => props.load_state = value.to_string(),
                "ActiveState" => props.active_state = value.to_string(),
                "SubState" => props.sub_state = value.to_string(),
                "Result" => props.result = value.to_string(),
                "ExecMainStatus" => props.exec_main_status = value.parse().ok(),
                "MainPID" => props.main_pid = value.parse().ok().filter(|pid| *pid != 0),
                _ => {}
            }
        }

        props
    }

    pub fn is_not_found(&self) -> bool {
        self.load_state == "not-found"
    }

    /// No process left in the unit, so its name can be reused once reset.
    pub fn is_settled(&self) -> bool {
        self.is_not_found() || matches!(self.active_state.as_str(), "inactive" | "failed")
    }
}

/// Lifecycle of a transient unit as seen by the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitState {
    Running,
    /// The unit never existed, or vanished before it was ever seen running.
    NotFound,
    Exited(ExitStatus),
}

impl UnitState {
    /// Classify `props`. `seen_active` records whether the unit was ever
    /// observed running, which turns a garbage-collected unit into a clean exit.
    #[track_caller]
    pub fn classify(unit: &str, props: &UnitProperties, seen_active: bool) -> Result<Self> {
        if props.is_not_found() {
            return Ok(if seen_active {
                Self::Exited(ExitStatus::Success)
            } else {
                Self::NotFound
            });
        }

        match props.active_state.as_str() {
            "active" | "activating" | "deactivating" | "reloading" => Ok(Self::Running),
            "failed" => Ok(Self::Exited(failed_status(props))),
            "inactive" => Ok(Self::Exited(match props.exec_main_status {
                Some(code) if code != 0 => ExitStatus::ExitCode(code),
                _ => ExitStatus::Success,
            })),
            other => Err(ProcessError::UnexpectedUnitState {
                unit: unit.to_string(),
                state: format!("{other}/{}", props.sub_state),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

fn failed_status(props: &UnitProperties) -> ExitStatus {
    let status = props.exec_main_status.unwrap_or_default();

    match props.result.as_str() {
        "timeout" => ExitStatus::Timeout,
        "exit-code" => ExitStatus::ExitCode(status),
        "signal" => ExitStatus::Signaled(status),
        "core-dump" => ExitStatus::CoreDumped(status),
        "oom-kill" => ExitStatus::OutOfMemory,
        "" => ExitStatus::Unknown("unit failed without a result".to_string()),
        other => ExitStatus::ServiceFailed(other.to_string()),
    }
}
