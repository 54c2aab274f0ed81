use crate::update::SharedUpdateProvider;

use gs_config::InstanceConfig;
use gs_core::ExitStatus;

use tokio::sync::oneshot;

/// Everything an instance supervisor reacts to. Applied strictly in arrival order.
#[derive(Debug)]
pub enum SupervisorCommand {
    Start,
    Restart,
    Stop {
        reason: Option<String>,
    },
    Heartbeat,
    TimeoutFired {
        generation: u64,
    },
    ExitNotice {
        generation: u64,
        status: ExitStatus,
    },
    RetryStart {
        generation: u64,
    },
    /// Ask the provider whether a newer build exists. The answer arrives as
    /// `UpdateChecked`; `reply` also receives it when present.
    CheckForUpdate {
        reply: Option<oneshot::Sender<Option<bool>>>,
    },
    UpdateChecked {
        has_update: bool,
    },
    UpdateConfig {
        config: Box<InstanceConfig>,
        updates: SharedUpdateProvider,
    },
    /// Gracefully stop the process and end the consumer loop.
    Shutdown {
        done: oneshot::Sender<()>,
    },
}

impl SupervisorCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Restart => "restart",
            Self::Stop { .. } => "stop",
            Self::Heartbeat => "heartbeat",
            Self::TimeoutFired { .. } => "timeout_fired",
            Self::ExitNotice { .. } => "exit_notice",
            Self::RetryStart { .. } => "retry_start",
            Self::CheckForUpdate { .. } => "check_for_update",
            Self::UpdateChecked { .. } => "update_checked",
            Self::UpdateConfig { .. } => "update_config",
            Self::Shutdown { .. } => "shutdown",
        }
    }
}
