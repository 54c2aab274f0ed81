use crate::systemd::{Systemctl, UnitState};
use crate::{ExitWatch, ProcessError, ProcessHandle, Result, dump};

use gs_core::ExitStatus;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, warn};

const UNIT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A server running as a transient systemd unit. Unit state is polled and
/// the first terminal state is published as the exit status.
#[derive(Debug)]
pub struct SystemdUnitHandle {
    unit: String,
    systemctl: Systemctl,
    exit: ExitWatch,
}

impl SystemdUnitHandle {
    pub(crate) fn watch(unit: String, systemctl: Systemctl) -> Self {
        let (exit, publisher) = ExitWatch::channel();
        let poll_unit = unit.clone();
        let poll_systemctl = systemctl.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(UNIT_POLL_INTERVAL);
            // The handle is only created for a unit known to be running
            let seen_active = true;

            loop {
                interval.tick().await;
                if publisher.is_abandoned() {
                    break;
                }

                let props = match poll_systemctl.show(&poll_unit).await {
                    Ok(props) => props,
                    Err(e) => {
                        warn!("Polling {poll_unit} failed: {e}");
                        continue;
                    }
                };

                match UnitState::classify(&poll_unit, &props, seen_active) {
                    Ok(UnitState::Running) => {}
                    Ok(UnitState::NotFound) => {
                        publisher.publish(ExitStatus::Unknown(format!(
                            "unit {poll_unit} disappeared"
                        )));
                        break;
                    }
                    Ok(UnitState::Exited(status)) => {
                        debug!("{poll_unit} exited: {status}");
                        if props.active_state == "failed"
                            && let Err(e) = poll_systemctl.reset_failed(&poll_unit).await
                        {
                            warn!("reset-failed {poll_unit}: {e}");
                        }
                        publisher.publish(status);
                        break;
                    }
                    Err(e) => error!("{e}"),
                }
            }
        });

        Self {
            unit,
            systemctl,
            exit,
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

#[async_trait]
impl ProcessHandle for SystemdUnitHandle {
    fn describe(&self) -> String {
        format!("unit {}", self.unit)
    }

    async fn kill(&self) -> Result<()> {
        if self.exit.current().is_some() {
            return Ok(());
        }
        self.systemctl.kill(&self.unit).await
    }

    async fn wait_for_exit(&self) -> ExitStatus {
        self.exit.wait().await
    }

    fn exit_status(&self) -> Option<ExitStatus> {
        self.exit.current()
    }

    async fn dump_process(&self, path: &Path) -> Result<()> {
        let props = self.systemctl.show(&self.unit).await?;
        let pid = props
            .main_pid
            .ok_or_else(|| ProcessError::dump(format!("{} has no main pid", self.unit)))?;
        dump::gcore(pid, path).await
    }
}
