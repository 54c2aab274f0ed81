use crate::{ExitWatch, ProcessHandle, Result, dump};

use gs_core::ExitStatus;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

const LIVENESS_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A server adopted from an earlier supervisor run. It is not our child, so
/// its exit code cannot be collected; liveness is polled instead.
#[derive(Debug)]
pub struct ReattachedProcessHandle {
    pid: u32,
    exit: ExitWatch,
}

impl ReattachedProcessHandle {
    pub(crate) fn watch(pid: u32) -> Self {
        let (exit, publisher) = ExitWatch::channel();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(LIVENESS_POLL_INTERVAL);
            loop {
                interval.tick().await;
                if publisher.is_abandoned() {
                    break;
                }
                if !super::manager::process_alive(pid) {
                    debug!("Reattached pid {pid} is gone");
                    publisher.publish(ExitStatus::Unknown(
                        "exit status of reattached process is unavailable".to_string(),
                    ));
                    break;
                }
            }
        });

        Self { pid, exit }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

#[async_trait]
impl ProcessHandle for ReattachedProcessHandle {
    fn describe(&self) -> String {
        format!("pid {} (reattached)", self.pid)
    }

    async fn kill(&self) -> Result<()> {
        if self.exit.current().is_some() {
            return Ok(());
        }
        super::manager::kill_process_group(self.pid)
    }

    async fn wait_for_exit(&self) -> ExitStatus {
        self.exit.wait().await
    }

    fn exit_status(&self) -> Option<ExitStatus> {
        self.exit.current()
    }

    async fn dump_process(&self, path: &Path) -> Result<()> {
        dump::gcore(self.pid, path).await
    }
}
