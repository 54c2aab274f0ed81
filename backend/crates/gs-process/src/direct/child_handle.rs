use crate::direct::exit_status_from_os;
use crate::{ExitWatch, ProcessHandle, Result, dump};

use gs_core::ExitStatus;

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Child;
use tracing::{debug, warn};

/// A server spawned by this supervisor run. A background task reaps the
/// child and publishes its status.
#[derive(Debug)]
pub struct ChildProcessHandle {
    pid: u32,
    exit: ExitWatch,
}

impl ChildProcessHandle {
    pub(crate) fn watch(pid: u32, mut child: Child) -> Self {
        let (exit, publisher) = ExitWatch::channel();

        tokio::spawn(async move {
            let status = match child.wait().await {
                Ok(status) => exit_status_from_os(status),
                Err(e) => {
                    warn!("Waiting on pid {pid} failed: {e}");
                    ExitStatus::Unknown(e.to_string())
                }
            };
            debug!("pid {pid} exited: {status}");
            publisher.publish(status);
        });

        Self { pid, exit }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

#[async_trait]
impl ProcessHandle for ChildProcessHandle {
    fn describe(&self) -> String {
        format!("pid {}", self.pid)
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
