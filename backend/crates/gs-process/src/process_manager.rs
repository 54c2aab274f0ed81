use crate::Result;

use gs_core::{ExitStatus, InstanceKey, LaunchSpec};

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

/// A handle to one supervised process or service.
#[async_trait]
pub trait ProcessHandle: Send + Sync + fmt::Debug {
    /// Human readable identity for logs (pid or unit name).
    fn describe(&self) -> String;

    /// Forcefully terminate the process and all of its descendants.
    async fn kill(&self) -> Result<()>;

    /// Suspend until the process has exited. Dropping the future cancels the wait.
    async fn wait_for_exit(&self) -> ExitStatus;

    /// Exit status once known. Cached after the first resolution.
    fn exit_status(&self) -> Option<ExitStatus>;

    /// Best-effort diagnostic dump written next to `path`.
    async fn dump_process(&self, path: &Path) -> Result<()>;
}

pub type SharedProcessHandle = Arc<dyn ProcessHandle>;

/// Launches server processes and recovers ones that outlived a previous
/// supervisor run.
#[async_trait]
pub trait ProcessManager: Send + Sync {
    /// Whether this manager records reattach data.
    fn can_persist(&self) -> bool;

    /// Spawn the server. Never returns a handle for a process that did not start.
    async fn start_server(&self, key: &InstanceKey, spec: &LaunchSpec)
    -> Result<SharedProcessHandle>;

    /// Find a process started by an earlier run. Absent when nothing was
    /// recorded, when it is no longer running or when it does not match
    /// `expected_program`.
    async fn try_get_persisted_server(
        &self,
        key: &InstanceKey,
        expected_program: &Path,
    ) -> Result<Option<SharedProcessHandle>>;

    /// Drop reattach data after the process is confirmed gone.
    async fn forget_persisted_server(&self, key: &InstanceKey) -> Result<()>;
}
