use crate::direct::{ChildProcessHandle, ReattachedProcessHandle, executable_matches};
use crate::{ProcessError, ProcessManager, Result, SharedProcessHandle};

use gs_core::{ErrorLocation, InstanceKey, LaunchSpec, ReattachData};
use gs_db::InstanceRecordRepository;

use std::panic::Location;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{error, info, warn};

/// Runs each server as a direct child in its own process group.
pub struct DirectProcessManager {
    records: Option<InstanceRecordRepository>,
}

impl DirectProcessManager {
    /// Manager that records pids so servers can be reattached later.
    pub fn new(records: InstanceRecordRepository) -> Self {
        Self {
            records: Some(records),
        }
    }

    /// Manager without reattach support.
    pub fn ephemeral() -> Self {
        Self { records: None }
    }

    fn build_command(spec: &LaunchSpec) -> Result<Command> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.working_dir)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .kill_on_drop(false);

        match &spec.log_file {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                cmd.stdout(Stdio::from(file.try_clone()?))
                    .stderr(Stdio::from(file));
            }
            None => {
                cmd.stdout(Stdio::null()).stderr(Stdio::null());
            }
        }

        // New process group so a kill reaches every descendant
        #[cfg(unix)]
        cmd.process_group(0);

        Ok(cmd)
    }
}

#[async_trait]
impl ProcessManager for DirectProcessManager {
    fn can_persist(&self) -> bool {
        self.records.is_some()
    }

    async fn start_server(
        &self,
        key: &InstanceKey,
        spec: &LaunchSpec,
    ) -> Result<SharedProcessHandle> {
        let mut cmd = Self::build_command(spec)?;

        let child = cmd.spawn().map_err(|source| ProcessError::Spawn {
            program: spec.program.clone(),
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let pid = child.id().ok_or_else(|| ProcessError::Spawn {
            program: spec.program.clone(),
            source: std::io::Error::other("process exited before its pid was read"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("Started {} for '{key}' as pid {pid}", spec.program.display());

        if let Some(records) = &self.records
            && let Err(e) = records.set_reattach(key, &ReattachData::Pid(pid)).await
        {
            error!("Failed to record pid {pid} for '{key}': {e}");
        }

        Ok(Arc::new(ChildProcessHandle::watch(pid, child)))
    }

    async fn try_get_persisted_server(
        &self,
        key: &InstanceKey,
        expected_program: &Path,
    ) -> Result<Option<SharedProcessHandle>> {
        let Some(records) = &self.records else {
            return Ok(None);
        };

        let Some(record) = records.find(key).await? else {
            return Ok(None);
        };

        let pid = match record.reattach {
            Some(ReattachData::Pid(pid)) => pid,
            Some(ReattachData::Unit(unit)) => {
                warn!("Ignoring systemd unit {unit} recorded for '{key}' under the direct backend");
                return Ok(None);
            }
            None => return Ok(None),
        };

        if !process_alive(pid) {
            info!("Recorded pid {pid} for '{key}' is no longer running");
            return Ok(None);
        }

        if !executable_matches(pid, expected_program) {
            warn!(
                "Recorded pid {pid} for '{key}' is not running {}; not reattaching",
                expected_program.display()
            );
            return Ok(None);
        }

        info!("Reattached to pid {pid} for '{key}'");
        Ok(Some(Arc::new(ReattachedProcessHandle::watch(pid))))
    }

    async fn forget_persisted_server(&self, key: &InstanceKey) -> Result<()> {
        if let Some(records) = &self.records {
            records.clear_reattach(key).await?;
        }
        Ok(())
    }
}

/// SIGKILL the process group led by `pid`, falling back to the pid alone.
#[cfg(unix)]
pub(crate) fn kill_process_group(pid: u32) -> Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill, killpg};
    use nix::unistd::Pid;

    let raw = i32::try_from(pid).map_err(|_| ProcessError::Signal {
        pid,
        message: "pid out of range".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    match killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => {
            warn!("killpg({pid}) failed: {e}; signalling the process directly");
            match kill(Pid::from_raw(raw), Signal::SIGKILL) {
                Ok(()) | Err(Errno::ESRCH) => {}
                Err(e) => {
                    return Err(ProcessError::Signal {
                        pid,
                        message: e.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn kill_process_group(pid: u32) -> Result<()> {
    Err(ProcessError::Signal {
        pid,
        message: "process groups are only supported on unix".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Signal 0 probe. A process we may not signal still counts as alive.
#[cfg(unix)]
pub(crate) fn process_alive(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };

    !matches!(kill(Pid::from_raw(raw), None), Err(Errno::ESRCH))
}

#[cfg(not(unix))]
pub(crate) fn process_alive(_pid: u32) -> bool {
    false
}
