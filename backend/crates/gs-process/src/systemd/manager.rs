use crate::systemd::{Systemctl, SystemdUnitHandle, UnitState};
use crate::{ProcessManager, Result, SharedProcessHandle};

use gs_config::UnitNaming;
use gs_core::{InstanceKey, LaunchSpec, ReattachData};
use gs_db::InstanceRecordRepository;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

const STALE_UNIT_TIMEOUT: Duration = Duration::from_secs(10);
const STALE_UNIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Runs each server as a transient systemd service unit.
pub struct SystemdProcessManager {
    systemctl: Systemctl,
    naming: UnitNaming,
    prefix: String,
    records: Option<InstanceRecordRepository>,
}

impl SystemdProcessManager {
    pub fn new(
        naming: UnitNaming,
        prefix: impl Into<String>,
        user_scope: bool,
        records: Option<InstanceRecordRepository>,
    ) -> Self {
        Self {
            systemctl: Systemctl::new(user_scope),
            naming,
            prefix: prefix.into(),
            records,
        }
    }

    /// Unit name for the next launch of `key`.
    pub fn unit_name(&self, key: &InstanceKey) -> String {
        match self.naming {
            UnitNaming::Fixed => format!("{}{key}.service", self.prefix),
            UnitNaming::Random => {
                format!("{}{key}-{:08x}.service", self.prefix, rand::random::<u32>())
            }
        }
    }

    /// Kill and reset a leftover unit with the same fixed name. Errors are
    /// ignored since the unit usually does not exist.
    async fn clear_stale_unit(&self, unit: &str) {
        match self.systemctl.show(unit).await {
            Ok(props) if props.is_not_found() => return,
            Ok(props) if props.is_settled() => {
                debug!("Resetting stale unit {unit} ({})", props.active_state);
            }
            Ok(props) => {
                warn!(
                    "Clearing stale unit {unit} ({}/{})",
                    props.active_state, props.sub_state
                );
                if let Err(e) = self.systemctl.kill(unit).await {
                    debug!("kill {unit}: {e}");
                }
                self.wait_until_settled(unit).await;
            }
            Err(e) => debug!("Could not inspect {unit}: {e}"),
        }

        if let Err(e) = self.systemctl.reset_failed(unit).await {
            debug!("reset-failed {unit}: {e}");
        }
    }

    /// `systemctl kill` only queues the signal; poll until the unit is down.
    async fn wait_until_settled(&self, unit: &str) {
        let deadline = Instant::now() + STALE_UNIT_TIMEOUT;

        loop {
            match self.systemctl.show(unit).await {
                Ok(props) if props.is_settled() => return,
                Ok(_) => {}
                Err(e) => debug!("Could not inspect {unit}: {e}"),
            }

            if Instant::now() >= deadline {
                warn!(
                    "Stale unit {unit} still running after {}s; launch may fail",
                    STALE_UNIT_TIMEOUT.as_secs()
                );
                return;
            }
            tokio::time::sleep(STALE_UNIT_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl ProcessManager for SystemdProcessManager {
    fn can_persist(&self) -> bool {
        self.records.is_some()
    }

    async fn start_server(
        &self,
        key: &InstanceKey,
        spec: &LaunchSpec,
    ) -> Result<SharedProcessHandle> {
        let unit = self.unit_name(key);

        if self.naming == UnitNaming::Fixed {
            self.clear_stale_unit(&unit).await;
        }

        if let Some(log_file) = &spec.log_file
            && let Some(parent) = log_file.parent()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        self.systemctl.run(&unit, spec).await?;
        info!("Started {} for '{key}' as {unit}", spec.program.display());

        if let Some(records) = &self.records
            && let Err(e) = records
                .set_reattach(key, &ReattachData::Unit(unit.clone()))
                .await
        {
            error!("Failed to record unit {unit} for '{key}': {e}");
        }

        Ok(Arc::new(SystemdUnitHandle::watch(unit, self.systemctl.clone())))
    }

    async fn try_get_persisted_server(
        &self,
        key: &InstanceKey,
        _expected_program: &Path,
    ) -> Result<Option<SharedProcessHandle>> {
        let Some(records) = &self.records else {
            return Ok(None);
        };

        let Some(record) = records.find(key).await? else {
            return Ok(None);
        };

        let unit = match record.reattach {
            Some(ReattachData::Unit(unit)) => unit,
            Some(ReattachData::Pid(pid)) => {
                warn!("Ignoring pid {pid} recorded for '{key}' under the systemd backend");
                return Ok(None);
            }
            None => return Ok(None),
        };

        let props = self.systemctl.show(&unit).await?;
        match UnitState::classify(&unit, &props, false) {
            Ok(UnitState::Running) => {
                info!("Reattached to {unit} for '{key}'");
                Ok(Some(Arc::new(SystemdUnitHandle::watch(
                    unit,
                    self.systemctl.clone(),
                ))))
            }
            Ok(state) => {
                info!("Recorded unit {unit} for '{key}' is not running ({state:?})");
                if props.active_state == "failed"
                    && let Err(e) = self.systemctl.reset_failed(&unit).await
                {
                    debug!("reset-failed {unit}: {e}");
                }
                Ok(None)
            }
            Err(e) => {
                warn!("Not reattaching to {unit}: {e}");
                Ok(None)
            }
        }
    }

    async fn forget_persisted_server(&self, key: &InstanceKey) -> Result<()> {
        if let Some(records) = &self.records {
            records.clear_reattach(key).await?;
        }
        Ok(())
    }
}
