use crate::{DirectProcessManager, ProcessManager, SystemdProcessManager};

use gs_config::{ProcessBackend, ProcessConfig};
use gs_db::InstanceRecordRepository;

use std::sync::Arc;

/// Factory for the configured process backend
#[derive(Clone)]
pub struct ProcessManagerFactory {
    config: ProcessConfig,
}

impl ProcessManagerFactory {
    pub fn new(config: ProcessConfig) -> Self {
        Self { config }
    }

    pub fn backend(&self) -> ProcessBackend {
        self.config.backend
    }

    pub fn create(&self, records: Option<InstanceRecordRepository>) -> Arc<dyn ProcessManager> {
        match self.config.backend {
            ProcessBackend::Direct => Arc::new(match records {
                Some(records) => DirectProcessManager::new(records),
                None => DirectProcessManager::ephemeral(),
            }),
            ProcessBackend::Systemd => Arc::new(SystemdProcessManager::new(
                self.config.unit_naming,
                self.config.unit_prefix.clone(),
                self.config.user_scope,
                records,
            )),
        }
    }
}

impl Default for ProcessManagerFactory {
    fn default() -> Self {
        Self::new(ProcessConfig::default())
    }
}
