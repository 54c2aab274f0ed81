mod instance_supervisor;

use crate::backoff::SpawnBackoff;
use crate::instance_handle::InstanceHandle;
use crate::instance_supervisor::InstanceSupervisor;
use crate::supervisor_deps::SupervisorDeps;
use crate::supervisor_settings::SupervisorSettings;

use fakes::{
    FakeProcessManager, FakeStopRequester, FakeUpdateProvider, MemoryStore, RecordingNotifier,
};

use gs_config::{InstanceConfig, SpawnRetryConfig};
use gs_core::InstanceKey;

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::task::JoinHandle;

pub(crate) const CONTROL_ENDPOINT: &str = "http://127.0.0.1:27015/control/stop";
pub(crate) const STOP_GRACE: Duration = Duration::from_secs(30);

/// Let every ready task run until the runtime goes idle.
pub(crate) async fn settle() {
    for _ in 0..5 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

pub(crate) fn key(value: &str) -> InstanceKey {
    InstanceKey::new(value).unwrap()
}

pub(crate) fn settings() -> SupervisorSettings {
    let retry = SpawnRetryConfig {
        jitter: false,
        ..SpawnRetryConfig::default()
    };
    SupervisorSettings {
        queue_capacity: 16,
        max_init_failures: 3,
        stop_request_timeout: Duration::from_secs(5),
        stop_grace: STOP_GRACE,
        shutdown_timeout: Duration::from_secs(60),
        spawn_backoff: SpawnBackoff::new(&retry),
        public_url: "http://127.0.0.1:8080".to_string(),
    }
}

/// One instance wired to in-memory collaborators.
pub(crate) struct Fixture {
    pub root: TempDir,
    pub config: InstanceConfig,
    pub settings: SupervisorSettings,
    pub processes: Arc<FakeProcessManager>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub stopper: Arc<FakeStopRequester>,
    pub updates: Arc<FakeUpdateProvider>,
}

impl Fixture {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let mut config = InstanceConfig::new(
            key("arena"),
            root.path().to_str().unwrap(),
            "arena-server",
        );
        config.control_endpoint = Some(CONTROL_ENDPOINT.to_string());

        let processes = FakeProcessManager::new();
        Self {
            root,
            config,
            settings: settings(),
            stopper: FakeStopRequester::new(processes.clone()),
            processes,
            store: MemoryStore::new(),
            notifier: RecordingNotifier::new(),
            updates: FakeUpdateProvider::new(),
        }
    }

    pub fn deps(&self) -> SupervisorDeps {
        SupervisorDeps {
            processes: self.processes.clone(),
            store: self.store.clone(),
            notifier: self.notifier.clone(),
            stop_requester: self.stopper.clone(),
        }
    }

    pub async fn boot(&self) -> (InstanceHandle, JoinHandle<()>) {
        let booted = InstanceSupervisor::spawn(
            self.config.clone(),
            self.updates.clone(),
            self.settings.clone(),
            self.deps(),
        )
        .await;
        settle().await;
        booted
    }
}
