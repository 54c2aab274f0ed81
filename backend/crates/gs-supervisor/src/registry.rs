use crate::instance_handle::InstanceHandle;
use crate::instance_supervisor::InstanceSupervisor;
use crate::status::InstanceStatus;
use crate::supervisor_deps::SupervisorDeps;
use crate::supervisor_settings::SupervisorSettings;
use crate::update::SharedUpdateProvider;
use crate::{Result, SupervisorError};

use gs_config::InstanceConfig;
use gs_core::InstanceKey;

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// What the registry needs to run one configured instance.
#[derive(Debug, Clone)]
pub struct InstanceSetup {
    pub config: InstanceConfig,
    pub updates: SharedUpdateProvider,
    /// `None` disables periodic update checks.
    pub check_interval: Option<Duration>,
}

/// Outcome of a configuration reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigReload {
    pub updated: Vec<InstanceKey>,
    /// Present in the new configuration only; needs a supervisor restart.
    pub added: Vec<InstanceKey>,
    /// Missing from the new configuration; keeps running until a restart.
    pub removed: Vec<InstanceKey>,
}

/// Owns every instance supervisor and routes requests to them by key.
pub struct SupervisorRegistry {
    instances: BTreeMap<InstanceKey, InstanceHandle>,
    actors: Mutex<Vec<JoinHandle<()>>>,
    update_checks: Mutex<HashMap<InstanceKey, JoinHandle<()>>>,
    shutdown_timeout: Duration,
    shut_down: AtomicBool,
}

impl SupervisorRegistry {
    /// Recover or start every instance concurrently and begin periodic
    /// update checks.
    pub async fn start(
        setups: Vec<InstanceSetup>,
        settings: SupervisorSettings,
        deps: SupervisorDeps,
    ) -> Self {
        let shutdown_timeout = settings.shutdown_timeout;

        let booted = join_all(setups.into_iter().map(|setup| {
            let settings = settings.clone();
            let deps = deps.clone();
            async move {
                let (handle, task) =
                    InstanceSupervisor::spawn(setup.config, setup.updates, settings, deps).await;
                (handle, task, setup.check_interval)
            }
        }))
        .await;

        let mut instances = BTreeMap::new();
        let mut actors = Vec::with_capacity(booted.len());
        let mut update_checks = HashMap::new();

        for (handle, task, check_interval) in booted {
            if let Some(interval) = check_interval {
                update_checks.insert(
                    handle.key().clone(),
                    spawn_update_checks(handle.clone(), interval),
                );
            }
            instances.insert(handle.key().clone(), handle);
            actors.push(task);
        }

        info!("Supervising {} instance(s)", instances.len());

        Self {
            instances,
            actors: Mutex::new(actors),
            update_checks: Mutex::new(update_checks),
            shutdown_timeout,
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &InstanceKey> {
        self.instances.keys()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[track_caller]
    pub fn get(&self, key: &str) -> Result<&InstanceHandle> {
        self.instances
            .get(key)
            .ok_or_else(|| SupervisorError::unknown_instance(key))
    }

    pub fn status(&self, key: &str) -> Result<InstanceStatus> {
        Ok(self.get(key)?.status())
    }

    pub fn list(&self) -> Vec<InstanceStatus> {
        self.instances.values().map(InstanceHandle::status).collect()
    }

    /// Forward a heartbeat if `token` is the instance's current secret.
    pub async fn heartbeat(&self, key: &str, token: &str) -> Result<()> {
        let handle = self.get(key)?;
        if !handle.verify_token(token) {
            debug!("Rejected heartbeat for '{key}': token mismatch");
            return Err(SupervisorError::invalid_token(handle.key().clone()));
        }
        handle.heartbeat().await
    }

    pub async fn restart(&self, key: &str) -> Result<()> {
        info!("Restart requested for '{key}'");
        self.get(key)?.restart().await
    }

    pub async fn stop(&self, key: &str, reason: Option<String>) -> Result<()> {
        info!("Stop requested for '{key}'");
        self.get(key)?.stop(reason).await
    }

    /// On-demand update check. `None` when the provider could not be reached.
    pub async fn request_update_check(&self, key: &str) -> Result<Option<bool>> {
        info!("Update check requested for '{key}'");
        self.get(key)?.check_for_update_now().await
    }

    /// Push new configuration to existing instances. Instances cannot be
    /// added or removed without restarting the supervisor.
    pub async fn apply_config(&self, setups: Vec<InstanceSetup>) -> ConfigReload {
        let mut reload = ConfigReload::default();
        let mut seen = Vec::with_capacity(setups.len());
        let mut update_checks = self.update_checks.lock().await;

        for setup in setups {
            let key = setup.config.key.clone();
            seen.push(key.clone());

            let Some(handle) = self.instances.get(&key) else {
                warn!("Instance '{key}' was added to the configuration; restart to supervise it");
                reload.added.push(key);
                continue;
            };

            if let Err(e) = handle
                .update_config(setup.config, setup.updates.clone())
                .await
            {
                error!("Failed to deliver configuration to '{key}': {e}");
                continue;
            }

            if let Some(task) = update_checks.remove(&key) {
                task.abort();
            }
            if let Some(interval) = setup.check_interval {
                update_checks.insert(key.clone(), spawn_update_checks(handle.clone(), interval));
            }

            reload.updated.push(key);
        }

        for key in self.instances.keys() {
            if !seen.contains(key) {
                warn!("Instance '{key}' was removed from the configuration; restart to stop supervising it");
                reload.removed.push(key.clone());
            }
        }

        reload
    }

    /// Gracefully stop every instance, waiting at most the configured
    /// shutdown timeout. Later calls return immediately.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }

        for (_, task) in self.update_checks.lock().await.drain() {
            task.abort();
        }

        info!("Stopping {} instance(s)", self.instances.len());
        let stops = join_all(self.instances.values().map(|handle| async move {
            if let Err(e) = handle.shutdown().await {
                warn!("Shutdown of '{}' failed: {e}", handle.key());
            }
        }));

        if tokio::time::timeout(self.shutdown_timeout, stops)
            .await
            .is_err()
        {
            error!(
                "Instances did not stop within {:?}; abandoning them",
                self.shutdown_timeout
            );
        }

        for task in self.actors.lock().await.drain(..) {
            task.abort();
        }
    }
}

fn spawn_update_checks(handle: InstanceHandle, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if handle.check_for_update().await.is_err() {
                debug!("Update checks for '{}' stopped", handle.key());
                break;
            }
        }
    })
}
