//! Per-instance supervision engine.
//!
//! Each configured instance gets one [`InstanceSupervisor`] running as its own
//! task. Every input (operator commands, heartbeats, process exits, timer
//! expiries, update-check results) arrives as a [`SupervisorCommand`] on a
//! bounded queue and is applied by a single consumer loop, so lifecycle state
//! is never shared.
//!
//! Asynchronous notices carry the generation that was current when they were
//! scheduled and are dropped when it no longer matches.

use crate::command::SupervisorCommand;
use crate::graceful_stop::GracefulStop;
use crate::instance_handle::InstanceHandle;
use crate::launch::{build_launch_spec, instance_control_url};
use crate::metrics::SupervisorMetrics;
use crate::status::{InstancePhase, InstanceStatus};
use crate::supervisor_deps::SupervisorDeps;
use crate::supervisor_settings::SupervisorSettings;
use crate::update::SharedUpdateProvider;

use gs_auth::InstanceToken;
use gs_config::InstanceConfig;
use gs_core::{ExitStatus, InstanceKey, Notification, NotificationKind, VersionDescriptor};
use gs_process::SharedProcessHandle;

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

const SHUTDOWN_STOP_REASON: &str = "supervisor shutdown";
const RESTART_STOP_REASON: &str = "restart requested";
const UPDATE_STOP_REASON: &str = "update available";
const DEFAULT_STOP_REASON: &str = "operator request";

/// Upper bound on waiting for a killed process to be reaped during shutdown.
const KILL_CONFIRM_TIMEOUT: Duration = Duration::from_secs(10);

pub struct InstanceSupervisor {
    key: InstanceKey,
    config: InstanceConfig,
    updates: SharedUpdateProvider,
    settings: SupervisorSettings,
    deps: SupervisorDeps,
    metrics: SupervisorMetrics,

    commands: mpsc::WeakSender<SupervisorCommand>,
    receiver: mpsc::Receiver<SupervisorCommand>,
    status_tx: watch::Sender<InstanceStatus>,
    token_tx: watch::Sender<Option<InstanceToken>>,

    stopped: bool,
    stop_reason: Option<String>,
    running: Option<SharedProcessHandle>,
    last_heartbeat: Option<Instant>,
    last_heartbeat_at: Option<DateTime<Utc>>,
    consecutive_init_failures: u32,
    awaiting_update_to_recover: bool,
    update_pending_on_next_start: bool,
    start_generation: u64,
    timeout_generation: u64,
    current_version: Option<VersionDescriptor>,
    spawn_attempts: u32,
    last_exit: Option<ExitStatus>,

    exit_watch: Option<JoinHandle<()>>,
    timeout_watch: Option<JoinHandle<()>>,
    retry_timer: Option<JoinHandle<()>>,
    stop_task: Option<JoinHandle<()>>,
}

impl InstanceSupervisor {
    pub fn new(
        config: InstanceConfig,
        updates: SharedUpdateProvider,
        settings: SupervisorSettings,
        deps: SupervisorDeps,
    ) -> (Self, InstanceHandle) {
        let key = config.key.clone();
        let (command_tx, receiver) = mpsc::channel(settings.queue_capacity);
        let (status_tx, status_rx) = watch::channel(InstanceStatus::new(key.clone()));
        let (token_tx, token_rx) = watch::channel(None);

        let handle = InstanceHandle::new(key.clone(), command_tx.clone(), status_rx, token_rx);

        let supervisor = Self {
            key,
            config,
            updates,
            settings,
            deps,
            metrics: SupervisorMetrics::new(),
            commands: command_tx.downgrade(),
            receiver,
            status_tx,
            token_tx,
            stopped: false,
            stop_reason: None,
            running: None,
            last_heartbeat: None,
            last_heartbeat_at: None,
            consecutive_init_failures: 0,
            awaiting_update_to_recover: false,
            update_pending_on_next_start: false,
            start_generation: 0,
            timeout_generation: 0,
            current_version: None,
            spawn_attempts: 0,
            last_exit: None,
            exit_watch: None,
            timeout_watch: None,
            retry_timer: None,
            stop_task: None,
        };

        (supervisor, handle)
    }

    /// Recover or start the instance, then run the consumer loop on its own task.
    pub async fn spawn(
        config: InstanceConfig,
        updates: SharedUpdateProvider,
        settings: SupervisorSettings,
        deps: SupervisorDeps,
    ) -> (InstanceHandle, JoinHandle<()>) {
        let (mut supervisor, handle) = Self::new(config, updates, settings, deps);
        supervisor.boot().await;
        let task = tokio::spawn(supervisor.run());
        (handle, task)
    }

    /// Reattach to a process left by a previous run, or start a fresh one.
    pub async fn boot(&mut self) {
        let mut persisted_secret = None;
        match self.deps.store.load(&self.key).await {
            Ok(record) => {
                self.current_version = record.current_version;
                persisted_secret = record.secret_token;
            }
            Err(e) => error!("Failed to load persisted record for '{}': {e}", self.key),
        }

        let program = self.config.program_path();
        match self
            .deps
            .processes
            .try_get_persisted_server(&self.key, &program)
            .await
        {
            Ok(Some(handle)) => {
                info!("Reattached '{}' to {}", self.key, handle.describe());
                match persisted_secret {
                    Some(secret) => {
                        self.token_tx
                            .send_replace(Some(InstanceToken::from_persisted(secret)));
                    }
                    None => warn!(
                        "No persisted secret for '{}'; heartbeats are rejected until its next start",
                        self.key
                    ),
                }
                // Treated as initialized: it was running before we restarted
                self.last_heartbeat = Some(Instant::now());
                self.last_heartbeat_at = Some(Utc::now());
                self.start_generation += 1;
                self.timeout_generation += 1;
                self.metrics.process_reattached();
                self.adopt(handle);
            }
            Ok(None) => self.start().await,
            Err(e) => {
                warn!("Reattach check for '{}' failed: {e}", self.key);
                self.start().await;
            }
        }

        self.publish_status();
    }

    pub async fn run(mut self) {
        while let Some(command) = self.receiver.recv().await {
            trace!("'{}' <- {}", self.key, command.name());

            match command {
                SupervisorCommand::Shutdown { done } => {
                    self.shutdown().await;
                    let _ = done.send(());
                    break;
                }
                command => self.handle(command).await,
            }

            self.publish_status();
        }

        self.abort_tasks();
        debug!("Supervisor for '{}' stopped", self.key);
    }

    async fn handle(&mut self, command: SupervisorCommand) {
        match command {
            SupervisorCommand::Start => self.start().await,
            SupervisorCommand::Restart => self.restart().await,
            SupervisorCommand::Stop { reason } => self.stop(reason),
            SupervisorCommand::Heartbeat => self.heartbeat(),
            SupervisorCommand::TimeoutFired { generation } => self.on_timeout(generation).await,
            SupervisorCommand::ExitNotice { generation, status } => {
                self.on_exit(generation, status).await
            }
            SupervisorCommand::RetryStart { generation } => self.on_retry(generation).await,
            SupervisorCommand::CheckForUpdate { reply } => self.check_for_update(reply),
            SupervisorCommand::UpdateChecked { has_update } => {
                self.on_update_checked(has_update).await
            }
            SupervisorCommand::UpdateConfig { config, updates } => {
                self.apply_config(*config, updates)
            }
            // Consumed by the run loop
            SupervisorCommand::Shutdown { .. } => {}
        }
    }

    async fn start(&mut self) {
        if let Some(handle) = &self.running {
            debug!(
                "'{}' is already running as {}; ignoring start",
                self.key,
                handle.describe()
            );
            return;
        }

        self.cancel_retry();

        if self.update_pending_on_next_start {
            self.apply_pending_update().await;
        }

        let token = InstanceToken::generate();
        if let Err(e) = self.deps.store.save_secret(&self.key, token.expose()).await {
            error!("Failed to persist secret for '{}': {e}", self.key);
        }
        self.token_tx.send_replace(Some(token.clone()));

        self.last_heartbeat = None;
        self.last_heartbeat_at = None;
        self.start_generation += 1;
        self.timeout_generation += 1;

        self.prepare_directories().await;

        let overrides = self.updates.launch_overrides(self.current_version.as_ref());
        let control_url = instance_control_url(&self.settings.public_url, &self.config);
        let spec = build_launch_spec(&self.config, &token, &control_url, &overrides);

        match self.deps.processes.start_server(&self.key, &spec).await {
            Ok(handle) => {
                info!(
                    "Started '{}' as {} (generation {})",
                    self.key,
                    handle.describe(),
                    self.start_generation
                );
                self.metrics.process_started();
                self.spawn_attempts = 0;
                self.adopt(handle);
            }
            Err(e) => {
                error!("Failed to start '{}': {e}", self.key);
                self.metrics.spawn_failed();
                self.schedule_retry();
            }
        }
    }

    async fn restart(&mut self) {
        self.stopped = false;
        self.stop_reason = None;
        self.spawn_attempts = 0;
        if self.awaiting_update_to_recover {
            info!("Operator restart of '{}' overrides the wait for an update", self.key);
            self.awaiting_update_to_recover = false;
        }

        match self.running.clone() {
            Some(handle) => self.begin_graceful_stop(handle, RESTART_STOP_REASON.to_string()),
            None => self.start().await,
        }
    }

    fn stop(&mut self, reason: Option<String>) {
        self.stopped = true;
        self.stop_reason = reason.clone();
        self.cancel_retry();

        match self.running.clone() {
            Some(handle) => {
                let reason = reason.unwrap_or_else(|| DEFAULT_STOP_REASON.to_string());
                self.begin_graceful_stop(handle, reason);
            }
            None => info!("'{}' marked stopped while not running", self.key),
        }
    }

    fn heartbeat(&mut self) {
        self.last_heartbeat = Some(Instant::now());
        self.last_heartbeat_at = Some(Utc::now());
        self.timeout_generation += 1;
        self.metrics.heartbeat_received();

        if self.running.is_some() {
            self.arm_timeout_watch();
        }
    }

    async fn on_timeout(&mut self, generation: u64) {
        if generation != self.timeout_generation {
            self.discard_stale("timeout_fired", generation);
            return;
        }
        let Some(handle) = self.running.clone() else {
            self.discard_stale("timeout_fired", generation);
            return;
        };

        warn!(
            "'{}' missed its heartbeat deadline of {:?}; killing {}",
            self.key,
            self.config.heartbeat_timeout(),
            handle.describe()
        );
        self.metrics.heartbeat_timeout();

        if self.config.dump_on_timeout {
            self.capture_dump(&handle).await;
        }

        if let Err(e) = handle.kill().await {
            error!("Failed to kill '{}' after timeout: {e}", self.key);
        }
    }

    async fn on_exit(&mut self, generation: u64, status: ExitStatus) {
        if generation != self.start_generation {
            self.discard_stale("exit_notice", generation);
            return;
        }
        let Some(handle) = self.running.take() else {
            self.discard_stale("exit_notice", generation);
            return;
        };

        abort(&mut self.timeout_watch);
        abort(&mut self.stop_task);

        info!("'{}' ({}) exited: {status}", self.key, handle.describe());
        self.metrics.process_exited(&status);
        self.last_exit = Some(status.clone());

        if let Err(e) = self.deps.processes.forget_persisted_server(&self.key).await {
            warn!("Failed to clear reattach data for '{}': {e}", self.key);
        }

        if !status.is_clean() {
            self.notify(NotificationKind::Crashed { status }).await;
        }

        if self.last_heartbeat.is_none() {
            self.consecutive_init_failures += 1;
            warn!(
                "'{}' exited before its first heartbeat ({}/{})",
                self.key, self.consecutive_init_failures, self.settings.max_init_failures
            );

            if self.consecutive_init_failures >= self.settings.max_init_failures {
                error!(
                    "'{}' failed to initialize {} times in a row; waiting for an update",
                    self.key, self.consecutive_init_failures
                );
                self.awaiting_update_to_recover = true;
                self.metrics.needs_intervention();
                self.notify(NotificationKind::NeedsIntervention {
                    consecutive_failures: self.consecutive_init_failures,
                })
                .await;
                return;
            }
        } else {
            self.consecutive_init_failures = 0;
        }

        if self.stopped {
            let reason = self.stop_reason.clone();
            self.notify(NotificationKind::Stopped { reason }).await;
            return;
        }

        self.start().await;
    }

    async fn on_retry(&mut self, generation: u64) {
        if generation != self.start_generation
            || self.running.is_some()
            || self.stopped
            || self.awaiting_update_to_recover
        {
            self.discard_stale("retry_start", generation);
            return;
        }

        info!(
            "Retrying start of '{}' (attempt {})",
            self.key, self.spawn_attempts
        );
        self.start().await;
    }

    fn check_for_update(&mut self, reply: Option<oneshot::Sender<Option<bool>>>) {
        let key = self.key.clone();
        let updates = self.updates.clone();
        let current = self.current_version.clone();
        let commands = self.commands.clone();

        tokio::spawn(async move {
            let outcome = match updates.check_for_update(current.as_ref()).await {
                Ok(has_update) => Some(has_update),
                Err(e) => {
                    warn!("Update check for '{key}' via {} failed: {e}", updates.name());
                    None
                }
            };

            if let Some(has_update) = outcome
                && let Some(commands) = commands.upgrade()
            {
                let _ = commands
                    .send(SupervisorCommand::UpdateChecked { has_update })
                    .await;
            }

            if let Some(reply) = reply {
                let _ = reply.send(outcome);
            }
        });
    }

    async fn on_update_checked(&mut self, has_update: bool) {
        self.update_pending_on_next_start = has_update;
        if !has_update {
            return;
        }

        if self.running.is_some() {
            info!("Update available for '{}'; asking it to stop", self.key);
            self.request_update_stop();
        } else if self.stopped {
            debug!(
                "Update available for '{}'; it is stopped, applying on next start",
                self.key
            );
        } else if self.awaiting_update_to_recover {
            info!("Update available for '{}'; resuming", self.key);
            self.awaiting_update_to_recover = false;
            self.start().await;
        }
    }

    fn apply_config(&mut self, config: InstanceConfig, updates: SharedUpdateProvider) {
        if config.key != self.key {
            warn!(
                "Ignoring configuration for '{}' sent to '{}'",
                config.key, self.key
            );
            return;
        }

        if config != self.config {
            info!(
                "Configuration of '{}' updated; takes effect on next start",
                self.key
            );
        }
        self.config = config;
        self.updates = updates;
    }

    async fn shutdown(&mut self) {
        self.stopped = true;
        if self.stop_reason.is_none() {
            self.stop_reason = Some(SHUTDOWN_STOP_REASON.to_string());
        }
        self.cancel_retry();
        abort(&mut self.stop_task);
        abort(&mut self.timeout_watch);

        if let Some(handle) = self.running.take() {
            info!("Stopping '{}' for shutdown", self.key);
            self.graceful_stop(SHUTDOWN_STOP_REASON.to_string())
                .run(&self.key, handle.clone())
                .await;

            match tokio::time::timeout(KILL_CONFIRM_TIMEOUT, handle.wait_for_exit()).await {
                Ok(status) => {
                    info!("'{}' exited: {status}", self.key);
                    self.metrics.process_exited(&status);
                    self.last_exit = Some(status);
                    if let Err(e) = self.deps.processes.forget_persisted_server(&self.key).await {
                        warn!("Failed to clear reattach data for '{}': {e}", self.key);
                    }
                }
                Err(_) => error!(
                    "'{}' ({}) did not exit after kill; leaving it behind",
                    self.key,
                    handle.describe()
                ),
            }
        }

        abort(&mut self.exit_watch);
        self.publish_status();
    }

    async fn apply_pending_update(&mut self) {
        self.update_pending_on_next_start = false;
        let dest = self.config.bin_dir();

        match self
            .updates
            .apply_update(self.current_version.as_ref(), &dest)
            .await
        {
            Ok(Some(version)) => {
                if let Err(e) = self.deps.store.save_version(&self.key, &version).await {
                    error!("Failed to persist version for '{}': {e}", self.key);
                }
                info!("Updated '{}' to version {}", self.key, version.version);
                self.metrics.update_applied();
                self.current_version = Some(version);
                self.consecutive_init_failures = 0;
            }
            Ok(None) => debug!("No newer build for '{}'", self.key),
            Err(e) => {
                error!(
                    "Update of '{}' failed; starting the installed version: {e}",
                    self.key
                );
                self.metrics.update_failed();
            }
        }
    }

    fn adopt(&mut self, handle: SharedProcessHandle) {
        self.arm_exit_watch(handle.clone());
        self.running = Some(handle);
        self.arm_timeout_watch();
    }

    fn arm_exit_watch(&mut self, handle: SharedProcessHandle) {
        abort(&mut self.exit_watch);
        let generation = self.start_generation;
        let commands = self.commands.clone();

        self.exit_watch = Some(tokio::spawn(async move {
            let status = handle.wait_for_exit().await;
            if let Some(commands) = commands.upgrade() {
                let _ = commands
                    .send(SupervisorCommand::ExitNotice { generation, status })
                    .await;
            }
        }));
    }

    fn arm_timeout_watch(&mut self) {
        abort(&mut self.timeout_watch);
        let generation = self.timeout_generation;
        let timeout = self.config.heartbeat_timeout();
        let commands = self.commands.clone();

        self.timeout_watch = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(commands) = commands.upgrade() {
                let _ = commands
                    .send(SupervisorCommand::TimeoutFired { generation })
                    .await;
            }
        }));
    }

    fn schedule_retry(&mut self) {
        self.spawn_attempts += 1;
        let backoff = &self.settings.spawn_backoff;

        let Some(delay) = backoff.delay(self.spawn_attempts) else {
            if backoff.max_attempts() > 0 {
                error!(
                    "Giving up on starting '{}' after {} retries",
                    self.key,
                    backoff.max_attempts()
                );
            }
            return;
        };

        warn!(
            "Retrying start of '{}' in {delay:?} ({}/{})",
            self.key,
            self.spawn_attempts,
            backoff.max_attempts()
        );

        abort(&mut self.retry_timer);
        let generation = self.start_generation;
        let commands = self.commands.clone();
        self.retry_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(commands) = commands.upgrade() {
                let _ = commands
                    .send(SupervisorCommand::RetryStart { generation })
                    .await;
            }
        }));
    }

    fn cancel_retry(&mut self) {
        abort(&mut self.retry_timer);
    }

    fn begin_graceful_stop(&mut self, handle: SharedProcessHandle, reason: String) {
        if self.stop_task.as_ref().is_some_and(|t| !t.is_finished()) {
            debug!("'{}' is already stopping", self.key);
            return;
        }

        let sequence = self.graceful_stop(reason);
        let key = self.key.clone();
        self.stop_task = Some(tokio::spawn(async move {
            sequence.run(&key, handle).await;
        }));
    }

    /// Same channel as a graceful stop, but without the kill fallback.
    fn request_update_stop(&self) {
        let sequence = self.graceful_stop(UPDATE_STOP_REASON.to_string());
        let key = self.key.clone();
        tokio::spawn(async move {
            sequence.deliver(&key).await;
        });
    }

    fn graceful_stop(&self, reason: String) -> GracefulStop {
        GracefulStop {
            requester: self.deps.stop_requester.clone(),
            endpoint: self.config.control_endpoint.clone(),
            token: self.token_tx.borrow().clone(),
            reason,
            request_timeout: self.settings.stop_request_timeout,
            grace: self.settings.stop_grace,
        }
    }

    async fn capture_dump(&self, handle: &SharedProcessHandle) {
        let dir = self.config.dumps_dir();
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            warn!("Cannot create dump directory {}: {e}", dir.display());
            return;
        }

        let path = dir.join(format!(
            "{}-{}-{}.core",
            self.key,
            self.start_generation,
            Utc::now().format("%Y%m%dT%H%M%S")
        ));

        match handle.dump_process(&path).await {
            Ok(()) => info!("Wrote dump of '{}' to {}", self.key, path.display()),
            Err(e) => warn!("Dump of '{}' failed: {e}", self.key),
        }
    }

    async fn prepare_directories(&self) {
        for dir in [self.config.config_dir(), self.config.data_dir()] {
            if let Err(e) = tokio::fs::create_dir_all(&dir).await {
                warn!("Cannot create {}: {e}", dir.display());
            }
        }
    }

    async fn notify(&self, kind: NotificationKind) {
        let notification = Notification::new(self.key.clone(), kind);
        self.deps.notifier.notify(&notification).await;
    }

    fn discard_stale(&self, kind: &str, generation: u64) {
        debug!(
            "Dropping stale {kind} for '{}' (generation {generation}, start {}, timeout {})",
            self.key, self.start_generation, self.timeout_generation
        );
        self.metrics.stale_notice_dropped(kind);
    }

    fn phase(&self) -> InstancePhase {
        let stopping = self.stop_task.as_ref().is_some_and(|t| !t.is_finished());
        match &self.running {
            Some(_) if stopping => InstancePhase::Stopping,
            Some(_) => InstancePhase::Running,
            None if self.awaiting_update_to_recover => InstancePhase::AwaitingUpdate,
            None if self.stopped => InstancePhase::Stopped,
            None => InstancePhase::Down,
        }
    }

    fn publish_status(&self) {
        let status = InstanceStatus {
            key: self.key.clone(),
            phase: self.phase(),
            process: self.running.as_ref().map(|h| h.describe()),
            version: self.current_version.as_ref().map(|v| v.version.clone()),
            start_generation: self.start_generation,
            timeout_generation: self.timeout_generation,
            consecutive_init_failures: self.consecutive_init_failures,
            awaiting_update: self.awaiting_update_to_recover,
            update_pending: self.update_pending_on_next_start,
            manually_stopped: self.stopped,
            stop_reason: self.stop_reason.clone(),
            last_heartbeat: self.last_heartbeat_at,
            last_exit: self.last_exit.clone(),
        };

        self.status_tx.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            *current = status;
            true
        });
    }

    fn abort_tasks(&mut self) {
        abort(&mut self.exit_watch);
        abort(&mut self.timeout_watch);
        abort(&mut self.retry_timer);
        abort(&mut self.stop_task);
    }
}

fn abort(task: &mut Option<JoinHandle<()>>) {
    if let Some(task) = task.take() {
        task.abort();
    }
}
