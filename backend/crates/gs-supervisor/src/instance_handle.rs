use crate::command::SupervisorCommand;
use crate::status::InstanceStatus;
use crate::update::SharedUpdateProvider;
use crate::{Result, SupervisorError};

use gs_auth::InstanceToken;
use gs_config::InstanceConfig;
use gs_core::{ErrorLocation, InstanceKey};

use std::panic::Location;

use tokio::sync::{mpsc, oneshot, watch};

/// Cloneable producer side of one instance supervisor.
#[derive(Debug, Clone)]
pub struct InstanceHandle {
    key: InstanceKey,
    commands: mpsc::Sender<SupervisorCommand>,
    status: watch::Receiver<InstanceStatus>,
    token: watch::Receiver<Option<InstanceToken>>,
}

impl InstanceHandle {
    pub(crate) fn new(
        key: InstanceKey,
        commands: mpsc::Sender<SupervisorCommand>,
        status: watch::Receiver<InstanceStatus>,
        token: watch::Receiver<Option<InstanceToken>>,
    ) -> Self {
        Self {
            key,
            commands,
            status,
            token,
        }
    }

    pub fn key(&self) -> &InstanceKey {
        &self.key
    }

    /// Latest published status.
    pub fn status(&self) -> InstanceStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<InstanceStatus> {
        self.status.clone()
    }

    /// Whether `presented` is the secret handed to the current process.
    pub fn verify_token(&self, presented: &str) -> bool {
        self.token
            .borrow()
            .as_ref()
            .is_some_and(|token| token.verify(presented))
    }

    /// Enqueue a command, waiting while the queue is full.
    pub(crate) async fn send(&self, command: SupervisorCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SupervisorError::Unavailable {
                key: self.key.clone(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    pub async fn start(&self) -> Result<()> {
        self.send(SupervisorCommand::Start).await
    }

    pub async fn restart(&self) -> Result<()> {
        self.send(SupervisorCommand::Restart).await
    }

    pub async fn stop(&self, reason: Option<String>) -> Result<()> {
        self.send(SupervisorCommand::Stop { reason }).await
    }

    /// Record a heartbeat. The caller has already checked the token.
    pub async fn heartbeat(&self) -> Result<()> {
        self.send(SupervisorCommand::Heartbeat).await
    }

    /// Schedule an update check without waiting for its result.
    pub async fn check_for_update(&self) -> Result<()> {
        self.send(SupervisorCommand::CheckForUpdate { reply: None })
            .await
    }

    /// Run an update check and return its outcome; `None` when the provider
    /// could not be reached.
    pub async fn check_for_update_now(&self) -> Result<Option<bool>> {
        let (reply, outcome) = oneshot::channel();
        self.send(SupervisorCommand::CheckForUpdate { reply: Some(reply) })
            .await?;
        Ok(outcome.await.unwrap_or(None))
    }

    pub async fn update_config(
        &self,
        config: InstanceConfig,
        updates: SharedUpdateProvider,
    ) -> Result<()> {
        self.send(SupervisorCommand::UpdateConfig {
            config: Box::new(config),
            updates,
        })
        .await
    }

    /// Gracefully stop the process and wait for the supervisor to finish.
    pub async fn shutdown(&self) -> Result<()> {
        let (done, finished) = oneshot::channel();
        self.send(SupervisorCommand::Shutdown { done }).await?;
        let _ = finished.await;
        Ok(())
    }
}
