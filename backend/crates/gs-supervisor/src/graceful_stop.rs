use crate::{Result, SupervisorError};

use gs_auth::InstanceToken;
use gs_core::InstanceKey;
use gs_process::SharedProcessHandle;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Header carrying the instance secret on requests sent to the server.
pub const INSTANCE_TOKEN_HEADER: &str = "X-Instance-Token";

/// Asks a running server to shut itself down.
#[async_trait]
pub trait StopRequester: Send + Sync {
    /// `Ok` once the server acknowledged the request.
    async fn request_stop(
        &self,
        endpoint: &str,
        token: Option<&InstanceToken>,
        reason: &str,
    ) -> Result<()>;
}

pub type SharedStopRequester = Arc<dyn StopRequester>;

#[derive(Debug, Serialize)]
struct StopRequestBody<'a> {
    reason: &'a str,
}

/// Sends the stop request as an HTTP POST to the server's local endpoint.
#[derive(Debug, Clone)]
pub struct HttpStopRequester {
    client: reqwest::Client,
}

impl HttpStopRequester {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl StopRequester for HttpStopRequester {
    async fn request_stop(
        &self,
        endpoint: &str,
        token: Option<&InstanceToken>,
        reason: &str,
    ) -> Result<()> {
        let mut request = self.client.post(endpoint).json(&StopRequestBody { reason });
        if let Some(token) = token {
            request = request.header(INSTANCE_TOKEN_HEADER, token.expose());
        }

        let response = request
            .send()
            .await
            .map_err(|e| SupervisorError::stop_request(endpoint, e.to_string()))?;

        if !response.status().is_success() {
            return Err(SupervisorError::stop_request(
                endpoint,
                format!("server answered {}", response.status()),
            ));
        }

        Ok(())
    }
}

/// One run of the graceful-stop sequence: ask the server to stop, give it a
/// grace window to exit, force kill otherwise.
pub struct GracefulStop {
    pub requester: SharedStopRequester,
    pub endpoint: Option<String>,
    pub token: Option<InstanceToken>,
    pub reason: String,
    pub request_timeout: Duration,
    pub grace: Duration,
}

impl GracefulStop {
    /// Returns once the process exited or a kill was issued. The exit itself
    /// is reported through the handle's exit watch.
    pub async fn run(self, key: &InstanceKey, handle: SharedProcessHandle) {
        if self.deliver(key).await {
            if timeout(self.grace, handle.wait_for_exit()).await.is_ok() {
                return;
            }
            warn!(
                "'{key}' did not exit within {:?} of the stop request; killing {}",
                self.grace,
                handle.describe()
            );
        }

        if let Err(e) = handle.kill().await {
            error!("Failed to kill '{key}' ({}): {e}", handle.describe());
        }
    }

    /// Send the stop request once. `false` when it could not be delivered.
    pub async fn deliver(&self, key: &InstanceKey) -> bool {
        let Some(endpoint) = &self.endpoint else {
            info!("'{key}' has no control endpoint; stopping by force");
            return false;
        };

        let request = self
            .requester
            .request_stop(endpoint, self.token.as_ref(), &self.reason);

        match timeout(self.request_timeout, request).await {
            Ok(Ok(())) => {
                info!("'{key}' acknowledged stop request ({})", self.reason);
                true
            }
            Ok(Err(e)) => {
                warn!("Stop request for '{key}' failed: {e}");
                false
            }
            Err(_) => {
                warn!(
                    "Stop request for '{key}' timed out after {:?}",
                    self.request_timeout
                );
                false
            }
        }
    }
}
