use serde::Deserialize;

/// Body of `POST /api/v1/instances/{key}/stop`
#[derive(Debug, Default, Deserialize)]
pub struct StopInstanceRequest {
    /// Forwarded to the server's control endpoint and shown in status.
    #[serde(default)]
    pub reason: Option<String>,
}
