use crate::{CliClientResult, ClientError};

use reqwest::{Client as ReqwestClient, Method};
use serde::Serialize;
use serde_json::Value;

/// HTTP client for the gs-server control API
pub struct Client {
    pub base_url: String,
    pub token: Option<String>,
    client: ReqwestClient,
}

impl Client {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Server URL (e.g., "http://127.0.0.1:8700")
    /// * `token` - Optional operator JWT sent as a Bearer token
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
            client: ReqwestClient::new(),
        }
    }

    /// Build a request with the optional Authorization header
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);

        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        req
    }

    /// Execute request and handle errors
    async fn execute(&self, req: reqwest::RequestBuilder) -> CliClientResult<Value> {
        let response = req.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        if status.is_success() {
            return Ok(body);
        }

        let error = body.get("error");
        let code = error
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .map(String::from)
            .unwrap_or_else(|| format!("HTTP {}", status));

        Err(ClientError::api_error(status.as_u16(), code, message))
    }

    // =========================================================================
    // Instance Operations
    // =========================================================================

    /// List every supervised instance
    pub async fn list_instances(&self) -> CliClientResult<Value> {
        let req = self.request(Method::GET, "/api/v1/instances");
        self.execute(req).await
    }

    /// Get one instance by key
    pub async fn get_instance(&self, key: &str) -> CliClientResult<Value> {
        let req = self.request(Method::GET, &format!("/api/v1/instances/{}", key));
        self.execute(req).await
    }

    /// Restart an instance
    pub async fn restart_instance(&self, key: &str) -> CliClientResult<Value> {
        let req = self.request(Method::POST, &format!("/api/v1/instances/{}/restart", key));
        self.execute(req).await
    }

    /// Stop an instance, optionally with a reason
    pub async fn stop_instance(&self, key: &str, reason: Option<&str>) -> CliClientResult<Value> {
        #[derive(Serialize)]
        struct StopRequest<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            reason: Option<&'a str>,
        }

        let req = self
            .request(Method::POST, &format!("/api/v1/instances/{}/stop", key))
            .json(&StopRequest { reason });
        self.execute(req).await
    }

    /// Trigger an update check for an instance
    pub async fn check_for_update(&self, key: &str) -> CliClientResult<Value> {
        let req = self.request(
            Method::POST,
            &format!("/api/v1/instances/{}/update-check", key),
        );
        self.execute(req).await
    }
}
