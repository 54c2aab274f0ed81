use crate::notify::Notifier;
use crate::Result;

use gs_core::Notification;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    instance: &'a str,
    event: &'a str,
    message: String,
    at: DateTime<Utc>,
}

/// POSTs each notification as JSON to a fixed URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn deliver(&self, notification: &Notification) -> Result<()> {
        let payload = WebhookPayload {
            instance: notification.instance.as_str(),
            event: notification.event_name(),
            message: notification.message(),
            at: notification.at,
        };

        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) {
        match self.deliver(notification).await {
            Ok(()) => debug!("Delivered {} webhook", notification.event_name()),
            Err(e) => warn!("Webhook delivery to {} failed: {e}", self.url),
        }
    }
}
