mod fanout_notifier;
mod log_notifier;
mod webhook_notifier;

pub use fanout_notifier::FanoutNotifier;
pub use log_notifier::LogNotifier;
pub use webhook_notifier::WebhookNotifier;

use gs_core::Notification;

use std::sync::Arc;

use async_trait::async_trait;

/// Delivers operator-facing events. Delivery failures are logged by the
/// implementation and never reach the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification);
}

pub type SharedNotifier = Arc<dyn Notifier>;
