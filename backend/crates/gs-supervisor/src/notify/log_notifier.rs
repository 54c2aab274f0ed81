use crate::notify::Notifier;

use gs_core::{Notification, NotificationKind};

use async_trait::async_trait;
use tracing::{error, info, warn};

/// Writes notifications to the tracing log.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) {
        let event = notification.event_name();
        match notification.kind {
            NotificationKind::Crashed { .. } => warn!(event, "{notification}"),
            NotificationKind::NeedsIntervention { .. } => error!(event, "{notification}"),
            NotificationKind::Stopped { .. } => info!(event, "{notification}"),
        }
    }
}
