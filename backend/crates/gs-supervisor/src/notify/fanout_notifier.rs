use crate::notify::{Notifier, SharedNotifier};

use gs_core::Notification;

use async_trait::async_trait;
use futures::future::join_all;

/// Delivers every notification to each inner notifier concurrently.
#[derive(Default, Clone)]
pub struct FanoutNotifier {
    targets: Vec<SharedNotifier>,
}

impl FanoutNotifier {
    pub fn new(targets: Vec<SharedNotifier>) -> Self {
        Self { targets }
    }

    pub fn with(mut self, target: SharedNotifier) -> Self {
        self.targets.push(target);
        self
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[async_trait]
impl Notifier for FanoutNotifier {
    async fn notify(&self, notification: &Notification) {
        join_all(self.targets.iter().map(|t| t.notify(notification))).await;
    }
}
