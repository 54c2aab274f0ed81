use gs_core::ExitStatus;

use tokio::sync::watch;

/// Single-assignment exit status shared between a handle and the task that
/// observes the process.
#[derive(Debug, Clone)]
pub struct ExitWatch {
    rx: watch::Receiver<Option<ExitStatus>>,
}

/// Publishing side of an [`ExitWatch`].
#[derive(Debug)]
pub struct ExitPublisher {
    tx: watch::Sender<Option<ExitStatus>>,
}

impl ExitWatch {
    pub fn channel() -> (Self, ExitPublisher) {
        let (tx, rx) = watch::channel(None);
        (Self { rx }, ExitPublisher { tx })
    }

    pub fn current(&self) -> Option<ExitStatus> {
        self.rx.borrow().clone()
    }

    pub async fn wait(&self) -> ExitStatus {
        let mut rx = self.rx.clone();
        match rx.wait_for(Option::is_some).await {
            Ok(status) => status
                .clone()
                .unwrap_or_else(|| ExitStatus::Unknown("exit status missing".to_string())),
            Err(_) => ExitStatus::Unknown("exit observer stopped".to_string()),
        }
    }
}

impl ExitPublisher {
    /// First status wins; later calls are ignored.
    pub fn publish(&self, status: ExitStatus) {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(status);
            true
        });
    }

    /// True once every [`ExitWatch`] has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}
