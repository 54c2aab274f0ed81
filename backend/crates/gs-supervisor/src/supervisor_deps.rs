use crate::graceful_stop::SharedStopRequester;
use crate::notify::SharedNotifier;
use crate::store::SharedInstanceStore;

use gs_process::ProcessManager;

use std::sync::Arc;

/// Collaborators shared by every instance supervisor.
#[derive(Clone)]
pub struct SupervisorDeps {
    pub processes: Arc<dyn ProcessManager>,
    pub store: SharedInstanceStore,
    pub notifier: SharedNotifier,
    pub stop_requester: SharedStopRequester,
}
