use crate::backoff::SpawnBackoff;

use gs_config::Config;

use std::time::Duration;

/// Supervisor-wide knobs shared by every instance.
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    pub queue_capacity: usize,
    pub max_init_failures: u32,
    pub stop_request_timeout: Duration,
    pub stop_grace: Duration,
    pub shutdown_timeout: Duration,
    pub spawn_backoff: SpawnBackoff,
    /// Base URL instances use to reach the control API.
    pub public_url: String,
}

impl SupervisorSettings {
    pub fn from_config(config: &Config) -> Self {
        let supervisor = &config.supervisor;
        Self {
            queue_capacity: supervisor.queue_capacity,
            max_init_failures: supervisor.max_init_failures,
            stop_request_timeout: supervisor.stop_request_timeout(),
            stop_grace: supervisor.stop_grace(),
            shutdown_timeout: supervisor.shutdown_timeout(),
            spawn_backoff: SpawnBackoff::new(&supervisor.spawn_retry),
            public_url: config.server.public_url(),
        }
    }
}
