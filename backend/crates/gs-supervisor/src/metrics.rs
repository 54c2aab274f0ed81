use gs_core::ExitStatus;

use metrics::{counter, gauge};

/// Metrics collector for instance supervision
#[derive(Clone)]
pub struct SupervisorMetrics {
    prefix: &'static str,
}

impl SupervisorMetrics {
    pub fn new() -> Self {
        Self {
            prefix: "gs_supervisor",
        }
    }

    /// Record a successful spawn
    pub fn process_started(&self) {
        counter!(format!("{}.starts", self.prefix)).increment(1);
        gauge!(format!("{}.running", self.prefix)).increment(1.0);
    }

    /// Record a reattached process
    pub fn process_reattached(&self) {
        counter!(format!("{}.reattached", self.prefix)).increment(1);
        gauge!(format!("{}.running", self.prefix)).increment(1.0);
    }

    pub fn spawn_failed(&self) {
        counter!(format!("{}.spawn_failures", self.prefix)).increment(1);
    }

    /// Record an observed exit, split by outcome
    pub fn process_exited(&self, status: &ExitStatus) {
        counter!(format!("{}.exits", self.prefix)).increment(1);
        counter!(format!("{}.exits.{}", self.prefix, status.kind())).increment(1);
        gauge!(format!("{}.running", self.prefix)).decrement(1.0);
        if !status.is_clean() {
            counter!(format!("{}.crashes", self.prefix)).increment(1);
        }
    }

    pub fn heartbeat_timeout(&self) {
        counter!(format!("{}.timeouts", self.prefix)).increment(1);
    }

    pub fn heartbeat_received(&self) {
        counter!(format!("{}.heartbeats", self.prefix)).increment(1);
    }

    pub fn update_applied(&self) {
        counter!(format!("{}.updates", self.prefix)).increment(1);
    }

    pub fn update_failed(&self) {
        counter!(format!("{}.update_failures", self.prefix)).increment(1);
    }

    /// Record a notification dropped by generation fencing
    pub fn stale_notice_dropped(&self, kind: &str) {
        counter!(format!("{}.stale_dropped", self.prefix)).increment(1);
        counter!(format!("{}.stale_dropped.{}", self.prefix, kind)).increment(1);
    }

    pub fn needs_intervention(&self) {
        counter!(format!("{}.needs_intervention", self.prefix)).increment(1);
    }
}

impl Default for SupervisorMetrics {
    fn default() -> Self {
        Self::new()
    }
}
