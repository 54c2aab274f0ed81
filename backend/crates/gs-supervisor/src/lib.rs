//! Supervision engine for game-server instances.
//!
//! [`SupervisorRegistry`] owns one [`InstanceSupervisor`] actor per configured
//! instance and routes heartbeats and operator requests to it. Update
//! strategies live in [`update`], notification sinks in [`notify`].

pub mod backoff;
pub mod command;
pub mod error;
pub mod graceful_stop;
pub mod instance_handle;
pub mod instance_supervisor;
pub mod launch;
pub mod metrics;
pub mod notify;
pub mod registry;
pub mod status;
pub mod store;
pub mod supervisor_deps;
pub mod supervisor_settings;
pub mod update;

#[cfg(test)]
mod tests;

pub use backoff::SpawnBackoff;
pub use command::SupervisorCommand;
pub use error::{Result, SupervisorError};
pub use graceful_stop::{
    GracefulStop, HttpStopRequester, INSTANCE_TOKEN_HEADER, SharedStopRequester, StopRequester,
};
pub use instance_handle::InstanceHandle;
pub use instance_supervisor::InstanceSupervisor;
pub use metrics::SupervisorMetrics;
pub use notify::{FanoutNotifier, LogNotifier, Notifier, SharedNotifier, WebhookNotifier};
pub use registry::{ConfigReload, InstanceSetup, SupervisorRegistry};
pub use status::{InstancePhase, InstanceStatus};
pub use store::{InstanceStore, SharedInstanceStore};
pub use supervisor_deps::SupervisorDeps;
pub use supervisor_settings::SupervisorSettings;
pub use update::{SharedUpdateProvider, UpdateProvider, UpdateProviderFactory};
