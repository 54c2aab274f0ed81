//! Process control for supervised game servers.
//!
//! Two backends implement [`ProcessManager`]: [`DirectProcessManager`] runs
//! the server as a child in its own process group, [`SystemdProcessManager`]
//! runs it as a transient systemd service unit. Both can record reattach
//! data so a restarted supervisor can adopt a server that is still running.

pub mod direct;
pub mod dump;
pub mod error;
pub mod exit_watch;
pub mod process_manager;
pub mod process_manager_factory;
pub mod systemd;


pub use direct::DirectProcessManager;
pub use error::{ProcessError, Result};
pub use exit_watch::{ExitPublisher, ExitWatch};
pub use process_manager::{ProcessHandle, ProcessManager, SharedProcessHandle};
pub use process_manager_factory::ProcessManagerFactory;
pub use systemd::SystemdProcessManager;
