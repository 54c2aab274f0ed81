mod manager;
mod systemctl;
mod unit_handle;
mod unit_state;

pub use manager::SystemdProcessManager;
pub use systemctl::{Systemctl, systemd_run_args};
pub use unit_handle::SystemdUnitHandle;
pub use unit_state::{UnitProperties, UnitState};
