mod child_handle;
mod exit_mapping;
mod manager;
mod pid_handle;
mod proc_exe;

pub use child_handle::ChildProcessHandle;
pub use exit_mapping::exit_status_from_os;
pub use manager::DirectProcessManager;
pub use pid_handle::ReattachedProcessHandle;
pub use proc_exe::executable_matches;
