pub mod exit_status;
pub mod instance_key;
pub mod instance_record;
pub mod launch_spec;
pub mod notification;
pub mod reattach_data;
pub mod version_descriptor;
