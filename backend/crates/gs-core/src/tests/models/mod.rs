mod exit_status;
mod instance_key;
mod launch_spec;
mod notification;
mod reattach_data;
mod version_descriptor;
