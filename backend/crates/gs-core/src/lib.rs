pub mod error;
pub mod models;

#[cfg(test)]
mod tests;

pub use error::{CoreError, Result as CoreResult};
pub use models::exit_status::ExitStatus;
pub use models::instance_key::InstanceKey;
pub use models::instance_record::InstanceRecord;
pub use models::launch_spec::LaunchSpec;
pub use models::notification::{Notification, NotificationKind};
pub use models::reattach_data::ReattachData;
pub use models::version_descriptor::{PlatformArtifact, VersionDescriptor};

pub use error_location::ErrorLocation;

/// Maximum length of an instance key.
pub const MAX_INSTANCE_KEY_LENGTH: usize = 64;
