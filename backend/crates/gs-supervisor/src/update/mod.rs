mod checksum;
pub(crate) mod install;
mod local_provider;
mod manifest_provider;
mod no_update_provider;
mod provider_factory;

pub use checksum::{sha256_hex, verify_checksum};
pub use install::{extract_zip, install_dir, is_zip};
pub use local_provider::{LOCAL_VERSION_FILE, LocalUpdateProvider};
pub use manifest_provider::{Manifest, ManifestUpdateProvider};
pub use no_update_provider::NoUpdateProvider;
pub use provider_factory::UpdateProviderFactory;

use crate::Result;

use gs_core::VersionDescriptor;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

/// Source of new server builds for one instance.
#[async_trait]
pub trait UpdateProvider: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Whether a build different from `current` is available.
    async fn check_for_update(&self, current: Option<&VersionDescriptor>) -> Result<bool>;

    /// Fetch and install the newest build into `dest`. `None` when there is
    /// nothing newer than `current`.
    async fn apply_update(
        &self,
        current: Option<&VersionDescriptor>,
        dest: &Path,
    ) -> Result<Option<VersionDescriptor>>;

    /// Extra `--key=value` launch arguments for `version`.
    fn launch_overrides(&self, version: Option<&VersionDescriptor>) -> Vec<(String, String)> {
        version
            .map(|v| {
                v.launch_overrides
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub type SharedUpdateProvider = Arc<dyn UpdateProvider>;
