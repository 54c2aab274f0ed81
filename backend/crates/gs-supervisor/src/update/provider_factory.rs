use crate::update::{
    LocalUpdateProvider, ManifestUpdateProvider, NoUpdateProvider, SharedUpdateProvider,
};
use crate::{Result, SupervisorError};

use gs_config::{UpdateConfig, UpdateProviderKind};
use gs_core::VersionDescriptor;

use std::sync::Arc;

/// Factory for the update provider configured for an instance
#[derive(Debug, Clone, Default)]
pub struct UpdateProviderFactory;

impl UpdateProviderFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn create(&self, config: &UpdateConfig) -> Result<SharedUpdateProvider> {
        match config.provider {
            UpdateProviderKind::None => Ok(Arc::new(NoUpdateProvider)),
            UpdateProviderKind::Manifest => {
                let url = config.manifest_url.as_deref().ok_or_else(|| {
                    SupervisorError::update("manifest provider requires a manifest URL")
                })?;
                let platform = config
                    .platform
                    .clone()
                    .unwrap_or_else(VersionDescriptor::host_platform);
                Ok(Arc::new(ManifestUpdateProvider::new(
                    url,
                    platform,
                    config.request_timeout(),
                )?))
            }
            UpdateProviderKind::Local => {
                let dir = config.local_dir.as_deref().ok_or_else(|| {
                    SupervisorError::update("local provider requires a staging directory")
                })?;
                Ok(Arc::new(LocalUpdateProvider::new(dir)))
            }
        }
    }
}
