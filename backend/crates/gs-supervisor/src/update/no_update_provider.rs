use crate::Result;
use crate::update::UpdateProvider;

use gs_core::VersionDescriptor;

use std::path::Path;

use async_trait::async_trait;

/// Provider for instances whose builds are managed outside the supervisor.
#[derive(Debug, Default, Clone)]
pub struct NoUpdateProvider;

#[async_trait]
impl UpdateProvider for NoUpdateProvider {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn check_for_update(&self, _current: Option<&VersionDescriptor>) -> Result<bool> {
        Ok(false)
    }

    async fn apply_update(
        &self,
        _current: Option<&VersionDescriptor>,
        _dest: &Path,
    ) -> Result<Option<VersionDescriptor>> {
        Ok(None)
    }
}
