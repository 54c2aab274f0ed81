use crate::Result;

use gs_core::{InstanceKey, InstanceRecord, VersionDescriptor};
use gs_db::InstanceRecordRepository;

use std::sync::Arc;

use async_trait::async_trait;

/// The slice of the persisted record an instance supervisor reads and writes.
#[async_trait]
pub trait InstanceStore: Send + Sync {
    /// Load the record, creating an empty one on first use.
    async fn load(&self, key: &InstanceKey) -> Result<InstanceRecord>;

    async fn save_secret(&self, key: &InstanceKey, secret: &str) -> Result<()>;

    async fn save_version(&self, key: &InstanceKey, version: &VersionDescriptor) -> Result<()>;
}

pub type SharedInstanceStore = Arc<dyn InstanceStore>;

#[async_trait]
impl InstanceStore for InstanceRecordRepository {
    async fn load(&self, key: &InstanceKey) -> Result<InstanceRecord> {
        Ok(self.ensure(key).await?)
    }

    async fn save_secret(&self, key: &InstanceKey, secret: &str) -> Result<()> {
        Ok(self.set_secret(key, secret).await?)
    }

    async fn save_version(&self, key: &InstanceKey, version: &VersionDescriptor) -> Result<()> {
        Ok(self.set_version(key, version).await?)
    }
}
