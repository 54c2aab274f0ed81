use crate::{InstanceKey, ReattachData, VersionDescriptor};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable per-instance row that survives supervisor restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub key: InstanceKey,
    pub current_version: Option<VersionDescriptor>,
    pub secret_token: Option<String>,
    pub reattach: Option<ReattachData>,
    pub updated_at: DateTime<Utc>,
}

impl InstanceRecord {
    pub fn empty(key: InstanceKey) -> Self {
        Self {
            key,
            current_version: None,
            secret_token: None,
            reattach: None,
            updated_at: Utc::now(),
        }
    }

    pub fn version_id(&self) -> Option<&str> {
        self.current_version.as_ref().map(|v| v.version.as_str())
    }
}
