use gs_supervisor::InstanceStatus;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct InstanceResponse {
    pub instance: InstanceStatus,
}
