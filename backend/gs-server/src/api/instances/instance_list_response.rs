use gs_supervisor::InstanceStatus;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct InstanceListResponse {
    pub instances: Vec<InstanceStatus>,
}
