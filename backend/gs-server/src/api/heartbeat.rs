//! Heartbeats from supervised servers

use crate::{ApiResult, AppState, InstanceTokenHeader};

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

/// POST /api/v1/instances/{key}/heartbeat
///
/// Re-arms the instance's heartbeat timeout. Rejected with 401 unless the
/// `X-Instance-Token` header carries the instance's current secret.
pub async fn heartbeat(
    State(state): State<AppState>,
    Path(key): Path<String>,
    InstanceTokenHeader(token): InstanceTokenHeader,
) -> ApiResult<StatusCode> {
    state.registry.heartbeat(&key, &token).await?;
    Ok(StatusCode::NO_CONTENT)
}
