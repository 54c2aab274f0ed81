//! Instance REST API handlers
//!
//! Status reads are open; restart, stop and update-check require an
//! [`Operator`] when authentication is enabled.

use crate::{
    ApiError, ApiResult, AppState, CommandAcceptedResponse, InstanceListResponse,
    InstanceResponse, Operator, StopInstanceRequest, UpdateCheckResponse,
};

use std::panic::Location;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use error_location::ErrorLocation;
use tracing::info;

const MAX_STOP_REASON_LENGTH: usize = 256;

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/v1/instances
pub async fn list_instances(State(state): State<AppState>) -> Json<InstanceListResponse> {
    Json(InstanceListResponse {
        instances: state.registry.list(),
    })
}

/// GET /api/v1/instances/{key}
pub async fn get_instance(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<InstanceResponse>> {
    let instance = state.registry.status(&key)?;
    Ok(Json(InstanceResponse { instance }))
}

/// POST /api/v1/instances/{key}/restart
///
/// Clears a manual stop and a crash-loop hold, then starts the server.
pub async fn restart_instance(
    State(state): State<AppState>,
    operator: Operator,
    Path(key): Path<String>,
) -> ApiResult<(StatusCode, Json<CommandAcceptedResponse>)> {
    info!("Operator '{}' restarts '{}'", operator.subject(), key);
    state.registry.restart(&key).await?;

    Ok(accepted(key, "restart"))
}

/// POST /api/v1/instances/{key}/stop
///
/// Gracefully stops the server and suppresses automatic restarts until the
/// next restart request.
pub async fn stop_instance(
    State(state): State<AppState>,
    operator: Operator,
    Path(key): Path<String>,
    Json(request): Json<StopInstanceRequest>,
) -> ApiResult<(StatusCode, Json<CommandAcceptedResponse>)> {
    let reason = request
        .reason
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty());

    if let Some(ref reason) = reason
        && reason.chars().count() > MAX_STOP_REASON_LENGTH
    {
        return Err(ApiError::BadRequest {
            message: format!(
                "reason must be at most {} characters",
                MAX_STOP_REASON_LENGTH
            ),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    info!(
        "Operator '{}' stops '{}' ({})",
        operator.subject(),
        key,
        reason.as_deref().unwrap_or("no reason given")
    );
    state.registry.stop(&key, reason).await?;

    Ok(accepted(key, "stop"))
}

/// POST /api/v1/instances/{key}/update-check
pub async fn check_instance_update(
    State(state): State<AppState>,
    operator: Operator,
    Path(key): Path<String>,
) -> ApiResult<Json<UpdateCheckResponse>> {
    info!(
        "Operator '{}' requests update check for '{}'",
        operator.subject(),
        key
    );
    let update_available = state.registry.request_update_check(&key).await?;

    Ok(Json(UpdateCheckResponse {
        instance: key,
        update_available,
    }))
}

fn accepted(
    instance: String,
    command: &'static str,
) -> (StatusCode, Json<CommandAcceptedResponse>) {
    (
        StatusCode::ACCEPTED,
        Json(CommandAcceptedResponse { instance, command }),
    )
}
