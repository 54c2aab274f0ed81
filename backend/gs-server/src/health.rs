use crate::AppState;

use gs_supervisor::InstancePhase;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /health - supervisor status with per-phase instance counts
pub async fn health_check(State(state): State<AppState>) -> Response {
    let instances = state.registry.list();
    let count = |phase: InstancePhase| instances.iter().filter(|s| s.phase == phase).count();

    let health = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "auth": if state.jwt_validator.is_some() { "enabled" } else { "disabled" },
        "instances": {
            "total": instances.len(),
            "running": count(InstancePhase::Running),
            "stopping": count(InstancePhase::Stopping),
            "stopped": count(InstancePhase::Stopped),
            "awaiting_update": count(InstancePhase::AwaitingUpdate),
            "down": count(InstancePhase::Down),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - liveness probe
pub async fn liveness_check() -> Response {
    (StatusCode::OK, "OK").into_response()
}
