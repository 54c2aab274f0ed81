use crate::{
    AppState, check_instance_update, get_instance, health, heartbeat, list_instances,
    restart_instance, stop_instance,
};

use axum::{
    Router,
    routing::{get, post},
};

/// Build the control API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        // Operator API
        .route("/api/v1/instances", get(list_instances))
        .route("/api/v1/instances/{key}", get(get_instance))
        .route("/api/v1/instances/{key}/restart", post(restart_instance))
        .route("/api/v1/instances/{key}/stop", post(stop_instance))
        .route(
            "/api/v1/instances/{key}/update-check",
            post(check_instance_update),
        )
        // Supervised servers
        .route("/api/v1/instances/{key}/heartbeat", post(heartbeat))
        .with_state(state)
}
