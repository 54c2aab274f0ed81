use gs_auth::JwtValidator;
use gs_supervisor::SupervisorRegistry;

use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SupervisorRegistry>,
    /// `None` when operator authentication is disabled.
    pub jwt_validator: Option<Arc<JwtValidator>>,
}
