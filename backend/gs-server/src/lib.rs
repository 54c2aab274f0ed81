pub mod api;
pub mod app_state;
pub mod bootstrap;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod signals;

#[cfg(test)]
mod tests;

pub use api::{
    error::ApiError,
    error::Result as ApiResult,
    extractors::{instance_token::InstanceTokenHeader, operator::Operator},
    heartbeat::heartbeat,
    instances::{
        command_accepted_response::CommandAcceptedResponse,
        instance_list_response::InstanceListResponse,
        instance_response::InstanceResponse,
        instances::{
            check_instance_update, get_instance, list_instances, restart_instance, stop_instance,
        },
        stop_instance_request::StopInstanceRequest,
        update_check_response::UpdateCheckResponse,
    },
};
pub use app_state::AppState;
pub use error::{Result as ServerResult, ServerError};
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;

pub use crate::routes::build_router;
