//! REST API error types
//!
//! Every failure leaves the control API as a JSON body
//! `{"error": {"code", "message"}}` with a matching HTTP status.

use gs_auth::AuthError;
use gs_supervisor::SupervisorError;

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g., "NOT_FOUND", "UNAUTHORIZED")
    pub code: String,
    pub message: String,
}

/// API errors with associated HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown instance (404)
    #[error("Resource not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// Missing or invalid credentials (401)
    #[error("Unauthorized ({code}): {message} {location}")]
    Unauthorized {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// Authenticated but not allowed (403)
    #[error("Forbidden: {message} {location}")]
    Forbidden {
        message: String,
        location: ErrorLocation,
    },

    /// Malformed request (400)
    #[error("Bad request: {message} {location}")]
    BadRequest {
        message: String,
        location: ErrorLocation,
    },

    /// The instance supervisor is not accepting commands (503)
    #[error("Unavailable: {message} {location}")]
    Unavailable {
        message: String,
        location: ErrorLocation,
    },

    /// Internal server error (500)
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthorized { code, .. } => *code,
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::Unavailable { .. } => "UNAVAILABLE",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        let code = self.code().to_string();
        let message = match self {
            ApiError::NotFound { message, .. }
            | ApiError::Unauthorized { message, .. }
            | ApiError::Forbidden { message, .. }
            | ApiError::BadRequest { message, .. }
            | ApiError::Unavailable { message, .. }
            | ApiError::Internal { message, .. } => message,
        };

        (
            status,
            Json(ApiErrorResponse {
                error: ApiErrorBody { code, message },
            }),
        )
            .into_response()
    }
}

/// Convert supervisor errors to API errors
impl From<SupervisorError> for ApiError {
    #[track_caller]
    fn from(e: SupervisorError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match e {
            SupervisorError::UnknownInstance { key, .. } => ApiError::NotFound {
                message: format!("Instance '{}' not found", key),
                location,
            },
            SupervisorError::InvalidToken { .. } => ApiError::Unauthorized {
                code: "INVALID_INSTANCE_TOKEN",
                message: "Instance token rejected".to_string(),
                location,
            },
            SupervisorError::Unavailable { key, .. } => ApiError::Unavailable {
                message: format!("Instance '{}' is not accepting commands", key),
                location,
            },
            other => {
                // Internal details stay in the server log
                tracing::error!("Supervisor error: {}", other);
                ApiError::Internal {
                    message: "Supervisor operation failed".to_string(),
                    location,
                }
            }
        }
    }
}

/// Convert operator authentication errors to API errors
impl From<AuthError> for ApiError {
    #[track_caller]
    fn from(e: AuthError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        if e.is_forbidden() {
            return ApiError::Forbidden {
                message: "Operator role required".to_string(),
                location,
            };
        }

        ApiError::Unauthorized {
            code: e.error_code(),
            message: match e {
                AuthError::MissingHeader { .. } => "Missing Authorization header".to_string(),
                AuthError::InvalidScheme { .. } => "Expected a Bearer token".to_string(),
                AuthError::TokenExpired { .. } => "Token expired".to_string(),
                _ => "Invalid token".to_string(),
            },
            location,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
