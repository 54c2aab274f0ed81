//! Operator authentication for instance control endpoints

use crate::{ApiError, AppState};

use gs_auth::Claims;

use std::future::Future;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// An authenticated operator.
///
/// Holds the validated claims when authentication is enabled and `None`
/// when the server runs without a JWT validator. Rejects requests with a
/// missing, malformed or expired Bearer token, or whose claims lack the
/// operator role.
pub struct Operator(pub Option<Claims>);

impl Operator {
    pub fn subject(&self) -> &str {
        self.0.as_ref().map_or("anonymous", |claims| claims.sub.as_str())
    }
}

impl FromRequestParts<AppState> for Operator {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let Some(validator) = state.jwt_validator.as_ref() else {
                return Ok(Operator(None));
            };

            let header = parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok());

            let claims = validator.validate_header(header)?;
            claims.require_operator()?;

            tracing::debug!("Operator '{}' authenticated", claims.sub);
            Ok(Operator(Some(claims)))
        }
    }
}
