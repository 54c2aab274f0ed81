//! Secret presented by a supervised server on heartbeat

use crate::ApiError;

use gs_supervisor::INSTANCE_TOKEN_HEADER;

use std::future::Future;
use std::panic::Location;

use axum::{extract::FromRequestParts, http::request::Parts};
use error_location::ErrorLocation;

/// Value of the `X-Instance-Token` header. Whether it matches the
/// instance's current secret is decided by the registry.
pub struct InstanceTokenHeader(pub String);

impl<S> FromRequestParts<S> for InstanceTokenHeader
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let token = parts
                .headers
                .get(INSTANCE_TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ApiError::Unauthorized {
                    code: "MISSING_INSTANCE_TOKEN",
                    message: format!("Missing {} header", INSTANCE_TOKEN_HEADER),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            Ok(InstanceTokenHeader(token.to_string()))
        }
    }
}
