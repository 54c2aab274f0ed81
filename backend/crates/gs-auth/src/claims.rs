use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Role required for restart, stop and update-check.
pub const OPERATOR_ROLE: &str = "operator";

/// Operator JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (operator id)
    pub sub: String,
    /// Expiration timestamp (Unix)
    pub exp: i64,
    /// Issued at timestamp (Unix)
    pub iat: i64,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    /// Validate claims after JWT signature verification
    #[track_caller]
    pub fn validate(&self) -> AuthErrorResult<()> {
        if self.sub.is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "sub".to_string(),
                message: "sub cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    #[track_caller]
    pub fn require_operator(&self) -> AuthErrorResult<()> {
        if self.has_role(OPERATOR_ROLE) {
            return Ok(());
        }

        Err(AuthError::Forbidden {
            message: format!("'{}' lacks the '{}' role", self.sub, OPERATOR_ROLE),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
