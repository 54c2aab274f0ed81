pub mod claims;
pub mod error;
pub mod instance_token;
pub mod jwt_validator;

pub use claims::{Claims, OPERATOR_ROLE};
pub use error::{AuthError, Result};
pub use instance_token::InstanceToken;
pub use jwt_validator::JwtValidator;
