use crate::{CoreError, CoreResult, MAX_INSTANCE_KEY_LENGTH};

use std::borrow::Borrow;
use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Deserializer, Serialize};

/// Stable identifier of a supervised instance.
///
/// Used as the storage key, in API routes and in process-manager calls
/// (pid files, systemd unit names), so it is restricted to
/// `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InstanceKey(String);

impl InstanceKey {
    #[track_caller]
    pub fn new(value: impl Into<String>) -> CoreResult<Self> {
        let value = value.into();

        if value.is_empty() {
            return Err(CoreError::InvalidInstanceKey {
                value,
                message: "key cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if value.len() > MAX_INSTANCE_KEY_LENGTH {
            return Err(CoreError::InvalidInstanceKey {
                value,
                message: format!("key exceeds {MAX_INSTANCE_KEY_LENGTH} characters"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CoreError::InvalidInstanceKey {
                value,
                message: "only ASCII letters, digits, '-' and '_' are allowed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for InstanceKey {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for InstanceKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        InstanceKey::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InstanceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for InstanceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}
