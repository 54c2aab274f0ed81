use crate::{CoreError, CoreResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Backend-specific data needed to find a running server again after the
/// supervisor restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReattachData {
    Pid(u32),
    Unit(String),
}

impl ReattachData {
    /// Build from the two nullable store columns. Both set is a corrupt row.
    #[track_caller]
    pub fn from_columns(pid: Option<i64>, unit: Option<String>) -> CoreResult<Option<Self>> {
        match (pid, unit) {
            (None, None) => Ok(None),
            (Some(pid), None) => {
                let pid = u32::try_from(pid).map_err(|_| CoreError::InvalidReattachData {
                    message: format!("pid {pid} out of range"),
                    location: ErrorLocation::from(Location::caller()),
                })?;
                Ok(Some(Self::Pid(pid)))
            }
            (None, Some(unit)) => Ok(Some(Self::Unit(unit))),
            (Some(pid), Some(unit)) => Err(CoreError::InvalidReattachData {
                message: format!("both pid {pid} and unit '{unit}' are set"),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    pub fn pid(&self) -> Option<u32> {
        match self {
            Self::Pid(pid) => Some(*pid),
            Self::Unit(_) => None,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            Self::Pid(_) => None,
            Self::Unit(unit) => Some(unit),
        }
    }
}
