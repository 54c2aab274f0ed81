use gs_core::{ErrorLocation, InstanceKey};

use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Unknown instance '{key}' {location}")]
    UnknownInstance {
        key: String,
        location: ErrorLocation,
    },

    #[error("Invalid instance token for '{key}' {location}")]
    InvalidToken {
        key: InstanceKey,
        location: ErrorLocation,
    },

    #[error("Supervisor for '{key}' is not running {location}")]
    Unavailable {
        key: InstanceKey,
        location: ErrorLocation,
    },

    #[error("Update error: {message} {location}")]
    Update {
        message: String,
        location: ErrorLocation,
    },

    #[error("Checksum mismatch for {url}: expected {expected}, got {actual} {location}")]
    Checksum {
        url: String,
        expected: String,
        actual: String,
        location: ErrorLocation,
    },

    #[error("Stop request to {endpoint} failed: {message} {location}")]
    StopRequest {
        endpoint: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP error: {source} {location}")]
    Http {
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },

    #[error("Archive error: {source} {location}")]
    Archive {
        #[source]
        source: zip::result::ZipError,
        location: ErrorLocation,
    },

    #[error("IO error at {path}: {source} {location}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Store error: {source} {location}")]
    Store {
        #[source]
        source: gs_db::DbError,
        location: ErrorLocation,
    },

    #[error("Process error: {source} {location}")]
    Process {
        #[source]
        source: gs_process::ProcessError,
        location: ErrorLocation,
    },

    #[error("JSON error: {source} {location}")]
    Json {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl SupervisorError {
    #[track_caller]
    pub fn unknown_instance(key: impl Into<String>) -> Self {
        Self::UnknownInstance {
            key: key.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_token(key: InstanceKey) -> Self {
        Self::InvalidToken {
            key,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn update(message: impl Into<String>) -> Self {
        Self::Update {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn stop_request(endpoint: &str, message: impl Into<String>) -> Self {
        Self::StopRequest {
            endpoint: endpoint.to_string(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for SupervisorError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        Self::Http {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<zip::result::ZipError> for SupervisorError {
    #[track_caller]
    fn from(source: zip::result::ZipError) -> Self {
        Self::Archive {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<gs_db::DbError> for SupervisorError {
    #[track_caller]
    fn from(source: gs_db::DbError) -> Self {
        Self::Store {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<gs_process::ProcessError> for SupervisorError {
    #[track_caller]
    fn from(source: gs_process::ProcessError) -> Self {
        Self::Process {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for SupervisorError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
