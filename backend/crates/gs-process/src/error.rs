use gs_core::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to spawn {program}: {source} {location}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Failed to signal process {pid}: {message} {location}")]
    Signal {
        pid: u32,
        message: String,
        location: ErrorLocation,
    },

    #[error("`{command}` failed: {message} {location}")]
    Command {
        command: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Unit {unit} is in unexpected state '{state}' {location}")]
    UnexpectedUnitState {
        unit: String,
        state: String,
        location: ErrorLocation,
    },

    #[error("Process dump failed: {message} {location}")]
    Dump {
        message: String,
        location: ErrorLocation,
    },

    #[error("Persisting reattach data failed: {source} {location}")]
    Persist {
        #[source]
        source: gs_db::DbError,
        location: ErrorLocation,
    },

    #[error("IO error: {source} {location}")]
    Io {
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl ProcessError {
    #[track_caller]
    pub(crate) fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn dump(message: impl Into<String>) -> Self {
        Self::Dump {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for ProcessError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<gs_db::DbError> for ProcessError {
    #[track_caller]
    fn from(source: gs_db::DbError) -> Self {
        Self::Persist {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessError>;
