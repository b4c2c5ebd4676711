//! Error types for session persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing the persisted session record.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read session file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse session file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write session file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove session file {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize session: {0}")]
    Serialize(#[source] serde_json::Error),

    /// No data directory could be determined for the default session path.
    #[error("could not determine a data directory for the session file")]
    NoDataDir,
}

impl SessionError {
    /// Returns true if the file exists but its contents are unusable.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// A specialized Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
