//! Client error types.

use std::path::PathBuf;

use meetpulse_api::{ApiError, ProfileUpdateError};
use meetpulse_session::SessionError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("profile update failed: {0}")]
    ProfileUpdate(#[from] ProfileUpdateError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Google authentication failed. Please try again.")]
    LoginFailed,

    #[error("not signed in, run `meetpulse login` first")]
    NotSignedIn,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON in {path}: {source}")]
    InvalidInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}
