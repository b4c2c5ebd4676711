//! Error types for backend requests.

use std::fmt;
use thiserror::Error;

/// Broad classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    /// Connection refused, DNS failure, reset, timeout.
    Network,
    /// The backend answered 404.
    NotFound,
    /// The backend rejected the request (4xx other than 404), or the
    /// request was invalid before it was sent.
    BadRequest,
    /// The backend failed (5xx).
    Server,
    /// The response body did not have the expected shape.
    InvalidResponse,
    /// Client misconfiguration (bad base URL, TLS setup).
    Configuration,
    /// Failure inside the client itself (request body serialization).
    Internal,
}

impl ApiErrorCode {
    /// Returns a machine-readable name for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network_error",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::Server => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::Configuration => "configuration_error",
            Self::Internal => "internal_error",
        }
    }

    /// Maps a non-success HTTP status to a code.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            400..=499 => Self::BadRequest,
            _ => Self::Server,
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error talking to the backend.
#[derive(Debug, Error)]
pub struct ApiError {
    code: ApiErrorCode,
    message: String,
    /// HTTP status, when the backend answered.
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Network, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::BadRequest, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidResponse, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Configuration, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message)
    }

    /// Creates an error for a non-success HTTP status.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        let mut err = Self::new(ApiErrorCode::from_status(status), message);
        err.status = Some(status);
        err
    }

    /// Attaches the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ApiErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn http_status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ApiErrorCode::NotFound
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({}): {}", self.code, status, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// A specialized Result type for backend requests.
pub type ApiResult<T> = Result<T, ApiError>;

/// Message used when a rejected profile update carries no usable message.
pub const PROFILE_UPDATE_FALLBACK: &str = "Failed to update profile";

/// A failed profile write.
#[derive(Debug, Error)]
pub enum ProfileUpdateError {
    /// The backend answered with a non-success status. `message` is the
    /// server's own `message` field, or a generic fallback.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never got a usable answer.
    #[error(transparent)]
    Transport(#[from] ApiError),
}

impl ProfileUpdateError {
    /// Returns the message to show the user.
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message, .. } => message,
            Self::Transport(err) => err.message(),
        }
    }
}
