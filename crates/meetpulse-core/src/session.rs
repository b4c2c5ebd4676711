//! Session state shared with observers.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Nothing has been read yet.
    #[default]
    Uninitialized,
    /// The persisted record is being reconciled with the backend.
    Initializing,
    /// An identity is established.
    Authenticated,
    /// No identity.
    Anonymous,
}

impl SessionPhase {
    /// Returns a human-readable name for this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Authenticated => "authenticated",
            Self::Anonymous => "anonymous",
        }
    }
}

/// Snapshot of the client-held session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub phase: SessionPhase,
    pub identity: Option<Identity>,
    /// True until startup reconciliation finishes, and while a login runs.
    pub loading: bool,
    /// Only meaningful when `identity` is present.
    pub profile_complete: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            identity: None,
            loading: true,
            profile_complete: false,
        }
    }
}

impl SessionState {
    /// Returns the identity id, if authenticated.
    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.id.as_str())
    }
}
