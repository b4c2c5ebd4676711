//! The authenticated user's identity.

use serde::{Deserialize, Serialize};

use crate::credential::GoogleClaims;

/// Role assigned to every identity created from a sign-in.
pub const DEFAULT_ROLE: &str = "user";

/// Base URL of the generated-initials avatar service.
const AVATAR_BASE: &str = "https://api.dicebear.com/7.x/initials/svg";

/// The authenticated user's minimal profile.
///
/// This is also the shape of the persisted session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque account identifier (the Google `sub` claim).
    pub id: String,
    /// Email address; the key used for profile lookups.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role, `"user"` unless the record says otherwise.
    #[serde(default = "default_role")]
    pub role: String,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

impl Identity {
    /// Creates an identity with the default role and no avatar.
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role: default_role(),
            avatar: None,
        }
    }

    /// Builder method to set the avatar URL.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Builds the identity for a fresh sign-in.
    ///
    /// The avatar falls back to a generated-initials image seeded with the
    /// email when the claims carry no picture.
    pub fn from_claims(claims: &GoogleClaims) -> Self {
        let avatar = claims
            .picture
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| fallback_avatar(&claims.email));

        Self::new(&claims.sub, &claims.email, &claims.name).with_avatar(avatar)
    }
}

/// Returns the generated-initials avatar URL for an email address.
pub fn fallback_avatar(email: &str) -> String {
    format!("{AVATAR_BASE}?seed={email}")
}
