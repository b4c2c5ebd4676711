//! Server-side user profile.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::identity::Identity;

/// A user profile as stored by the backend.
///
/// Only `email` is interpreted. Every other field is kept in `extra`
/// whatever its JSON type, so that a fetched profile can be posted back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// Creates a profile holding only an email address.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: Map::new(),
        }
    }

    /// Sets an uninterpreted field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Returns the display name when the backend stores it as a string.
    pub fn name(&self) -> Option<&str> {
        self.field("name").and_then(Value::as_str)
    }
}

impl From<&Identity> for Profile {
    fn from(identity: &Identity) -> Self {
        let profile = Self::new(identity.email.clone())
            .with_field("id", identity.id.clone())
            .with_field("name", identity.name.clone())
            .with_field("role", identity.role.clone());
        match identity.avatar {
            Some(ref avatar) => profile.with_field("avatar", avatar.clone()),
            None => profile,
        }
    }
}

/// Returns whether a profile counts as complete.
///
/// No field is currently required, so every profile is complete.
pub fn is_profile_complete(_profile: &Profile) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_from_identity() {
        let identity = Identity::new("1", "a@b.c", "A").with_avatar("https://x/y.png");
        let profile = Profile::from(&identity);

        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({
                "id": "1",
                "email": "a@b.c",
                "name": "A",
                "role": "user",
                "avatar": "https://x/y.png"
            })
        );
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let json = r#"{"email":"a@b.c","department":"R&D","phone":"555"}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.field("department"), Some(&Value::from("R&D")));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["phone"], "555");
        assert!(back.get("name").is_none());
    }

    #[test]
    fn non_string_fields_still_parse() {
        let json = r#"{"id":5,"email":"a@b.c","role":{"admin":true},"name":null}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.email, "a@b.c");
        assert_eq!(profile.field("id"), Some(&json!(5)));
        assert_eq!(profile.name(), None);
    }

    #[test]
    fn missing_email_still_parses() {
        let profile: Profile = serde_json::from_str(r#"{"id":7}"#).unwrap();
        assert!(profile.email.is_empty());
    }

    #[test]
    fn every_profile_is_complete() {
        assert!(is_profile_complete(&Profile::new("a@b.c")));
    }
}
