//! Google sign-in credential decoding.
//!
//! A Google ID token is a JWT: three dot-separated base64url segments holding
//! a header, a claim set and a signature. This module only reads the claim
//! set. The signature is **not** verified; callers must treat the decoded
//! claims as assertions made by whoever produced the token.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard-alphabet decoder as lenient as browsers' `atob`: padding is
/// optional and non-zero trailing bits are discarded.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Errors produced while decoding a credential.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The token has no second (payload) segment.
    #[error("credential has no payload segment")]
    MissingPayload,

    /// The payload segment is not valid base64.
    #[error("credential payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded payload is not UTF-8 text.
    #[error("credential payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The decoded payload is not a valid claim set.
    #[error("credential payload is not a valid claim set: {0}")]
    Claims(#[from] serde_json::Error),
}

/// Identity claims carried by a Google ID token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleClaims {
    /// Stable Google account identifier.
    pub sub: String,
    /// Account email address.
    pub email: String,
    /// Display name. Absent when the `profile` scope was not granted.
    #[serde(default)]
    pub name: String,
    /// Profile picture URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// OAuth client id the token was issued for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl GoogleClaims {
    /// Returns the token expiry, if the claim is present and in range.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Returns true if the token was issued for a different client id.
    ///
    /// Tokens without an `aud` claim never mismatch.
    pub fn audience_mismatch(&self, client_id: &str) -> bool {
        self.aud.as_deref().is_some_and(|aud| aud != client_id)
    }
}

/// Payload handed over by the Google sign-in callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialResponse {
    /// The ID token, when sign-in succeeded.
    #[serde(default)]
    pub credential: Option<String>,
    /// The client id that requested the credential.
    #[serde(default, rename = "clientId")]
    pub client_id: Option<String>,
    /// How the user selected the account (e.g. `btn`, `auto`).
    #[serde(default)]
    pub select_by: Option<String>,
}

/// Decodes the claim set from a Google ID token without verifying it.
///
/// # Errors
///
/// Returns [`DecodeError`] if the token has fewer than two segments, the
/// payload is not base64, not UTF-8, or not a claim set with at least `sub`
/// and `email`.
pub fn decode_credential(token: &str) -> Result<GoogleClaims, DecodeError> {
    let payload = token.split('.').nth(1).ok_or(DecodeError::MissingPayload)?;

    let standard: String = payload
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let bytes = PAYLOAD_ENGINE.decode(standard.as_bytes())?;
    let text = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn make_token(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn decodes_standard_claims() {
        let token = make_token(
            r#"{"sub":"1234567890","email":"ada@example.com","name":"Ada Lovelace","picture":"https://example.com/ada.png","aud":"client.apps.googleusercontent.com","exp":1700000000}"#,
        );

        let claims = decode_credential(&token).unwrap();
        assert_eq!(claims.sub, "1234567890");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.name, "Ada Lovelace");
        assert_eq!(claims.picture.as_deref(), Some("https://example.com/ada.png"));
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn claims_round_trip_through_token() {
        let claims = GoogleClaims {
            sub: "42".to_string(),
            email: "grace@example.com".to_string(),
            name: "Grace Hopper".to_string(),
            picture: None,
            aud: None,
            exp: None,
        };
        let token = make_token(&serde_json::to_string(&claims).unwrap());

        assert_eq!(decode_credential(&token).unwrap(), claims);
    }

    #[test]
    fn accepts_url_safe_characters_and_padding() {
        // The name is positioned so its encoding needs the URL-safe alphabet.
        let payload = r#"{"sub":"1","email":"a@b.c","name":"~~~?"}"#;
        let url_safe = URL_SAFE_NO_PAD.encode(payload);
        assert!(url_safe.contains('-') || url_safe.contains('_'));

        let unpadded = format!("h.{url_safe}.s");
        assert_eq!(decode_credential(&unpadded).unwrap().name, "~~~?");

        let padded = format!("h.{}.s", base64::engine::general_purpose::URL_SAFE.encode(payload));
        assert_eq!(decode_credential(&padded).unwrap().name, "~~~?");
    }

    #[test]
    fn non_zero_trailing_bits_are_ignored() {
        let mut payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"1","email":"a@b.co"}"#);
        assert_eq!(payload.pop(), Some('Q'));
        payload.push('R');

        let claims = decode_credential(&format!("h.{payload}.s")).unwrap();
        assert_eq!(claims.email, "a@b.co");
    }

    #[test]
    fn two_segments_are_enough() {
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"1","email":"a@b.c"}"#);
        let claims = decode_credential(&format!("header.{payload}")).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.name, "");
    }

    #[test]
    fn single_segment_is_rejected() {
        assert!(matches!(
            decode_credential("not-a-jwt"),
            Err(DecodeError::MissingPayload)
        ));
        assert!(matches!(decode_credential(""), Err(DecodeError::MissingPayload)));
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert!(matches!(
            decode_credential("h.!!!not base64!!!.s"),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let payload = URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(
            decode_credential(&format!("h.{payload}.s")),
            Err(DecodeError::Utf8(_))
        ));
    }

    #[test]
    fn non_json_payload_is_rejected() {
        let token = make_token("definitely not json");
        assert!(matches!(decode_credential(&token), Err(DecodeError::Claims(_))));
    }

    #[test]
    fn claim_set_without_email_is_rejected() {
        let token = make_token(r#"{"sub":"1","name":"Nobody"}"#);
        assert!(matches!(decode_credential(&token), Err(DecodeError::Claims(_))));
    }

    #[test]
    fn audience_mismatch_detection() {
        let mut claims = decode_credential(&make_token(
            r#"{"sub":"1","email":"a@b.c","aud":"one.apps.googleusercontent.com"}"#,
        ))
        .unwrap();

        assert!(!claims.audience_mismatch("one.apps.googleusercontent.com"));
        assert!(claims.audience_mismatch("two.apps.googleusercontent.com"));

        claims.aud = None;
        assert!(!claims.audience_mismatch("two.apps.googleusercontent.com"));
    }

    #[test]
    fn credential_response_from_callback_json() {
        let response: CredentialResponse = serde_json::from_str(
            r#"{"credential":"a.b.c","clientId":"x.apps.googleusercontent.com","select_by":"btn"}"#,
        )
        .unwrap();
        assert_eq!(response.credential.as_deref(), Some("a.b.c"));
        assert_eq!(response.select_by.as_deref(), Some("btn"));

        let empty: CredentialResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.credential.is_none());
    }
}
