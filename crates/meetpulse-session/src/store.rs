//! Client-held session.
//!
//! [`SessionStore`] owns the current [`SessionState`] and publishes every
//! change through a `tokio::sync::watch` channel. The signed-in identity is
//! persisted through [`IdentityStorage`] in step with the state change.
//!
//! ```text
//! Uninitialized --initialize--> Initializing --+--> Authenticated
//!                                              +--> Anonymous
//! Anonymous --login--> Authenticated --logout--> Anonymous
//! ```

use std::sync::Arc;

use meetpulse_api::{ProfileBackend, ProfileUpdateError};
use meetpulse_core::{
    CredentialResponse, DecodeError, Identity, Profile, SessionPhase, SessionState,
    decode_credential, is_profile_complete,
};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::{SessionError, SessionResult};
use crate::storage::IdentityStorage;

/// Reasons a sign-in did not complete. Reported through logs only.
#[derive(Debug, Error)]
enum LoginError {
    #[error("sign-in response carries no credential")]
    MissingCredential,

    #[error("malformed credential: {0}")]
    Decode(#[from] DecodeError),

    #[error("failed to persist session: {0}")]
    Storage(#[from] SessionError),

    #[error("failed to create profile: {0}")]
    Profile(#[from] ProfileUpdateError),
}

/// The session store.
pub struct SessionStore {
    backend: Arc<dyn ProfileBackend>,
    storage: IdentityStorage,
    client_id: Option<String>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Creates a store in the `Uninitialized` phase.
    pub fn new(backend: Arc<dyn ProfileBackend>, storage: IdentityStorage) -> Self {
        Self {
            backend,
            storage,
            client_id: None,
            state: watch::Sender::new(SessionState::default()),
        }
    }

    /// Sets the OAuth client id credentials are expected to be issued for.
    ///
    /// A credential for another audience is still accepted, with a warning.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Returns a receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Returns the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn storage(&self) -> &IdentityStorage {
        &self.storage
    }

    /// Restores the persisted session, if any.
    ///
    /// A stored identity is kept only if the backend still has a profile
    /// for its email; otherwise the record is removed. Ends with
    /// `loading == false` in every case.
    pub async fn initialize(&self) {
        self.state.send_modify(|state| {
            state.phase = SessionPhase::Initializing;
            state.loading = true;
        });

        let stored = match self.storage.load() {
            Ok(stored) => stored,
            Err(e) if e.is_corrupt() => {
                warn!(error = %e, "discarding corrupt session record");
                self.purge_record();
                None
            }
            Err(e) => {
                warn!(error = %e, "discarding unreadable session record");
                self.purge_record();
                None
            }
        };

        let Some(identity) = stored else {
            debug!("no stored session");
            self.publish_anonymous();
            return;
        };

        match self.backend.fetch_profile(&identity.email).await {
            Some(profile) => {
                info!(email = %identity.email, "restored session");
                let complete = is_profile_complete(&profile);
                self.state.send_replace(SessionState {
                    phase: SessionPhase::Authenticated,
                    identity: Some(identity),
                    loading: false,
                    profile_complete: complete,
                });
            }
            None => {
                info!(email = %identity.email, "no server profile for stored session, signing out");
                self.purge_record();
                self.publish_anonymous();
            }
        }
    }

    /// Signs in with a Google ID token.
    ///
    /// The decoded identity becomes the session identity and is persisted
    /// before the backend is consulted; a missing profile is then created
    /// from it. Returns false on any failure. A token that does not decode
    /// leaves the session untouched; a later failure leaves the identity in
    /// place without marking the profile complete.
    pub async fn login_with_google(&self, credential: &str) -> bool {
        self.state.send_modify(|state| state.loading = true);
        let result = self.establish(credential).await;
        self.state.send_modify(|state| state.loading = false);
        report(result)
    }

    /// Signs in with the payload of the Google sign-in callback.
    pub async fn login_with_response(&self, response: &CredentialResponse) -> bool {
        match response.credential.as_deref() {
            Some(credential) => self.login_with_google(credential).await,
            None => report(Err(LoginError::MissingCredential)),
        }
    }

    /// Signs out locally. The backend is not contacted.
    ///
    /// The in-memory session is cleared even if removing the record fails.
    pub fn logout(&self) -> SessionResult<()> {
        self.state.send_modify(|state| {
            state.phase = SessionPhase::Anonymous;
            state.identity = None;
            state.profile_complete = false;
        });
        info!("signed out");
        self.storage.clear()
    }

    /// Writes `profile` to the backend and recomputes completeness.
    pub async fn update_profile(&self, profile: &Profile) -> Result<Profile, ProfileUpdateError> {
        let stored = self.backend.update_profile(profile).await?;
        let complete = is_profile_complete(&stored);
        self.state
            .send_modify(|state| state.profile_complete = complete);
        Ok(stored)
    }

    /// Fetches the server profile for `email`. `None` covers both a missing
    /// profile and an unreachable backend.
    pub async fn fetch_profile(&self, email: &str) -> Option<Profile> {
        self.backend.fetch_profile(email).await
    }

    async fn establish(&self, credential: &str) -> Result<(), LoginError> {
        let claims = decode_credential(credential)?;

        if let Some(client_id) = self.client_id.as_deref()
            && claims.audience_mismatch(client_id)
        {
            warn!(
                expected = client_id,
                aud = claims.aud.as_deref().unwrap_or_default(),
                "credential was issued for another client id"
            );
        }

        let identity = Identity::from_claims(&claims);
        debug!(
            email = %identity.email,
            expires_at = ?claims.expires_at(),
            "decoded credential"
        );

        self.state.send_modify(|state| {
            state.phase = SessionPhase::Authenticated;
            state.identity = Some(identity.clone());
        });
        self.storage.set(&identity)?;

        let profile = match self.backend.fetch_profile(&identity.email).await {
            Some(profile) => profile,
            None => {
                info!(email = %identity.email, "creating profile");
                self.backend.update_profile(&Profile::from(&identity)).await?
            }
        };

        let complete = is_profile_complete(&profile);
        self.state
            .send_modify(|state| state.profile_complete = complete);
        info!(email = %identity.email, "signed in");
        Ok(())
    }

    fn publish_anonymous(&self) {
        self.state.send_replace(SessionState {
            phase: SessionPhase::Anonymous,
            identity: None,
            loading: false,
            profile_complete: false,
        });
    }

    fn purge_record(&self) {
        if let Err(e) = self.storage.clear() {
            warn!(error = %e, "failed to remove session record");
        }
    }
}

fn report(result: Result<(), LoginError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "Google login failed");
            false
        }
    }
}
