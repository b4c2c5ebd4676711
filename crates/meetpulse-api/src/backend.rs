//! Backend seams used by the session layer.
//!
//! The session store talks to the profile endpoints through
//! [`ProfileBackend`] and the dashboard reads collections through
//! [`DashboardSource`]. [`ApiClient`] implements both; tests substitute
//! in-memory implementations.

use std::future::Future;
use std::pin::Pin;

use meetpulse_core::{Feedback, Meeting, Profile};
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::{ApiResult, ProfileUpdateError};

/// A boxed future for async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Remote profile storage.
pub trait ProfileBackend: Send + Sync {
    /// Fetches the profile stored for `email`.
    ///
    /// Returns `None` both when no profile exists and when the backend could
    /// not be reached. Callers cannot tell the two apart and treat either as
    /// "no profile".
    fn fetch_profile<'a>(&'a self, email: &'a str) -> BoxFuture<'a, Option<Profile>>;

    /// Creates or updates `profile`, returning what the backend stored.
    fn update_profile<'a>(
        &'a self,
        profile: &'a Profile,
    ) -> BoxFuture<'a, Result<Profile, ProfileUpdateError>>;
}

/// Source of the collections the dashboard aggregates.
pub trait DashboardSource: Send + Sync {
    fn fetch_meetings(&self) -> BoxFuture<'_, ApiResult<Vec<Meeting>>>;

    fn fetch_feedback(&self) -> BoxFuture<'_, ApiResult<Vec<Feedback>>>;
}

impl ProfileBackend for ApiClient {
    fn fetch_profile<'a>(&'a self, email: &'a str) -> BoxFuture<'a, Option<Profile>> {
        Box::pin(async move {
            match self.get_profile(email).await {
                Ok(profile) => Some(profile),
                Err(e) if e.is_not_found() => {
                    debug!(email, "no profile stored");
                    None
                }
                Err(e) => {
                    warn!(email, error = %e, "profile fetch failed, treating as absent");
                    None
                }
            }
        })
    }

    fn update_profile<'a>(
        &'a self,
        profile: &'a Profile,
    ) -> BoxFuture<'a, Result<Profile, ProfileUpdateError>> {
        Box::pin(ApiClient::update_profile(self, profile))
    }
}

impl DashboardSource for ApiClient {
    fn fetch_meetings(&self) -> BoxFuture<'_, ApiResult<Vec<Meeting>>> {
        Box::pin(self.list_meetings())
    }

    fn fetch_feedback(&self) -> BoxFuture<'_, ApiResult<Vec<Feedback>>> {
        Box::pin(self.list_feedback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_backend_yields_no_profile() {
        let config = crate::ApiConfig::new("http://127.0.0.1:1").unwrap();
        let client = ApiClient::new(&config).unwrap();
        let backend: &dyn ProfileBackend = &client;

        assert!(backend.fetch_profile("a@example.com").await.is_none());
    }
}
