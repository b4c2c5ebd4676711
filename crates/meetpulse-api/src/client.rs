//! Backend HTTP client.
//!
//! [`ApiClient`] wraps a `reqwest::Client` bound to one backend base URL and
//! exposes one method per endpoint. Collections are decoded leniently through
//! [`decode_collection`]; a body that is not a JSON array at all is an
//! [`ApiErrorCode::InvalidResponse`](crate::ApiErrorCode::InvalidResponse).

use std::time::Duration;

use meetpulse_core::{Feedback, Meeting, Profile, decode_collection};
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, ApiResult, PROFILE_UPDATE_FALLBACK, ProfileUpdateError};

const DEFAULT_USER_AGENT: &str = concat!("meetpulse/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    /// Per-request timeout. Unset means requests wait indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ApiConfig {
    /// Parses and validates `base_url`, which must be an absolute http(s) URL.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let url = Url::parse(base_url).map_err(|e| {
            ApiError::configuration(format!("invalid backend URL '{base_url}': {e}"))
                .with_source(e)
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::configuration(format!(
                "backend URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        Ok(Self {
            base_url: url,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Client for the meetings, feedback and profile endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client from `config`.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder.build().map_err(|e| {
            ApiError::configuration(format!("failed to create HTTP client: {e}")).with_source(e)
        })?;

        Ok(Self {
            http_client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Lists all meetings.
    pub async fn list_meetings(&self) -> ApiResult<Vec<Meeting>> {
        let request = self.http_client.get(self.url("/api/meetings"));
        let body = self.fetch_json(request, "Failed to fetch meetings").await?;
        collection(body, "meeting")
    }

    /// Fetches one meeting by id.
    pub async fn get_meeting(&self, meeting_id: &str) -> ApiResult<Meeting> {
        if meeting_id.is_empty() {
            return Err(ApiError::bad_request("Meeting ID is required"));
        }

        let url = self.url(&format!(
            "/api/meetings/{}",
            urlencoding::encode(meeting_id)
        ));
        let body = self
            .fetch_json(self.http_client.get(url), "Failed to fetch meeting data")
            .await?;
        parse(body)
    }

    /// Creates a meeting and returns the stored record.
    pub async fn create_meeting(&self, meeting: &Meeting) -> ApiResult<Meeting> {
        let request = self.post_json("/api/meetings", meeting)?;
        let body = self.fetch_json(request, "Failed to save meeting").await?;
        parse(body)
    }

    /// Lists all feedback submissions.
    pub async fn list_feedback(&self) -> ApiResult<Vec<Feedback>> {
        let request = self.http_client.get(self.url("/api/feedback"));
        let body = self
            .fetch_json(request, "Failed to fetch feedback data")
            .await?;
        collection(body, "feedback")
    }

    /// Submits feedback for a meeting and returns the stored record.
    pub async fn submit_feedback(&self, feedback: &Feedback) -> ApiResult<Feedback> {
        let request = self.post_json("/api/feedback", feedback)?;
        let body = self.fetch_json(request, "Failed to save feedback").await?;
        parse(body)
    }

    /// Fetches the profile stored for `email`.
    ///
    /// Unlike [`ProfileBackend::fetch_profile`](crate::ProfileBackend::fetch_profile)
    /// this keeps "not found" and transport failures apart.
    pub async fn get_profile(&self, email: &str) -> ApiResult<Profile> {
        let url = self.url(&format!("/api/profile/{}", urlencoding::encode(email)));
        let body = self
            .fetch_json(self.http_client.get(url), "Failed to fetch profile")
            .await?;
        parse(body)
    }

    /// Creates or updates a profile.
    ///
    /// A rejected write carries the server's `message` when the error body
    /// has one. On success the stored profile is taken from the `profile`
    /// field of the response, or the input is echoed back when the
    /// response does not include it.
    pub async fn update_profile(&self, profile: &Profile) -> Result<Profile, ProfileUpdateError> {
        let request = self.post_json("/api/profile", profile)?;
        let response = self.send(request).await?;
        let status = response.status();

        if !status.is_success() {
            let message = rejection_message(response).await;
            warn!(status = status.as_u16(), %message, "profile update rejected");
            return Err(ProfileUpdateError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = read_body(response).await?;
        match body.get("profile") {
            Some(stored) if !stored.is_null() => Ok(parse(stored.clone())?),
            _ => {
                debug!(email = %profile.email, "profile update response has no profile, echoing input");
                Ok(profile.clone())
            }
        }
    }

    fn post_json<T: Serialize>(&self, path: &str, body: &T) -> ApiResult<RequestBuilder> {
        let payload = serde_json::to_value(body).map_err(|e| {
            ApiError::internal(format!("failed to serialize request body: {e}")).with_source(e)
        })?;
        Ok(self.http_client.post(self.url(path)).json(&payload))
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::network("request timeout").with_source(e)
            } else if e.is_connect() {
                ApiError::network(format!("connection failed: {e}")).with_source(e)
            } else {
                ApiError::network(format!("request failed: {e}")).with_source(e)
            }
        })
    }

    /// Sends `request` and parses a JSON body, mapping non-success statuses
    /// to an error carrying `failure`.
    async fn fetch_json(&self, request: RequestBuilder, failure: &str) -> ApiResult<Value> {
        let response = self.send(request).await?;
        let status = response.status();

        if !status.is_success() {
            debug!(status = status.as_u16(), url = %response.url(), "backend returned error status");
            return Err(ApiError::status(status.as_u16(), failure));
        }

        read_body(response).await
    }
}

async fn read_body(response: Response) -> ApiResult<Value> {
    let text = response.text().await.map_err(|e| {
        ApiError::network(format!("failed to read response: {e}")).with_source(e)
    })?;

    serde_json::from_str(&text).map_err(|e| {
        ApiError::invalid_response(format!("failed to parse response: {e}")).with_source(e)
    })
}

fn parse<T: DeserializeOwned>(body: Value) -> ApiResult<T> {
    serde_json::from_value(body).map_err(|e| {
        ApiError::invalid_response(format!("unexpected response shape: {e}")).with_source(e)
    })
}

fn collection<T: DeserializeOwned>(body: Value, kind: &str) -> ApiResult<Vec<T>> {
    decode_collection(body, kind)
        .ok_or_else(|| ApiError::invalid_response(format!("expected a JSON array of {kind} records")))
}

/// Extracts a non-empty string `message` from an error body, or the fallback.
async fn rejection_message(response: Response) -> String {
    let parsed: Option<Value> = match response.text().await {
        Ok(text) => serde_json::from_str(&text).ok(),
        Err(_) => None,
    };

    parsed
        .as_ref()
        .and_then(|body| body.get("message"))
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map_or_else(|| PROFILE_UPDATE_FALLBACK.to_string(), str::to_string)
}
