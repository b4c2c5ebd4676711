//! Sign-in and dashboard flow against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use httpmock::prelude::*;
use meetpulse_api::{ApiClient, ApiConfig, DashboardSource};
use meetpulse_core::SessionPhase;
use meetpulse_session::{DashboardWatcher, IdentityStorage, SessionStore};
use serde_json::json;
use tempfile::TempDir;

fn credential() -> String {
    let claims = json!({
        "sub": "108",
        "email": "ada@example.com",
        "name": "Ada Lovelace",
        "picture": "https://lh3.googleusercontent.com/a/ada",
        "aud": "client-1"
    });
    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

fn client_for(server: &MockServer) -> Arc<ApiClient> {
    let config = ApiConfig::new(&server.base_url()).unwrap();
    Arc::new(ApiClient::new(&config).unwrap())
}

#[tokio::test]
async fn first_login_creates_profile_and_loads_dashboard() {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET).path_includes("/api/profile/");
            then.status(404).json_body(json!({"message": "Profile not found"}));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/profile").json_body(json!({
                "id": "108",
                "email": "ada@example.com",
                "name": "Ada Lovelace",
                "role": "user",
                "avatar": "https://lh3.googleusercontent.com/a/ada"
            }));
            then.status(201).json_body(json!({"success": true}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/meetings");
            then.status(200).json_body(json!([
                {"meetingId": "1", "userId": "108"},
                {"meetingId": "2", "userId": "other"}
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/feedback");
            then.status(200).json_body(json!([
                {"meetingId": 1, "responses": {"overallSatisfaction": 4}},
                {"meetingId": "2", "responses": {"overallSatisfaction": 1}}
            ]));
        })
        .await;

    let dir = TempDir::new().unwrap();
    let client = client_for(&server);
    let store = SessionStore::new(
        client.clone(),
        IdentityStorage::new(dir.path().join("session.json")),
    )
    .with_client_id("client-1");

    assert!(store.login_with_google(&credential()).await);
    lookup.assert_async().await;
    create.assert_async().await;

    let state = store.snapshot();
    assert_eq!(state.phase, SessionPhase::Authenticated);
    assert!(state.profile_complete);

    let source: Arc<dyn DashboardSource> = client;
    let watcher = DashboardWatcher::spawn(source, store.subscribe());
    let mut views = watcher.subscribe();
    let view = tokio::time::timeout(
        Duration::from_secs(5),
        views.wait_for(|view| !view.loading && view.updated_at.is_some()),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();

    assert_eq!(view.stats.total_meetings, 1);
    assert_eq!(view.stats.average_rating.to_string(), "4.00");
}

#[tokio::test]
async fn restart_restores_session_when_profile_exists() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_includes("/api/profile/");
            then.status(200)
                .json_body(json!({"email": "ada@example.com", "name": "Ada Lovelace"}));
        })
        .await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let first = SessionStore::new(client_for(&server), IdentityStorage::new(&path));
    assert!(first.login_with_google(&credential()).await);
    drop(first);

    let second = SessionStore::new(client_for(&server), IdentityStorage::new(&path));
    second.initialize().await;

    let state = second.snapshot();
    assert_eq!(state.phase, SessionPhase::Authenticated);
    assert_eq!(state.user_id(), Some("108"));
    assert!(!state.loading);
}

#[tokio::test]
async fn restart_signs_out_when_backend_is_down() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path_includes("/api/profile/");
                then.status(200).json_body(json!({"email": "ada@example.com"}));
            })
            .await;
        let store = SessionStore::new(client_for(&server), IdentityStorage::new(&path));
        assert!(store.login_with_google(&credential()).await);
    }

    let config = ApiConfig::new("http://127.0.0.1:1").unwrap();
    let offline = Arc::new(ApiClient::new(&config).unwrap());
    let store = SessionStore::new(offline, IdentityStorage::new(&path));
    store.initialize().await;

    assert_eq!(store.snapshot().phase, SessionPhase::Anonymous);
    assert!(!path.exists());
}

#[tokio::test]
async fn rejected_profile_creation_fails_login() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_includes("/api/profile/");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/profile");
            then.status(400).json_body(json!({"message": "email required"}));
        })
        .await;

    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(
        client_for(&server),
        IdentityStorage::new(dir.path().join("session.json")),
    );

    assert!(!store.login_with_google(&credential()).await);
    let state = store.snapshot();
    assert!(state.identity.is_some());
    assert!(!state.profile_complete);
}

#[tokio::test]
async fn profile_with_numeric_id_keeps_user_signed_in() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_includes("/api/profile/");
            then.status(200).json_body(json!({
                "id": 5,
                "email": "ada@example.com",
                "name": "Ada",
                "role": 1
            }));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/profile");
            then.status(201).json_body(json!({"success": true}));
        })
        .await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let first = SessionStore::new(client_for(&server), IdentityStorage::new(&path));
    assert!(first.login_with_google(&credential()).await);
    create.assert_calls_async(0).await;
    drop(first);

    let second = SessionStore::new(client_for(&server), IdentityStorage::new(&path));
    second.initialize().await;

    let state = second.snapshot();
    assert_eq!(state.phase, SessionPhase::Authenticated);
    assert!(state.profile_complete);
    assert!(path.exists());
}
