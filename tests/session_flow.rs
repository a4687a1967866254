// Kavita Source - Kavita Content Adapter for Reader Hosts
// Copyright (C) 2025 Kavita Source contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Session lifecycle integration tests
//!
//! Exercises login, token-expiry detection and refresh against a mocked
//! Kavita server, including the call-count guarantees: one login per
//! process, exactly one refresh on expiry, zero network calls while the
//! cached token is still valid.

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use kavita_source::api::SessionManager;
use kavita_source::error::KavitaError;
use kavita_source::storage::{KeyValueStore, MemoryStore, KEY_USER};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build an unsigned three-segment JWT expiring at `exp`
fn token_with_exp(exp: i64) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload =
        general_purpose::URL_SAFE_NO_PAD.encode(format!(r#"{{"nameid":1,"exp":{exp}}}"#).as_bytes());
    format!("{header}.{payload}.signature")
}

fn manager_for(server: &MockServer) -> (SessionManager, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_credentials(&server.uri(), "test-key"));
    (SessionManager::new(store.clone()), store)
}

#[tokio::test]
async fn first_call_logs_in_once_and_later_calls_reuse_the_session() {
    let server = MockServer::start().await;
    let token = token_with_exp(Utc::now().timestamp() + 3600);

    Mock::given(method("POST"))
        .and(path("/api/Account/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "username": "apikey",
            "token": token,
            "refreshToken": "refresh-1",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/Account/refresh-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (manager, store) = manager_for(&server);

    let headers = manager.authorized_headers(None).await.unwrap();
    assert_eq!(
        headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
        format!("Bearer {token}")
    );

    // Second call: session is valid, no further network traffic.
    let headers = manager.authorized_headers(None).await.unwrap();
    assert_eq!(
        headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
        format!("Bearer {token}")
    );

    // The session was persisted after login.
    let persisted = store.get(KEY_USER).unwrap();
    let session: serde_json::Value = serde_json::from_str(&persisted).unwrap();
    assert_eq!(session["token"], serde_json::json!(token));
    assert_eq!(session["refreshToken"], serde_json::json!("refresh-1"));
}

#[tokio::test]
async fn expired_session_triggers_exactly_one_refresh() {
    let server = MockServer::start().await;
    let expired = token_with_exp(Utc::now().timestamp() - 60);
    let fresh = token_with_exp(Utc::now().timestamp() + 3600);

    Mock::given(method("POST"))
        .and(path("/api/Account/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/Account/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": fresh,
            "refreshToken": "refresh-2",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (manager, store) = manager_for(&server);
    store
        .set(
            KEY_USER,
            &serde_json::json!({"token": expired, "refreshToken": "refresh-1"}).to_string(),
        )
        .unwrap();

    let headers = manager.authorized_headers(None).await.unwrap();
    assert_eq!(
        headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
        format!("Bearer {fresh}")
    );

    // The refreshed token is valid, so this stays at one refresh total.
    manager.authorized_headers(None).await.unwrap();

    let persisted: serde_json::Value =
        serde_json::from_str(&store.get(KEY_USER).unwrap()).unwrap();
    assert_eq!(persisted["refreshToken"], serde_json::json!("refresh-2"));
}

#[tokio::test]
async fn unexpired_session_from_storage_makes_no_network_calls() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would 404 and the expectations below
    // would not hold.
    let valid = token_with_exp(Utc::now().timestamp() + 3600);

    let (manager, store) = manager_for(&server);
    store
        .set(
            KEY_USER,
            &serde_json::json!({"token": valid, "refreshToken": "r"}).to_string(),
        )
        .unwrap();

    let headers = manager.authorized_headers(None).await.unwrap();
    assert_eq!(
        headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
        format!("Bearer {valid}")
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_login_is_an_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Account/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (manager, _) = manager_for(&server);
    let err = manager.authorized_headers(None).await.unwrap_err();
    assert!(matches!(err, KavitaError::Authentication { .. }), "{err:?}");
}

#[tokio::test]
async fn login_response_without_tokens_is_an_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Account/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"username": "x"})),
        )
        .mount(&server)
        .await;

    let (manager, _) = manager_for(&server);
    let err = manager.authorized_headers(None).await.unwrap_err();
    assert!(matches!(err, KavitaError::Authentication { .. }), "{err:?}");
}

#[tokio::test]
async fn rejected_refresh_is_an_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Account/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (manager, store) = manager_for(&server);
    let expired = token_with_exp(Utc::now().timestamp() - 60);
    store
        .set(
            KEY_USER,
            &serde_json::json!({"token": expired, "refreshToken": "r"}).to_string(),
        )
        .unwrap();

    let err = manager.authorized_headers(None).await.unwrap_err();
    assert!(matches!(err, KavitaError::Authentication { .. }), "{err:?}");
}

#[tokio::test]
async fn malformed_cached_token_is_a_parse_error() {
    let server = MockServer::start().await;
    let (manager, store) = manager_for(&server);
    // Complete session, but the token is not a three-segment JWT.
    store
        .set(
            KEY_USER,
            &serde_json::json!({"token": "no-dots-here", "refreshToken": "r"}).to_string(),
        )
        .unwrap();

    let err = manager.authorized_headers(None).await.unwrap_err();
    assert!(matches!(err, KavitaError::Parse { .. }), "{err:?}");
}

#[tokio::test]
async fn caller_supplied_headers_are_preserved() {
    let server = MockServer::start().await;
    let valid = token_with_exp(Utc::now().timestamp() + 3600);

    let (manager, store) = manager_for(&server);
    store
        .set(
            KEY_USER,
            &serde_json::json!({"token": valid, "refreshToken": "r"}).to_string(),
        )
        .unwrap();

    let mut extra = HeaderMap::new();
    extra.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    extra.insert("x-custom", HeaderValue::from_static("kept"));

    let headers = manager.authorized_headers(Some(extra)).await.unwrap();
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    assert_eq!(headers.get("x-custom").unwrap(), "kept");
    assert!(headers.get(AUTHORIZATION).is_some());
}
