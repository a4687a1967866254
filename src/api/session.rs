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

//! Session management
//!
//! Owns credential state (server URL, API key, cached token pair) and
//! guarantees that every outbound request carries a valid, non-expired
//! bearer token. First login and token refresh happen transparently inside
//! [`SessionManager::authorized_headers`]; the session is persisted through
//! the injected [`KeyValueStore`] after every creation or mutation so
//! repeated calls within a process avoid redundant logins.
//!
//! The read-check-refresh-write sequence runs under one `tokio::Mutex` so
//! concurrent callers on a multi-threaded runtime cannot trigger duplicate
//! logins or lose a refresh. No call here is retried; transport failures
//! terminate the in-flight operation.

use crate::api::token::decode_expiry;
use crate::error::{KavitaError, Result};
use crate::storage::{KeyValueStore, KEY_API_KEY, KEY_URL, KEY_USER};
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

/// An authenticated identity against one Kavita server.
///
/// Either fully populated or absent; a stored session missing either token
/// is treated as absent and triggers a fresh login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub refresh_token: String,
}

/// Login and refresh responses carry the token pair among other account
/// fields; both tokens are optional on the wire so partial payloads can be
/// detected rather than failing deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPairResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl TokenPairResponse {
    fn into_session(self) -> Option<Session> {
        match (self.token, self.refresh_token) {
            (Some(token), Some(refresh_token)) if !token.is_empty() && !refresh_token.is_empty() => {
                Some(Session {
                    token,
                    refresh_token,
                })
            }
            _ => None,
        }
    }
}

/// Credential and session state guarded by the manager's mutex
#[derive(Debug, Default)]
struct SessionState {
    /// Normalized base URL, always ending in exactly one `/`
    site: Option<String>,
    api_key: Option<String>,
    session: Option<Session>,
}

/// Produces a valid `Authorization` header for every outbound call,
/// handling first-login and token refresh transparently.
pub struct SessionManager {
    http: reqwest::Client,
    store: Arc<dyn KeyValueStore>,
    state: Mutex<SessionState>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_http(reqwest::Client::new(), store)
    }

    /// Construct with a caller-supplied HTTP client (shared pools, tests)
    pub fn with_http(http: reqwest::Client, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            http,
            store,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// The configured base URL, normalized to end in a single `/`
    pub async fn base_url(&self) -> Result<String> {
        let mut state = self.state.lock().await;
        Self::site(&self.store, &mut state)
    }

    /// The configured API key (used for cover-image query parameters)
    pub async fn api_key(&self) -> Result<String> {
        let mut state = self.state.lock().await;
        Self::key(&self.store, &mut state)
    }

    /// Produce request headers carrying a valid bearer token, merging in any
    /// caller-supplied headers. Caller keys are preserved; only
    /// `Authorization` is added or overwritten.
    ///
    /// Performs login if no session exists and refresh if the cached token's
    /// `exp` claim is at or past the current time.
    pub async fn authorized_headers(&self, extra: Option<HeaderMap>) -> Result<HeaderMap> {
        let mut state = self.state.lock().await;

        let site = Self::site(&self.store, &mut state)?;
        let api_key = Self::key(&self.store, &mut state)?;

        // Memory, then storage, then a fresh login.
        if state.session.is_none() {
            state.session = self.stored_session();
        }
        let mut session = match state.session.clone() {
            Some(session) => session,
            None => {
                let session = self.login(&site, &api_key).await?;
                self.persist(&session)?;
                state.session = Some(session.clone());
                session
            }
        };

        if decode_expiry(&session.token)? <= Utc::now().timestamp() {
            debug!("session token expired, refreshing");
            session = self.refresh(&site, &session).await?;
            self.persist(&session)?;
            state.session = Some(session.clone());
        }

        let mut headers = extra.unwrap_or_default();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", session.token))
            .map_err(|e| KavitaError::parse("session token", e.to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    // ===== credential loading =====

    fn site(store: &Arc<dyn KeyValueStore>, state: &mut SessionState) -> Result<String> {
        if state.site.is_none() {
            state.site = store
                .get(KEY_URL)
                .filter(|v| Url::parse(v).is_ok())
                .map(|v| format!("{}/", v.trim_end_matches('/')));
        }
        state
            .site
            .clone()
            .ok_or_else(|| KavitaError::configuration("must configure a valid URL"))
    }

    fn key(store: &Arc<dyn KeyValueStore>, state: &mut SessionState) -> Result<String> {
        if state.api_key.is_none() {
            state.api_key = store.get(KEY_API_KEY).filter(|v| !v.is_empty());
        }
        state
            .api_key
            .clone()
            .ok_or_else(|| KavitaError::configuration("must enter a valid api key"))
    }

    // ===== session lifecycle =====

    /// A stored session missing either token is treated as absent.
    fn stored_session(&self) -> Option<Session> {
        let raw = self.store.get(KEY_USER)?;
        serde_json::from_str::<TokenPairResponse>(&raw)
            .ok()
            .and_then(TokenPairResponse::into_session)
    }

    fn persist(&self, session: &Session) -> Result<()> {
        self.store.set(KEY_USER, &serde_json::to_string(session)?)
    }

    /// Credential exchange: the server authenticates purely via API key,
    /// so username and password are sent empty.
    async fn login(&self, site: &str, api_key: &str) -> Result<Session> {
        let body = serde_json::json!({
            "username": "",
            "password": "",
            "apiKey": api_key,
        });

        let response = self
            .http
            .post(format!("{site}api/Account/login"))
            .json(&body)
            .send()
            .await
            .map_err(|e| KavitaError::authentication(format!("login request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(KavitaError::authentication(format!(
                "login rejected with status {}",
                response.status()
            )));
        }

        let pair: TokenPairResponse = response
            .json()
            .await
            .map_err(|e| KavitaError::authentication(format!("malformed login response: {e}")))?;

        let session = pair
            .into_session()
            .ok_or_else(|| KavitaError::authentication("unable to log into kavita"))?;
        info!("logged in to kavita");
        Ok(session)
    }

    async fn refresh(&self, site: &str, session: &Session) -> Result<Session> {
        let body = serde_json::json!({
            "token": session.token,
            "refreshToken": session.refresh_token,
        });

        let response = self
            .http
            .post(format!("{site}api/Account/refresh-token"))
            .json(&body)
            .send()
            .await
            .map_err(|e| KavitaError::authentication(format!("refresh request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(KavitaError::authentication(format!(
                "token refresh rejected with status {}",
                response.status()
            )));
        }

        let pair: TokenPairResponse = response
            .json()
            .await
            .map_err(|e| KavitaError::authentication(format!("malformed refresh response: {e}")))?;

        let refreshed = pair
            .into_session()
            .ok_or_else(|| KavitaError::authentication("refresh returned a session without a token"))?;
        info!("refreshed kavita session token");
        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn missing_api_key_is_a_configuration_error() {
        let store = Arc::new(MemoryStore::new());
        store.set(KEY_URL, "http://kavita.local").unwrap();

        let manager = SessionManager::new(store);
        let err = manager.authorized_headers(None).await.unwrap_err();
        assert!(matches!(err, KavitaError::Configuration(_)));
    }

    #[tokio::test]
    async fn missing_url_is_a_configuration_error() {
        let manager = SessionManager::new(Arc::new(MemoryStore::new()));
        let err = manager.base_url().await.unwrap_err();
        assert!(matches!(err, KavitaError::Configuration(_)));
    }

    #[tokio::test]
    async fn unparseable_url_is_a_configuration_error() {
        for bad in ["", "kavita.local", "not a url"] {
            let store = Arc::new(MemoryStore::with_credentials(bad, "key"));
            let manager = SessionManager::new(store);
            let err = manager.base_url().await.unwrap_err();
            assert!(matches!(err, KavitaError::Configuration(_)), "for {bad:?}");
        }
    }

    #[tokio::test]
    async fn base_url_is_normalized_to_one_trailing_slash() {
        for configured in ["http://kavita.local", "http://kavita.local/", "http://kavita.local//"] {
            let store = Arc::new(MemoryStore::with_credentials(configured, "key"));
            let manager = SessionManager::new(store);
            assert_eq!(manager.base_url().await.unwrap(), "http://kavita.local/");
        }
    }

    #[test]
    fn partial_stored_session_is_treated_as_absent() {
        for raw in [
            r#"{}"#,
            r#"{"token":"only"}"#,
            r#"{"refreshToken":"only"}"#,
            r#"{"token":"","refreshToken":""}"#,
            "not json",
        ] {
            let store = Arc::new(MemoryStore::new());
            store.set(KEY_USER, raw).unwrap();
            let manager = SessionManager::new(store);
            assert!(manager.stored_session().is_none(), "for {raw:?}");
        }
    }

    #[test]
    fn complete_stored_session_is_loaded() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(KEY_USER, r#"{"token":"t","refreshToken":"r","username":"x"}"#)
            .unwrap();
        let manager = SessionManager::new(store);
        let session = manager.stored_session().unwrap();
        assert_eq!(session.token, "t");
        assert_eq!(session.refresh_token, "r");
    }
}
