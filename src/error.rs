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

//! Error types for the Kavita adapter
//!
//! Errors are defined with thiserror and categorized by the stage of a call
//! that failed (configuration, authentication, parsing, transport). No error
//! in this crate is retried: every failure is a terminal rejection of the
//! single in-flight operation, surfaced to the host's own error channel.

use thiserror::Error;

/// Result type alias using our KavitaError type
pub type Result<T> = std::result::Result<T, KavitaError>;

/// Main error type for the adapter
#[derive(Error, Debug)]
pub enum KavitaError {
    // ===== Configuration =====

    /// Server URL or API key missing from settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ===== Authentication =====

    /// Login or refresh rejected by the server, or the returned session
    /// was missing a token
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ===== Parsing =====

    /// A response body or token could not be decoded; `stage` names the
    /// failed step in user-readable form (e.g. "novel series")
    #[error("Failed to load {stage} from kavita: {message}")]
    Parse { stage: String, message: String },

    /// Composite path key with the wrong shape
    #[error("Invalid path '{path}': expected {expected}")]
    InvalidPath { path: String, expected: &'static str },

    // ===== Transport =====

    /// Server answered with a non-success status
    #[error("API request failed: {message}")]
    ApiRequestFailed {
        message: String,
        /// HTTP status code if available
        status_code: Option<u16>,
        /// API endpoint that failed
        endpoint: Option<String>,
    },

    // ===== External library errors =====

    /// HTTP client error from reqwest
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Standard I/O error (session store)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper methods for creating common errors
impl KavitaError {
    /// Create a Configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        KavitaError::Configuration(message.into())
    }

    /// Create an Authentication error
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        KavitaError::Authentication {
            message: message.into(),
        }
    }

    /// Create a Parse error naming the failed stage
    pub fn parse<S: Into<String>, M: Into<String>>(stage: S, message: M) -> Self {
        KavitaError::Parse {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Create an ApiRequestFailed error
    pub fn api_failed<S: Into<String>>(
        message: S,
        status_code: Option<u16>,
        endpoint: Option<String>,
    ) -> Self {
        KavitaError::ApiRequestFailed {
            message: message.into(),
            status_code,
            endpoint,
        }
    }

    /// Check if the error means the user must fix their settings or
    /// credentials before any call can succeed
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            KavitaError::Configuration(_) | KavitaError::Authentication { .. }
        )
    }
}
