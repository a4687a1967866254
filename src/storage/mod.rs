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

//! Persistent key-value storage for adapter settings and the cached session
//!
//! The adapter stores exactly three keys: the server URL, the API key, and
//! the serialized session (`token` + `refreshToken`). Hosts that provide
//! their own settings storage can implement [`KeyValueStore`] over it;
//! [`FileStore`] persists the map as a single JSON document on disk and
//! [`MemoryStore`] backs tests and throwaway sessions.

use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage key for the configured server URL
pub const KEY_URL: &str = "url";
/// Storage key for the configured API key
pub const KEY_API_KEY: &str = "apiKey";
/// Storage key for the cached session (JSON-serialized token pair)
pub const KEY_USER: &str = "user";

/// String key-value storage contract
///
/// Implementations must be safe to share across threads; callers hold the
/// store behind an `Arc`. Values are opaque strings; structured values
/// (the session) are JSON-serialized by the caller.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never set
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, overwriting any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store for tests and hosts without persistence
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor with url and apiKey pre-seeded
    pub fn with_credentials(url: &str, api_key: &str) -> Self {
        let store = Self::new();
        {
            let mut values = store.values.lock().expect("store mutex poisoned");
            values.insert(KEY_URL.to_string(), url.to_string());
            values.insert(KEY_API_KEY.to_string(), api_key.to_string());
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store holding the whole map as one JSON object
///
/// Every `set` rewrites the file; with three keys and call rates measured
/// in logins per session that is not a bottleneck. Reads are served from
/// the in-memory copy loaded at construction.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading existing values if the file exists.
    /// A missing file is an empty store; it is created on first `set`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn persist(&self, values: &HashMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().expect("store mutex poisoned");
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }
}
