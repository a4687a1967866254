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

//! Kavita content-source adapter
//!
//! Translates a self-hosted Kavita media-library server's REST API into the
//! fixed operation set of a reader host's plugin contract: list items,
//! search items, fetch item metadata, fetch item content, resolve a display
//! URL.
//!
//! Two pieces carry the interesting state and logic:
//! - [`api::SessionManager`] handles API-key login, bearer-token caching,
//!   expiry detection from the token's `exp` claim, and transparent refresh,
//!   with the session persisted through an injected
//!   [`storage::KeyValueStore`].
//! - [`api::flatten_chapters`] converts Kavita's nested table-of-contents
//!   tree (start-page offsets only) into the flat, inclusive-page-range
//!   chapter list the host's linear chapter model expects.
//!
//! Everything else is a thin, sequential REST client: no retries, no
//! caching, no internal concurrency.
//!
//! ```no_run
//! use std::sync::Arc;
//! use kavita_source::api::KavitaClient;
//! use kavita_source::storage::MemoryStore;
//!
//! # async fn example() -> kavita_source::error::Result<()> {
//! let store = Arc::new(MemoryStore::with_credentials(
//!     "http://kavita.local:5000",
//!     "my-api-key",
//! ));
//! let client = KavitaClient::new(store);
//!
//! let novels = client.list(1).await?;
//! let detail = client.get_detail(&novels[0].path).await?;
//! let text = client.get_content(&detail.chapters[0].path).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod host;
pub mod storage;

pub use api::KavitaClient;
pub use error::{KavitaError, Result};
