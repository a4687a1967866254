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

//! Kavita API layer
//!
//! Session management, wire models and the client implementing the host
//! plugin operations against a Kavita server's REST API.

pub mod client;
pub mod filters;
pub mod models;
pub mod paths;
pub mod session;
pub mod toc;
pub mod token;

// Re-export commonly used types
pub use client::KavitaClient;
pub use paths::{ChapterPath, NovelPath};
pub use session::{Session, SessionManager};
pub use toc::{flatten_chapters, BookChapter, FlatChapterRef};
pub use token::decode_expiry;
