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

//! Host plugin contract
//!
//! Data shapes fixed by the reader host, not designed here. The adapter
//! produces these; the host renders them. Field names follow the host's
//! wire convention (camelCase).

use serde::{Deserialize, Serialize};

/// One entry in a listing or search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelItem {
    pub name: String,
    /// Composite key `"{libraryId}/{seriesId}/{chapterId}"`
    pub path: String,
    /// Cover image URL; authenticates via `apiKey` query parameter because
    /// image loaders usually cannot attach custom headers
    pub cover: String,
}

/// One readable chapter of a novel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterItem {
    pub name: String,
    /// Composite key `"{libraryId}/{seriesId}/{chapterId}/{index}/{startPage}/{endPage}"`
    pub path: String,
    pub release_time: Option<String>,
    pub chapter_number: u32,
}

/// Full novel metadata plus its chapter list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNovel {
    pub path: String,
    pub name: String,
    pub artist: Option<String>,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub genres: Option<String>,
    pub status: NovelStatus,
    pub summary: Option<String>,
    pub chapters: Vec<ChapterItem>,
}

/// Publication status vocabulary understood by the host
///
/// Wire form matches [`NovelStatus::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NovelStatus {
    Ongoing,
    Completed,
    #[serde(rename = "On Hiatus")]
    OnHiatus,
    Cancelled,
    #[serde(rename = "Publishing Finished")]
    PublishingFinished,
    Unknown,
}

impl NovelStatus {
    /// Host-facing display string
    pub fn as_str(&self) -> &'static str {
        match self {
            NovelStatus::Ongoing => "Ongoing",
            NovelStatus::Completed => "Completed",
            NovelStatus::OnHiatus => "On Hiatus",
            NovelStatus::Cancelled => "Cancelled",
            NovelStatus::PublishingFinished => "Publishing Finished",
            NovelStatus::Unknown => "Unknown",
        }
    }
}

/// One user-editable setting exposed to the host settings UI
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingField {
    pub key: &'static str,
    pub label: &'static str,
    /// Field widget type; this adapter only uses plain text inputs
    pub field_type: &'static str,
}

/// The adapter's static settings schema: server URL and API key
pub fn settings_schema() -> [SettingField; 2] {
    [
        SettingField {
            key: "url",
            label: "URL",
            field_type: "Text",
        },
        SettingField {
            key: "apiKey",
            label: "Api Key",
            field_type: "Text",
        },
    ]
}
