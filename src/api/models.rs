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

//! Kavita REST response models
//!
//! Only the fields this adapter reads are modeled; Kavita's payloads carry
//! dozens more, which serde ignores. Optional collections default to empty
//! so older servers that omit them deserialize cleanly.

use crate::host::NovelStatus;
use serde::Deserialize;

/// One series row from `POST api/series/all-v2`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: i64,
    pub name: String,
    pub library_id: i64,
    #[serde(default)]
    pub pages: u32,
}

/// `GET api/series/series-detail?seriesId=..`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDetail {
    #[serde(default)]
    pub volumes: Vec<VolumeDetail>,
}

/// One volume within a series detail
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeDetail {
    pub id: i64,
    #[serde(default)]
    pub chapters: Vec<ChapterDetail>,
}

/// Chapter metadata, returned both inside series detail and from
/// `GET api/Chapter?chapterId=..`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDetail {
    pub id: i64,
    #[serde(default)]
    pub title_name: String,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub publication_status: Option<i32>,
    #[serde(default)]
    pub writers: Vec<Person>,
    #[serde(default)]
    pub cover_artists: Vec<Person>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Contributor (writer, cover artist, ...)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub name: Option<String>,
}

/// Genre tag
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub title: String,
}

impl ChapterDetail {
    /// Comma-joined non-empty contributor names, `None` when there are none
    pub fn joined_names(people: &[Person]) -> Option<String> {
        let joined = people
            .iter()
            .filter_map(|p| p.name.as_deref())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        (!joined.is_empty()).then_some(joined)
    }

    /// Comma-joined genre titles, `None` when there are none
    pub fn joined_genres(&self) -> Option<String> {
        let joined = self
            .genres
            .iter()
            .map(|g| g.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        (!joined.is_empty()).then_some(joined)
    }

    /// Map Kavita's numeric publication status onto the host vocabulary
    pub fn novel_status(&self) -> NovelStatus {
        match self.publication_status {
            Some(0) => NovelStatus::Ongoing,
            Some(1) => NovelStatus::OnHiatus,
            Some(2) => NovelStatus::Completed,
            Some(3) => NovelStatus::Cancelled,
            Some(4) => NovelStatus::PublishingFinished,
            _ => NovelStatus::Unknown,
        }
    }
}
