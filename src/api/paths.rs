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

//! Composite path keys
//!
//! The host addresses novels and chapters through opaque `/`-separated
//! strings. A novel path carries three identifier segments; a chapter path
//! carries those plus the flattened chapter index and its inclusive page
//! range. Malformed paths fail fast with `InvalidPath` instead of
//! propagating missing segments into request URLs.

use crate::error::{KavitaError, Result};
use std::fmt;
use std::str::FromStr;

/// `"{libraryId}/{seriesId}/{chapterId}"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovelPath {
    pub library_id: String,
    pub series_id: String,
    pub chapter_id: String,
}

/// `"{libraryId}/{seriesId}/{chapterId}/{index}/{startPage}/{endPage}"`
///
/// Parsing guarantees `start_page <= end_page`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterPath {
    pub library_id: String,
    pub series_id: String,
    pub chapter_id: String,
    pub index: u32,
    pub start_page: u32,
    pub end_page: u32,
}

impl NovelPath {
    pub fn new(library_id: &str, series_id: &str, chapter_id: &str) -> Self {
        Self {
            library_id: library_id.to_string(),
            series_id: series_id.to_string(),
            chapter_id: chapter_id.to_string(),
        }
    }
}

impl FromStr for NovelPath {
    type Err = KavitaError;

    fn from_str(s: &str) -> Result<Self> {
        // Novel paths are a prefix of chapter paths, so extra segments are
        // accepted and ignored; fewer than three is malformed.
        let mut segments = s.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(lib), Some(series), Some(chapter))
                if !lib.is_empty() && !series.is_empty() && !chapter.is_empty() =>
            {
                Ok(Self::new(lib, series, chapter))
            }
            _ => Err(KavitaError::InvalidPath {
                path: s.to_string(),
                expected: "libraryId/seriesId/chapterId",
            }),
        }
    }
}

impl fmt::Display for NovelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.library_id, self.series_id, self.chapter_id)
    }
}

impl FromStr for ChapterPath {
    type Err = KavitaError;

    fn from_str(s: &str) -> Result<Self> {
        const EXPECTED: &str = "libraryId/seriesId/chapterId/index/startPage/endPage";
        let invalid = || KavitaError::InvalidPath {
            path: s.to_string(),
            expected: EXPECTED,
        };

        let segments: Vec<&str> = s.split('/').collect();
        let [lib, series, chapter, index, start, end] = segments[..] else {
            return Err(invalid());
        };
        if lib.is_empty() || series.is_empty() || chapter.is_empty() {
            return Err(invalid());
        }

        let start_page: u32 = start.parse().map_err(|_| invalid())?;
        let end_page: u32 = end.parse().map_err(|_| invalid())?;
        // The page range is inclusive; an inverted range addresses nothing.
        if end_page < start_page {
            return Err(invalid());
        }

        Ok(Self {
            library_id: lib.to_string(),
            series_id: series.to_string(),
            chapter_id: chapter.to_string(),
            index: index.parse().map_err(|_| invalid())?,
            start_page,
            end_page,
        })
    }
}

impl fmt::Display for ChapterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}/{}",
            self.library_id, self.series_id, self.chapter_id, self.index, self.start_page,
            self.end_page
        )
    }
}
