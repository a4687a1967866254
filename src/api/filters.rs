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

//! Series filter wire model
//!
//! Kavita's `POST api/series/all-v2` takes a filter document whose
//! comparison and field discriminators are numeric on the wire. Only the
//! handful of values this adapter sends are modeled; the enums carry their
//! wire discriminants directly.

use serde::Serialize;

/// How a statement compares its field against its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i32")]
pub enum FilterComparison {
    Contains = 5,
    Matches = 7,
}

impl From<FilterComparison> for i32 {
    fn from(c: FilterComparison) -> i32 {
        c as i32
    }
}

/// Which series attribute a statement filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i32")]
pub enum FilterField {
    SeriesName = 1,
    Formats = 21,
}

impl From<FilterField> for i32 {
    fn from(f: FilterField) -> i32 {
        f as i32
    }
}

/// Media formats; values are string-encoded numbers on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Image,
    Archive,
    Unknown,
    Epub,
    Pdf,
}

impl MediaFormat {
    pub fn wire_value(&self) -> &'static str {
        match self {
            MediaFormat::Image => "0",
            MediaFormat::Archive => "1",
            MediaFormat::Unknown => "2",
            MediaFormat::Epub => "3",
            MediaFormat::Pdf => "4",
        }
    }
}

/// One filter predicate
#[derive(Debug, Clone, Serialize)]
pub struct FilterStatement {
    pub comparison: FilterComparison,
    pub field: FilterField,
    pub value: String,
}

/// Sort specification; field 1 is the series sort name
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOptions {
    pub sort_field: i32,
    pub is_ascending: bool,
}

/// Filter document for `api/series/all-v2`
///
/// `combinations: 1` ANDs the statements together; `limit_to: 0` means no
/// server-side cap beyond the page size.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesFilter {
    pub id: i32,
    pub name: String,
    pub statements: Vec<FilterStatement>,
    pub combinations: i32,
    pub sort_options: SortOptions,
    pub limit_to: i32,
}

impl SeriesFilter {
    fn base(statements: Vec<FilterStatement>) -> Self {
        Self {
            id: 0,
            name: String::new(),
            statements,
            combinations: 1,
            sort_options: SortOptions {
                sort_field: 1,
                is_ascending: true,
            },
            limit_to: 0,
        }
    }

    /// Default browse filter: series whose formats contain EPUB
    pub fn epub_only() -> Self {
        Self::base(vec![FilterStatement {
            comparison: FilterComparison::Contains,
            field: FilterField::Formats,
            value: MediaFormat::Epub.wire_value().to_string(),
        }])
    }

    /// Search filter: EPUB format AND series name matching `term`
    pub fn epub_matching(term: &str) -> Self {
        let mut filter = Self::epub_only();
        filter.statements.push(FilterStatement {
            comparison: FilterComparison::Matches,
            field: FilterField::SeriesName,
            value: term.to_string(),
        });
        filter
    }
}
