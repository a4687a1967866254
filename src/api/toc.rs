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

//! Table-of-contents flattening
//!
//! Kavita describes an EPUB's structure as a nested tree of TOC entries,
//! each carrying only its start page. The reader host wants a flat list of
//! chapters with explicit inclusive page ranges. This module reconstructs
//! each node's end page from its next sibling's start page (or the parent
//! range's end for the last sibling) and emits one entry per leaf, in
//! pre-order.
//!
//! Siblings are trusted to arrive pre-sorted by ascending start page; they
//! are deliberately NOT re-sorted. If the server ever violates that order
//! the computed ranges will be wrong; re-sorting here would silently change
//! which pages each chapter covers, so the trust is kept explicit instead.

use serde::Deserialize;

/// One node of the server-side TOC tree
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookChapter {
    pub title: String,
    #[serde(default)]
    pub part: Option<String>,
    /// Start page offset of this entry
    pub page: u32,
    #[serde(default)]
    pub children: Vec<BookChapter>,
}

/// A flattened leaf chapter with its reconstructed inclusive page range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatChapterRef {
    pub name: String,
    /// Sequential leaf number, continuous across nesting levels
    pub index: u32,
    pub start_page: u32,
    /// Inclusive; content fetch sums pages `start_page..=end_page`
    pub end_page: u32,
}

/// Flatten a TOC sibling list into leaf chapters, numbering leaves from
/// `start_index`. `range_end` is the last page the parent range covers; the
/// range's start is implied by the first sibling's own start page.
///
/// Pre-order recursive descent: an intermediate node contributes no entry of
/// its own, only its leaves; the leaf counter advances once per emitted
/// entry so indices stay continuous across sibling and depth boundaries.
pub fn flatten_chapters(
    nodes: &[BookChapter],
    range_end: u32,
    start_index: u32,
) -> Vec<FlatChapterRef> {
    let mut out = Vec::new();
    let mut index = start_index;

    for (i, node) in nodes.iter().enumerate() {
        let end_page = match nodes.get(i + 1) {
            Some(next) => next.page.saturating_sub(1),
            None => range_end,
        };

        if !node.children.is_empty() {
            let nested = flatten_chapters(&node.children, end_page, index);
            index += nested.len() as u32;
            out.extend(nested);
            continue;
        }

        out.push(FlatChapterRef {
            name: node.title.clone(),
            index,
            start_page: node.page,
            end_page,
        });
        index += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(title: &str, page: u32) -> BookChapter {
        BookChapter {
            title: title.to_string(),
            part: None,
            page,
            children: Vec::new(),
        }
    }

    fn parent(title: &str, page: u32, children: Vec<BookChapter>) -> BookChapter {
        BookChapter {
            title: title.to_string(),
            part: None,
            page,
            children,
        }
    }

    #[test]
    fn flat_list_partitions_the_range() {
        let nodes = vec![leaf("A", 0), leaf("B", 10)];
        let flat = flatten_chapters(&nodes, 20, 0);
        assert_eq!(
            flat,
            vec![
                FlatChapterRef {
                    name: "A".into(),
                    index: 0,
                    start_page: 0,
                    end_page: 9
                },
                FlatChapterRef {
                    name: "B".into(),
                    index: 1,
                    start_page: 10,
                    end_page: 20
                },
            ]
        );
    }

    #[test]
    fn parent_nodes_emit_no_entry() {
        let nodes = vec![parent("Part I", 0, vec![leaf("One", 0), leaf("Two", 5)])];
        let flat = flatten_chapters(&nodes, 12, 0);

        assert_eq!(flat.len(), 2);
        assert!(flat.iter().all(|c| c.name != "Part I"));
        assert_eq!(flat[0].index, 0);
        assert_eq!(flat[1].index, 1);
        // Last child inherits the parent's end boundary.
        assert_eq!(flat[1].end_page, 12);
    }

    #[test]
    fn index_is_continuous_across_sibling_boundaries() {
        let nodes = vec![
            parent("Part I", 0, vec![leaf("One", 0), leaf("Two", 4)]),
            leaf("Interlude", 8),
            parent("Part II", 12, vec![leaf("Three", 12)]),
        ];
        let flat = flatten_chapters(&nodes, 30, 0);

        let indices: Vec<u32> = flat.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        let names: Vec<&str> = flat.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two", "Interlude", "Three"]);
    }

    #[test]
    fn nested_parent_boundary_comes_from_next_top_level_sibling() {
        let nodes = vec![
            parent("Part I", 0, vec![leaf("One", 0), leaf("Two", 5)]),
            leaf("Epilogue", 9),
        ];
        let flat = flatten_chapters(&nodes, 20, 0);

        // "Two" is the last child of Part I, whose range ends just before
        // "Epilogue" starts.
        assert_eq!(flat[1].name, "Two");
        assert_eq!(flat[1].end_page, 8);
        assert_eq!(flat[2].start_page, 9);
        assert_eq!(flat[2].end_page, 20);
    }

    #[test]
    fn start_index_seeds_the_counter() {
        let nodes = vec![leaf("A", 0), leaf("B", 3)];
        let flat = flatten_chapters(&nodes, 5, 7);
        assert_eq!(flat[0].index, 7);
        assert_eq!(flat[1].index, 8);
    }

    #[test]
    fn deep_nesting_keeps_ranges_exact() {
        let nodes = vec![parent(
            "Book",
            0,
            vec![
                parent("Part", 0, vec![leaf("1.1", 0), leaf("1.2", 2)]),
                leaf("2", 6),
            ],
        )];
        let flat = flatten_chapters(&nodes, 10, 0);

        assert_eq!(flat.len(), 3);
        // 1.2 ends where its grandparent-level boundary says the Part does.
        assert_eq!(flat[1].name, "1.2");
        assert_eq!(flat[1].end_page, 5);
        assert_eq!(flat[2].start_page, 6);
        assert_eq!(flat[2].end_page, 10);
    }
}
