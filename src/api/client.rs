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

//! The Kavita API client
//!
//! Thin orchestration layer over [`SessionManager`] exposing the five
//! operations of the host plugin contract: list, search, get-detail,
//! get-content and resolve-display-url. Each operation runs as one
//! sequential chain of requests with no internal parallelism; any transport
//! failure terminates the call immediately.
//!
//! # Endpoints
//! - `POST api/series/all-v2?pageNumber=N&pageSize=20`: filtered series page
//! - `GET  api/series/series-detail?seriesId=..`: volumes and chapters
//! - `GET  api/Chapter?chapterId=..`: chapter (book) metadata
//! - `GET  api/Book/{id}/chapters`: nested table of contents
//! - `GET  api/Book/{id}/book-page?page=P`: one page of text
//! - `GET  api/Image/chapter-cover?chapterId=..&apiKey=..`: cover image

use crate::api::filters::SeriesFilter;
use crate::api::models::{ChapterDetail, Series, SeriesDetail};
use crate::api::paths::{ChapterPath, NovelPath};
use crate::api::session::SessionManager;
use crate::api::toc::{flatten_chapters, BookChapter};
use crate::error::{KavitaError, Result};
use crate::host::{ChapterItem, NovelItem, SourceNovel};
use crate::storage::KeyValueStore;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Series page size sent with every listing/search request
const PAGE_SIZE: u32 = 20;

/// Client for one configured Kavita server
pub struct KavitaClient {
    http: reqwest::Client,
    session: SessionManager,
}

impl KavitaClient {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let http = reqwest::Client::new();
        let session = SessionManager::with_http(http.clone(), store);
        Self { http, session }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    // ===== host operations =====

    /// List EPUB chapters, newest series sort, page `page_no`
    pub async fn list(&self, page_no: u32) -> Result<Vec<NovelItem>> {
        self.novels_by_filter(&SeriesFilter::epub_only(), page_no)
            .await
    }

    /// Search for EPUB chapters whose series name matches `term`
    pub async fn search(&self, term: &str, page_no: u32) -> Result<Vec<NovelItem>> {
        self.novels_by_filter(&SeriesFilter::epub_matching(term), page_no)
            .await
    }

    /// Fetch full metadata and the flattened chapter list for one novel
    pub async fn get_detail(&self, path: &str) -> Result<SourceNovel> {
        let novel_path: NovelPath = path.parse()?;
        let site = self.session.base_url().await?;
        let api_key = self.session.api_key().await?;

        let detail: ChapterDetail = self
            .get_json(
                &format!("{site}api/Chapter?chapterId={}", novel_path.chapter_id),
                "novel",
            )
            .await?;

        let toc: Vec<BookChapter> = self
            .get_json(&format!("{site}api/Book/{}/chapters", detail.id), "novel chapters")
            .await?;

        let chapters = flatten_chapters(&toc, detail.pages, 0)
            .into_iter()
            .map(|leaf| ChapterItem {
                name: leaf.name,
                path: format!(
                    "{}/{}/{}/{}/{}/{}",
                    novel_path.library_id,
                    novel_path.series_id,
                    novel_path.chapter_id,
                    leaf.index,
                    leaf.start_page,
                    leaf.end_page
                ),
                release_time: detail.release_date.clone(),
                chapter_number: leaf.index,
            })
            .collect();

        Ok(SourceNovel {
            path: path.to_string(),
            name: detail.title_name.clone(),
            artist: ChapterDetail::joined_names(&detail.cover_artists),
            author: ChapterDetail::joined_names(&detail.writers),
            cover: Some(cover_url(&site, detail.id, &api_key)),
            genres: detail.joined_genres(),
            status: detail.novel_status(),
            summary: detail.summary.clone(),
            chapters,
        })
    }

    /// Fetch and concatenate the text of pages `start..=end` of a chapter,
    /// ascending, with no separator between pages
    pub async fn get_content(&self, path: &str) -> Result<String> {
        let chapter_path: ChapterPath = path.parse()?;
        let site = self.session.base_url().await?;

        let mut text = String::new();
        for page in chapter_path.start_page..=chapter_path.end_page {
            let url = format!(
                "{site}api/Book/{}/book-page?page={page}",
                chapter_path.chapter_id
            );
            let headers = self.session.authorized_headers(None).await?;
            let response = self.http.get(&url).headers(headers).send().await?;

            if !response.status().is_success() {
                return Err(KavitaError::api_failed(
                    format!("book page request failed with status {}", response.status()),
                    Some(response.status().as_u16()),
                    Some(url),
                ));
            }

            let page_text = response
                .text()
                .await
                .map_err(|e| KavitaError::parse("chapter", e.to_string()))?;
            text.push_str(&page_text);
        }

        let pages = (chapter_path.end_page - chapter_path.start_page).saturating_add(1);
        debug!(pages, "fetched chapter text");
        Ok(text)
    }

    /// Build the browser-facing URL for a novel or chapter path
    pub async fn resolve_display_url(&self, path: &str, _is_novel: bool) -> Result<String> {
        // Chapter paths are a superset of novel paths; the display URL uses
        // only the three identifier segments either way.
        let novel_path: NovelPath = path.parse()?;
        let site = self.session.base_url().await?;
        Ok(format!(
            "{site}library/{}/series/{}/chapter/{}",
            novel_path.library_id, novel_path.series_id, novel_path.chapter_id
        ))
    }

    // ===== internals =====

    /// Post a series filter and expand every matching series into one
    /// NovelItem per chapter of every volume
    async fn novels_by_filter(&self, filter: &SeriesFilter, page_no: u32) -> Result<Vec<NovelItem>> {
        let site = self.session.base_url().await?;
        let api_key = self.session.api_key().await?;

        let url = format!("{site}api/series/all-v2?pageNumber={page_no}&pageSize={PAGE_SIZE}");
        let headers = self.session.authorized_headers(None).await?;
        let response = self
            .http
            .post(&url)
            .headers(headers)
            .json(filter)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(KavitaError::api_failed(
                format!("series query failed with status {}", response.status()),
                Some(response.status().as_u16()),
                Some(url),
            ));
        }

        let series: Vec<Series> = response
            .json()
            .await
            .map_err(|e| KavitaError::parse("novel series", e.to_string()))?;

        let mut novels = Vec::new();
        for item in &series {
            let detail: SeriesDetail = self
                .get_json(
                    &format!("{site}api/series/series-detail?seriesId={}", item.id),
                    "novel series detail",
                )
                .await?;

            for volume in &detail.volumes {
                for chapter in &volume.chapters {
                    novels.push(NovelItem {
                        name: chapter.title_name.clone(),
                        path: format!("{}/{}/{}", item.library_id, item.id, chapter.id),
                        cover: cover_url(&site, chapter.id, &api_key),
                    });
                }
            }
        }

        debug!(series = series.len(), novels = novels.len(), page = page_no, "listed novels");
        Ok(novels)
    }

    /// Authorized GET returning JSON; parse failures name `stage`
    async fn get_json<T: DeserializeOwned>(&self, url: &str, stage: &str) -> Result<T> {
        let headers = self.session.authorized_headers(None).await?;
        let response = self.http.get(url).headers(headers).send().await?;

        if !response.status().is_success() {
            return Err(KavitaError::api_failed(
                format!("request failed with status {}", response.status()),
                Some(response.status().as_u16()),
                Some(url.to_string()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| KavitaError::parse(stage, e.to_string()))
    }
}

/// Cover-image URL with the API key as a query parameter; image loaders
/// usually cannot attach custom headers, so the key rides in the URL.
fn cover_url(site: &str, chapter_id: i64, api_key: &str) -> String {
    format!("{site}api/Image/chapter-cover?chapterId={chapter_id}&apiKey={api_key}")
}
