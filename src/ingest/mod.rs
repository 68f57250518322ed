//! Catalog ingestion
//!
//! Pages through a channel's uploads, fetches each video's full description,
//! and writes the catalog file the search tool reads.

pub mod youtube;

pub use youtube::YouTubeClient;

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::catalog::RawVideo;

/// Errors raised during ingestion
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    /// Video ids in result order
    pub video_ids: Vec<String>,
    pub next_page_token: Option<String>,
}

/// A remote listing of a channel's videos
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Fetch one page of search hits; `None` requests the first page
    async fn search_page(&self, page_token: Option<&str>) -> Result<SearchPage, IngestError>;

    /// Fetch the full record for one video, `None` when the API has no such video
    async fn video_details(&self, video_id: &str) -> Result<Option<RawVideo>, IngestError>;
}

/// Outcome of an ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Video ids returned by search
    pub requested: usize,
    /// Records written to the catalog file
    pub written: usize,
    /// Ids whose details could not be fetched
    pub skipped: usize,
}

/// Follow search pagination until no next page token is returned
pub async fn collect_video_ids<S: VideoSource + ?Sized>(source: &S) -> Result<Vec<String>, IngestError> {
    let mut ids = Vec::new();
    let mut seen_tokens = HashSet::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = source.search_page(page_token.as_deref()).await?;
        debug!("Search page returned {} videos", page.video_ids.len());
        ids.extend(page.video_ids);

        match page.next_page_token {
            Some(token) if seen_tokens.insert(token.clone()) => page_token = Some(token),
            Some(token) => {
                warn!("⚠️ Page token {} repeated, stopping pagination", token);
                break;
            }
            None => break,
        }
    }

    info!("🔍 Search returned {} videos", ids.len());
    Ok(ids)
}

/// Fetch details for every id concurrently, skipping failures
pub async fn fetch_details<S: VideoSource + ?Sized>(source: &S, ids: &[String]) -> Vec<RawVideo> {
    let results = join_all(ids.iter().map(|id| source.video_details(id))).await;

    ids.iter()
        .zip(results)
        .filter_map(|(id, result)| match result {
            Ok(Some(video)) => Some(video),
            Ok(None) => {
                warn!("⚠️ No details returned for video {}, skipping", id);
                None
            }
            Err(e) => {
                warn!("❌ Failed to fetch details for video {}: {}", id, e);
                None
            }
        })
        .collect()
}

/// Write the catalog file, creating parent directories as needed
pub async fn write_catalog(videos: &[RawVideo], output: &Path) -> Result<(), IngestError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string(videos)?;
    tokio::fs::write(output, json).await?;
    info!("💾 Wrote {} videos to {}", videos.len(), output.display());
    Ok(())
}

/// Run a full ingestion into `output`
pub async fn run_ingest<S: VideoSource + ?Sized>(source: &S, output: &Path) -> Result<IngestReport, IngestError> {
    let ids = collect_video_ids(source).await?;
    let videos = fetch_details(source, &ids).await;
    write_catalog(&videos, output).await?;

    Ok(IngestReport {
        requested: ids.len(),
        written: videos.len(),
        skipped: ids.len() - videos.len(),
    })
}
