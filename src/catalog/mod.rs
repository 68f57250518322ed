//! Video catalog: raw ingested records and the in-memory videos built from them

pub mod loader;

pub use loader::{CatalogLoader, CatalogSource};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chapters::{Chapter, ChapterParser, ParseError};

/// Canonical viewing link prefix; a video's link is this plus its id
pub const DEFAULT_VIDEO_LINK_PREFIX: &str = "https://youtu.be/";

/// Errors raised while loading the catalog
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog request returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid catalog source: {0}")]
    InvalidSource(String),

    #[error("Chapter parsing failed: {0}")]
    Parse(#[from] ParseError),
}

/// One record of the catalog file, as written by ingestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawVideo {
    pub id: String,
    pub published_at: String,
    pub title: String,
    pub description: String,
}

/// A catalog entry with its parsed chapters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Stable external identifier
    pub id: String,
    /// Publication timestamp, display only
    pub published_at: String,
    pub title: String,
    pub description: String,
    /// Canonical viewing link
    pub link: String,
    /// Chapters in order of appearance in the description
    pub chapters: Vec<Chapter>,
    /// Relevance score, only set on videos in a filtered result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Video {
    /// Build a video from a raw record, parsing its chapters
    pub fn from_raw(
        raw: &RawVideo,
        parser: &ChapterParser,
        link_prefix: &str,
    ) -> Result<Self, ParseError> {
        let link = format!("{}{}", link_prefix, raw.id);
        let chapters = parser
            .parse(&raw.description)?
            .into_iter()
            .map(|mark| mark.into_chapter(&link))
            .collect();

        Ok(Self {
            id: raw.id.clone(),
            published_at: raw.published_at.clone(),
            title: raw.title.clone(),
            description: raw.description.clone(),
            link,
            chapters,
            score: None,
        })
    }
}

/// Build the in-memory catalog, preserving input order
pub fn load(raw_items: &[RawVideo], link_prefix: &str) -> Result<Vec<Video>, LoadError> {
    let parser = ChapterParser::new()?;

    let videos = raw_items
        .iter()
        .map(|raw| Video::from_raw(raw, &parser, link_prefix))
        .collect::<Result<Vec<_>, _>>()?;

    let chapter_count: usize = videos.iter().map(|v| v.chapters.len()).sum();
    info!("📚 Loaded {} videos with {} chapters", videos.len(), chapter_count);

    Ok(videos)
}
