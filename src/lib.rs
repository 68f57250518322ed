/// Chapter Search
///
/// Extracts timestamped chapters from video descriptions and searches them
/// with combined substring and fuzzy matching.

pub mod chapters;
pub mod catalog;
pub mod search;
pub mod ingest;
pub mod config;
pub mod render;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::config::Config;
pub use crate::chapters::{Chapter, ChapterParser, ParseError};
pub use crate::catalog::{CatalogLoader, CatalogSource, LoadError, RawVideo, Video};
pub use crate::search::{filter, FuzzyMatcher, QueryFilter};
pub use crate::ingest::{run_ingest, IngestError, IngestReport, VideoSource, YouTubeClient};
pub use crate::render::render_results;
