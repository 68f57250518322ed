//! Chapter records and description parsing
//!
//! Chapters are the timestamped lines creators put in a video description
//! ("1:30 - Setup"). This module turns them into structured records that
//! carry an absolute offset and a deep link into the video.

pub mod parser;

pub use parser::{parse_description, parse_time_label, ChapterMark, ChapterParser};

use serde::{Deserialize, Serialize};

/// Errors raised while extracting chapters from description text
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid time label: {0}")]
    InvalidTimeLabel(String),

    #[error("Chapter pattern failed to compile: {0}")]
    Pattern(String),
}

/// Represents a single timestamped chapter of a video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Time label exactly as written in the description (`H:MM:SS` or `MM:SS`)
    pub time_label: String,
    /// Text following the time label and optional dash
    pub title: String,
    /// Offset from the start of the video in seconds
    pub offset_seconds: u64,
    /// Video link with a `?t=<offset>s` parameter
    pub deep_link: String,
    /// Fuzzy distance in [0, 1], only set on chapters in a filtered result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
}

impl Chapter {
    /// Copy of this chapter carrying a match score
    pub fn with_score(&self, score: f64) -> Self {
        Self {
            match_score: Some(score),
            ..self.clone()
        }
    }
}

/// Build a deep link for an offset into a video
pub fn deep_link(video_link: &str, offset_seconds: u64) -> String {
    format!("{}?t={}s", video_link, offset_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_link_format() {
        assert_eq!(deep_link("https://youtu.be/abc", 90), "https://youtu.be/abc?t=90s");
        assert_eq!(deep_link("https://youtu.be/abc", 0), "https://youtu.be/abc?t=0s");
    }

    #[test]
    fn test_chapter_serializes_camel_case_without_score() {
        let chapter = Chapter {
            time_label: "1:30".to_string(),
            title: "Setup".to_string(),
            offset_seconds: 90,
            deep_link: "https://youtu.be/abc?t=90s".to_string(),
            match_score: None,
        };

        let json = serde_json::to_value(&chapter).unwrap();
        assert_eq!(json["timeLabel"], "1:30");
        assert_eq!(json["offsetSeconds"], 90);
        assert_eq!(json["deepLink"], "https://youtu.be/abc?t=90s");
        assert!(json.get("matchScore").is_none());

        let scored = chapter.with_score(0.25);
        assert_eq!(scored.match_score, Some(0.25));
        assert_eq!(scored.title, chapter.title);
    }
}
