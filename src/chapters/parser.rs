/// Extraction of timestamped chapter lines from free-text descriptions
use super::{deep_link, Chapter, ParseError};
use regex::Regex;
use tracing::debug;

/// Line-leading `H:MM:SS` or `MM:SS` label, whitespace, optional dash, title.
const CHAPTER_LINE_PATTERN: &str =
    r"(?m)^[ \t]*(?P<time>\d:\d{2}:\d{2}|\d{1,2}:\d{2})[ \t]+(?:-[ \t]*)?(?P<title>[^\r\n]*)";

/// A chapter found in description text, not yet attached to a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterMark {
    pub time_label: String,
    pub title: String,
    pub offset_seconds: u64,
}

impl ChapterMark {
    /// Attach this mark to a video, producing a full chapter with deep link
    pub fn into_chapter(self, video_link: &str) -> Chapter {
        let deep_link = deep_link(video_link, self.offset_seconds);
        Chapter {
            time_label: self.time_label,
            title: self.title,
            offset_seconds: self.offset_seconds,
            deep_link,
            match_score: None,
        }
    }
}

/// Chapter parser holding the compiled line pattern.
///
/// The pattern is immutable, so one parser can be shared across any number
/// of calls; every call scans its input from the start.
#[derive(Debug, Clone)]
pub struct ChapterParser {
    pattern: Regex,
}

impl ChapterParser {
    /// Create a new chapter parser
    pub fn new() -> Result<Self, ParseError> {
        let pattern =
            Regex::new(CHAPTER_LINE_PATTERN).map_err(|e| ParseError::Pattern(e.to_string()))?;
        Ok(Self { pattern })
    }

    /// Parse every chapter line of a description, in order of appearance
    pub fn parse(&self, description: &str) -> Result<Vec<ChapterMark>, ParseError> {
        let mut marks = Vec::new();

        for captures in self.pattern.captures_iter(description) {
            let (Some(time), Some(title)) = (captures.name("time"), captures.name("title")) else {
                continue;
            };

            let time_label = time.as_str().to_string();
            let offset_seconds = parse_time_label(&time_label)?;

            marks.push(ChapterMark {
                time_label,
                title: title.as_str().trim_end().to_string(),
                offset_seconds,
            });
        }

        debug!("Parsed {} chapter lines", marks.len());
        Ok(marks)
    }
}

/// Parse a description with a freshly built parser
pub fn parse_description(description: &str) -> Result<Vec<ChapterMark>, ParseError> {
    ChapterParser::new()?.parse(description)
}

/// Convert a time label into seconds.
///
/// Labels longer than five characters are read as `H:MM:SS`, anything else
/// as `MM:SS`.
pub fn parse_time_label(label: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidTimeLabel(label.to_string());

    let parts = label
        .split(':')
        .map(|part| part.parse::<u64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;

    let (hours, minutes, seconds) = match (label.len() > 5, parts.as_slice()) {
        (true, [hours, minutes, seconds]) => (*hours, *minutes, *seconds),
        (false, [minutes, seconds]) => (0, *minutes, *seconds),
        _ => return Err(invalid()),
    };

    hours
        .checked_mul(3600)
        .and_then(|total| total.checked_add(minutes.checked_mul(60)?))
        .and_then(|total| total.checked_add(seconds))
        .ok_or_else(invalid)
}
