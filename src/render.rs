//! Plain-text rendering of search results

use crate::catalog::Video;

/// Line printed when a query matches nothing
pub const NO_RESULTS: &str = "No results.";

/// Render videos and their chapters, one chapter per line
pub fn render_results(videos: &[Video]) -> String {
    if videos.is_empty() {
        return format!("{}\n", NO_RESULTS);
    }

    let mut out = String::new();
    for video in videos {
        out.push_str(&format!("{}  {}\n", video.title, video.link));
        for chapter in &video.chapters {
            out.push_str(&format!(
                "    {} {}  {}",
                chapter.time_label, chapter.title, chapter.deep_link
            ));
            if let Some(score) = chapter.match_score {
                out.push_str(&format!("  ({:.2})", score));
            }
            out.push('\n');
        }
    }
    out
}
