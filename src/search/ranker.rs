/// Query filtering and ranking over the whole catalog
use super::fuzzy::FuzzyMatcher;
use crate::catalog::Video;
use crate::chapters::Chapter;
use std::collections::HashSet;
use tracing::debug;

/// Score given to a video with at least one literal (substring) match.
///
/// Lower scores rank higher, and fuzzy scores never go below 0.0.
pub const LITERAL_MATCH_SCORE: f64 = -1.0;

/// Filters a catalog down to the videos and chapters matching a query
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryFilter {
    matcher: FuzzyMatcher,
}

impl QueryFilter {
    pub fn new(matcher: FuzzyMatcher) -> Self {
        Self { matcher }
    }

    /// Create a filter with a custom fuzzy threshold
    pub fn with_threshold(threshold: f64) -> Self {
        Self::new(FuzzyMatcher::new(threshold))
    }

    /// Filter and rank `catalog` by `query`.
    ///
    /// An empty query returns the catalog untouched. Otherwise each video is
    /// narrowed to its matching chapters (literal matches first), scored,
    /// and dropped when nothing matches. Results are best first; videos with
    /// equal scores keep their catalog order.
    pub fn filter(&self, catalog: &[Video], query: &str) -> Vec<Video> {
        if query.is_empty() {
            return catalog.to_vec();
        }

        let query_lower = query.to_lowercase();
        let mut results: Vec<Video> = catalog
            .iter()
            .filter_map(|video| self.rank_video(video, query, &query_lower))
            .collect();

        results.sort_by(|a, b| {
            let a = a.score.unwrap_or(f64::INFINITY);
            let b = b.score.unwrap_or(f64::INFINITY);
            a.total_cmp(&b)
        });

        debug!(
            "Query {:?} matched {} of {} videos",
            query,
            results.len(),
            catalog.len()
        );
        results
    }

    fn rank_video(&self, video: &Video, query: &str, query_lower: &str) -> Option<Video> {
        let literal: Vec<Chapter> = video
            .chapters
            .iter()
            .filter(|chapter| chapter.title.to_lowercase().contains(query_lower))
            .map(|chapter| chapter.with_score(0.0))
            .collect();

        let literal_labels: HashSet<&str> = literal.iter().map(|c| c.time_label.as_str()).collect();
        let fuzzy: Vec<Chapter> = self
            .matcher
            .search(&video.chapters, query)
            .into_iter()
            .filter(|(chapter, _)| !literal_labels.contains(chapter.time_label.as_str()))
            .map(|(chapter, score)| chapter.with_score(score))
            .collect();

        let score = if !literal.is_empty() {
            LITERAL_MATCH_SCORE
        } else {
            // a video ranks by its weakest surviving fuzzy match
            fuzzy
                .iter()
                .filter_map(|chapter| chapter.match_score)
                .max_by(f64::total_cmp)?
        };

        let mut chapters = literal;
        chapters.extend(fuzzy);

        Some(Video {
            chapters,
            score: Some(score),
            ..video.clone()
        })
    }
}

/// Filter and rank a catalog with the default fuzzy threshold
pub fn filter(catalog: &[Video], query: &str) -> Vec<Video> {
    QueryFilter::default().filter(catalog, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, RawVideo, DEFAULT_VIDEO_LINK_PREFIX};

    fn catalog_of(items: &[(&str, &str)]) -> Vec<Video> {
        let raw: Vec<RawVideo> = items
            .iter()
            .map(|(id, description)| RawVideo {
                id: id.to_string(),
                published_at: "2022-03-01T10:00:00Z".to_string(),
                title: format!("Video {}", id),
                description: description.to_string(),
            })
            .collect();
        catalog::load(&raw, DEFAULT_VIDEO_LINK_PREFIX).unwrap()
    }

    fn titles(video: &Video) -> Vec<&str> {
        video.chapters.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let videos = catalog_of(&[("a", "0:00 Intro\n1:00 Drills"), ("b", "no chapters")]);
        let results = filter(&videos, "");

        assert_eq!(results, videos);
        assert!(results.iter().all(|v| v.score.is_none()));
        assert!(results
            .iter()
            .flat_map(|v| v.chapters.iter())
            .all(|c| c.match_score.is_none()));
    }

    #[test]
    fn test_setup_query_keeps_single_literal_chapter() {
        let videos = catalog_of(&[("abc", "0:00 Intro\n1:30 - Setup\n5:00 Conclusion")]);
        let results = filter(&videos, "setup");

        assert_eq!(results.len(), 1);
        let video = &results[0];
        assert_eq!(video.score, Some(LITERAL_MATCH_SCORE));
        assert_eq!(video.chapters.len(), 1);
        assert_eq!(video.chapters[0].title, "Setup");
        assert_eq!(video.chapters[0].offset_seconds, 90);
        assert_eq!(video.chapters[0].deep_link, "https://youtu.be/abc?t=90s");
    }

    #[test]
    fn test_literal_matches_are_not_duplicated() {
        let videos = catalog_of(&[("a", "0:00 Intro\n0:30 Introduction to X\n2:00 Drills")]);
        let results = filter(&videos, "intro");

        assert_eq!(results.len(), 1);
        assert_eq!(titles(&results[0]), vec!["Intro", "Introduction to X"]);
        let labels: HashSet<&str> = results[0].chapters.iter().map(|c| c.time_label.as_str()).collect();
        assert_eq!(labels.len(), results[0].chapters.len());
    }

    #[test]
    fn test_literal_match_is_case_insensitive() {
        let videos = catalog_of(&[("a", "0:00 GUARD Retention")]);
        let results = filter(&videos, "guard");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, Some(LITERAL_MATCH_SCORE));
    }

    #[test]
    fn test_literal_chapters_precede_fuzzy_chapters() {
        let videos = catalog_of(&[("a", "0:10 Stup drills\n0:20 Setup\n0:30 Outro")]);
        let results = filter(&videos, "setup");

        assert_eq!(titles(&results[0]), vec!["Setup", "Stup drills"]);
        assert_eq!(results[0].chapters[0].match_score, Some(0.0));
        assert!(results[0].chapters[1].match_score.unwrap() > 0.0);
    }

    #[test]
    fn test_video_without_matches_is_dropped() {
        let videos = catalog_of(&[("a", "0:00 Intro\n1:00 Drills"), ("b", "")]);
        assert!(filter(&videos, "zzzzz_nonexistent").is_empty());
    }

    #[test]
    fn test_literal_video_outranks_fuzzy_only_video() {
        let videos = catalog_of(&[("fuzzy", "0:00 Stup drills"), ("literal", "0:00 Guard setup")]);
        let results = filter(&videos, "setup");

        let ids: Vec<&str> = results.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["literal", "fuzzy"]);
        assert!(results[1].score.unwrap() > 0.0);
    }

    #[test]
    fn test_fuzzy_video_scored_by_worst_match() {
        let videos = catalog_of(&[("a", "0:00 Trianglr choke\n1:00 Traingle escape")]);
        let results = filter(&videos, "triangle");

        let video = &results[0];
        let worst = video
            .chapters
            .iter()
            .filter_map(|c| c.match_score)
            .fold(0.0_f64, f64::max);
        assert_eq!(video.chapters.len(), 2);
        assert_eq!(video.score, Some(worst));
        assert_eq!(titles(video), vec!["Trianglr choke", "Traingle escape"]);
    }

    #[test]
    fn test_equal_scores_keep_catalog_order() {
        let videos = catalog_of(&[
            ("first", "0:00 Setup one"),
            ("second", "0:00 Setup two"),
            ("third", "0:00 Setup three"),
        ]);
        let results = filter(&videos, "setup");

        let ids: Vec<&str> = results.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_filter_does_not_mutate_catalog() {
        let videos = catalog_of(&[("a", "0:00 Intro\n1:30 Setup")]);
        let before = videos.clone();
        let _ = filter(&videos, "setup");
        assert_eq!(videos, before);
    }

    #[test]
    fn test_zero_threshold_keeps_only_exact_regions() {
        let videos = catalog_of(&[("a", "0:00 Stup drills")]);
        assert!(QueryFilter::with_threshold(0.0).filter(&videos, "setup").is_empty());
    }
}
