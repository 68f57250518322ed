//! Approximate matching of a query against chapter titles.
//!
//! The score is a normalized distance: 0.0 is an exact occurrence of the
//! query somewhere in the title, 1.0 is nothing in common. The query is
//! compared against every window of the title whose length is within one
//! character of the query, so matches are location independent and tolerate
//! a single insertion or deletion as well as substitutions and transpositions.

use strsim::normalized_levenshtein;

use crate::chapters::Chapter;

/// Default maximum distance for a chapter to count as a match
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.3;

/// Fuzzy matcher with a distance threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

impl FuzzyMatcher {
    /// Create a matcher; the threshold is clamped to [0, 1]
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_FUZZY_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Distance between `query` and the best matching region of `text`.
    ///
    /// Comparison is case-insensitive. An empty query or text is at
    /// distance 1.0 from everything.
    pub fn distance(query: &str, text: &str) -> f64 {
        let query: Vec<char> = query.to_lowercase().chars().collect();
        let text: Vec<char> = text.to_lowercase().chars().collect();
        if query.is_empty() || text.is_empty() {
            return 1.0;
        }

        let needle: String = query.iter().collect();
        let min_window = query.len().saturating_sub(1).max(1);
        let max_window = query.len() + 1;

        let mut best: f64 = 0.0;
        for window in min_window..=max_window {
            if window >= text.len() {
                let whole: String = text.iter().collect();
                best = best.max(normalized_levenshtein(&needle, &whole));
                break;
            }

            for region in text.windows(window) {
                let candidate: String = region.iter().collect();
                best = best.max(normalized_levenshtein(&needle, &candidate));
            }

            if best >= 1.0 {
                break;
            }
        }

        (1.0 - best).clamp(0.0, 1.0)
    }

    /// Distance of `text` from `query` when it is within the threshold
    pub fn score(&self, query: &str, text: &str) -> Option<f64> {
        let distance = Self::distance(query, text);
        (distance <= self.threshold).then_some(distance)
    }

    /// Chapters whose title matches `query`, best first.
    ///
    /// Equal scores keep the original chapter order.
    pub fn search<'a>(&self, chapters: &'a [Chapter], query: &str) -> Vec<(&'a Chapter, f64)> {
        let mut matches: Vec<(&Chapter, f64)> = chapters
            .iter()
            .filter_map(|chapter| self.score(query, &chapter.title).map(|score| (chapter, score)))
            .collect();

        matches.sort_by(|a, b| a.1.total_cmp(&b.1));
        matches
    }
}
