//! Chapter search: fuzzy title matching and catalog-wide ranking

pub mod fuzzy;
pub mod ranker;

pub use fuzzy::{FuzzyMatcher, DEFAULT_FUZZY_THRESHOLD};
pub use ranker::{filter, QueryFilter, LITERAL_MATCH_SCORE};
