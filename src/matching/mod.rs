//! Title normalization, similarity scoring and listing selection.

pub mod matcher;
pub mod normalize;
pub mod similarity;

pub use matcher::{MatchRejection, MatchResult, MatchSettings, Matcher};
pub use normalize::{normalize_title, TitleNormalizer};
pub use similarity::similarity;
