//! Free-text symptom phrases to canonical symptoms.
//!
//! Matching runs in order: exact lookup of the whole phrase against canonical
//! names and synonyms, exact lookup of the phrase with leading severity words
//! removed, then fuzzy search over every known term with an injectable
//! [`SimilarityStrategy`] and an acceptance threshold.

pub mod matcher;
pub mod phrases;
pub mod similarity;

pub use matcher::{
    strip_qualifiers, MatchMethod, PhraseMatch, SymptomMatch, SymptomMatcher, DEFAULT_THRESHOLD,
};
pub use phrases::split_phrases;
pub use similarity::{
    NormalizedLevenshtein, SimilarityStrategy, StrategyKind, SubsequenceSimilarity, TokenSortRatio,
};
