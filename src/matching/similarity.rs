//! Pluggable string similarity used by the fuzzy matching stage.
//!
//! Every strategy maps a (phrase, candidate) pair onto [0, 1], where 1 means
//! identical after the strategy's own normalisation. Inputs are expected to be
//! normalised already (see [`crate::core::normalize_text`]).

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::fmt;

pub trait SimilarityStrategy: Send + Sync {
    fn similarity(&self, phrase: &str, candidate: &str) -> f64;

    fn name(&self) -> &'static str;
}

/// Selectable strategies, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    TokenSort,
    Levenshtein,
    Subsequence,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn SimilarityStrategy> {
        match self {
            Self::TokenSort => Box::new(TokenSortRatio),
            Self::Levenshtein => Box::new(NormalizedLevenshtein),
            Self::Subsequence => Box::new(SubsequenceSimilarity),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TokenSort => "token_sort",
            Self::Levenshtein => "levenshtein",
            Self::Subsequence => "subsequence",
        };
        f.write_str(name)
    }
}

/// Normalised Levenshtein similarity over the token-sorted forms of both strings.
///
/// Word order does not matter: "nose runny" and "runny nose" score 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl SimilarityStrategy for TokenSortRatio {
    fn similarity(&self, phrase: &str, candidate: &str) -> f64 {
        levenshtein_ratio(&token_sort(phrase), &token_sort(candidate))
    }

    fn name(&self) -> &'static str {
        "token_sort"
    }
}

/// `1 - distance / max(len)` on the raw character sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedLevenshtein;

impl SimilarityStrategy for NormalizedLevenshtein {
    fn similarity(&self, phrase: &str, candidate: &str) -> f64 {
        levenshtein_ratio(phrase, candidate)
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

/// Skim-style subsequence scoring, normalised by the best achievable score.
///
/// The raw skim score of `phrase` against `candidate` is divided by the score
/// of the candidate against itself; the check runs both ways and keeps the
/// higher ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubsequenceSimilarity;

impl SubsequenceSimilarity {
    fn directional(matcher: &SkimMatcherV2, pattern: &str, choice: &str) -> f64 {
        let Some(best) = matcher.fuzzy_match(choice, choice).filter(|s| *s > 0) else {
            return 0.0;
        };
        matcher
            .fuzzy_match(choice, pattern)
            .map_or(0.0, |score| (score as f64 / best as f64).clamp(0.0, 1.0))
    }
}

impl SimilarityStrategy for SubsequenceSimilarity {
    fn similarity(&self, phrase: &str, candidate: &str) -> f64 {
        if phrase == candidate {
            return 1.0;
        }
        if phrase.is_empty() || candidate.is_empty() {
            return 0.0;
        }
        let matcher = SkimMatcherV2::default().ignore_case();
        Self::directional(&matcher, phrase, candidate)
            .max(Self::directional(&matcher, candidate, phrase))
    }

    fn name(&self) -> &'static str {
        "subsequence"
    }
}

/// Lowercase, split on anything that is not alphanumeric, sort, re-join.
pub fn token_sort(text: &str) -> String {
    let mut tokens: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

pub fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / longest as f64
}

/// Edit distance with a two-row table.
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
        assert_eq!(levenshtein(&chars("fever"), &chars("fever")), 0);
    }

    #[test]
    fn test_token_sort_ignores_word_order_and_punctuation() {
        assert_eq!(token_sort("Nose, runny!"), "nose runny");
        assert_eq!(TokenSortRatio.similarity("nose runny", "runny nose"), 1.0);
    }

    #[test]
    fn test_typo_scores_above_default_threshold() {
        let score = TokenSortRatio.similarity("runy nose", "runny nose");
        assert!(score >= 0.85, "score was {score}");

        let score = NormalizedLevenshtein.similarity("diarhea", "diarrhea");
        assert!(score >= 0.85, "score was {score}");
    }

    #[test]
    fn test_unrelated_terms_score_low() {
        assert!(TokenSortRatio.similarity("broken leg", "runny nose") < 0.5);
        assert!(SubsequenceSimilarity.similarity("xyz", "runny nose") < 0.5);
    }

    #[test]
    fn test_subsequence_identical_strings() {
        assert_eq!(SubsequenceSimilarity.similarity("cough", "cough"), 1.0);
        assert_eq!(SubsequenceSimilarity.similarity("", "cough"), 0.0);
    }

    #[test]
    fn test_strategy_kind_from_config_name() {
        let kind: StrategyKind = serde_json::from_str("\"levenshtein\"").unwrap();
        assert_eq!(kind, StrategyKind::Levenshtein);
        assert_eq!(kind.build().name(), "levenshtein");
        assert_eq!(StrategyKind::default().to_string(), "token_sort");
    }

    proptest! {
        #[test]
        fn prop_similarity_is_bounded(a in "[a-z ]{0,16}", b in "[a-z ]{0,16}") {
            for kind in [StrategyKind::TokenSort, StrategyKind::Levenshtein, StrategyKind::Subsequence] {
                let score = kind.build().similarity(&a, &b);
                prop_assert!((0.0..=1.0).contains(&score), "{} gave {}", kind, score);
            }
        }

        #[test]
        fn prop_levenshtein_ratio_is_symmetric(a in "[a-z]{0,12}", b in "[a-z]{0,12}") {
            prop_assert_eq!(levenshtein_ratio(&a, &b), levenshtein_ratio(&b, &a));
        }
    }
}
