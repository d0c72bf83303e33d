use super::similarity::SimilarityStrategy;
use crate::core::{normalize_text, Severity};
use crate::knowledge::{KnowledgeBase, SymptomId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Equal to the canonical name after normalisation
    Exact,
    /// Equal to a registered synonym after normalisation
    Synonym,
    /// Best candidate above the similarity threshold
    Fuzzy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymptomMatch {
    pub symptom: SymptomId,
    pub similarity: f64,
    pub method: MatchMethod,
}

/// What the matcher made of one input phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseMatch {
    pub phrase: String,
    pub severity: Severity,
    pub matched: Option<SymptomMatch>,
    /// Best similarity seen, also reported for rejected phrases
    pub best_similarity: f64,
}

/// Maps raw phrases onto canonical symptoms.
///
/// Holds no per-call state, so one matcher serves any number of threads.
pub struct SymptomMatcher {
    kb: Arc<KnowledgeBase>,
    strategy: Box<dyn SimilarityStrategy>,
    threshold: f64,
    /// Every matchable term, sorted for deterministic iteration
    terms: Vec<(String, SymptomId)>,
}

impl SymptomMatcher {
    pub fn new(
        kb: Arc<KnowledgeBase>,
        strategy: Box<dyn SimilarityStrategy>,
        threshold: f64,
    ) -> Self {
        let mut terms: Vec<(String, SymptomId)> = kb
            .terms()
            .map(|(term, id)| (term.to_string(), id))
            .collect();
        terms.sort();
        Self {
            kb,
            strategy,
            threshold,
            terms,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Match one phrase. Returns `None` for blank input.
    pub fn match_phrase(&self, phrase: &str) -> Option<PhraseMatch> {
        let normalized = normalize_text(phrase);
        if normalized.is_empty() {
            return None;
        }

        let (severity, remainder) = strip_qualifiers(&normalized);
        let stripped = remainder.filter(|r| *r != normalized);

        let exact = self
            .exact(&normalized)
            .or_else(|| stripped.as_deref().and_then(|r| self.exact(r)));

        let (matched, best_similarity) = match exact {
            Some(found) => (Some(found), 1.0),
            None => {
                let mut inputs = vec![normalized.as_str()];
                inputs.extend(stripped.as_deref());
                self.fuzzy(&inputs)
            }
        };

        debug!(
            phrase,
            symptom = matched.map(|m| self.kb.symptom_name(m.symptom)),
            similarity = best_similarity,
            method = ?matched.map(|m| m.method),
            ?severity,
            "matched phrase"
        );

        Some(PhraseMatch {
            phrase: phrase.to_string(),
            severity,
            matched,
            best_similarity,
        })
    }

    fn exact(&self, term: &str) -> Option<SymptomMatch> {
        let symptom = self.kb.lookup_term(term)?;
        let method = if self.kb.is_canonical_term(term) {
            MatchMethod::Exact
        } else {
            MatchMethod::Synonym
        };
        Some(SymptomMatch {
            symptom,
            similarity: 1.0,
            method,
        })
    }

    /// Highest-similarity candidate across all inputs.
    ///
    /// Equal similarities prefer the symptom with the higher maximum edge
    /// weight, then the alphabetically first canonical name.
    fn fuzzy(&self, inputs: &[&str]) -> (Option<SymptomMatch>, f64) {
        let mut best: Option<(f64, SymptomId)> = None;

        for (term, symptom) in &self.terms {
            let score = inputs
                .iter()
                .map(|input| self.strategy.similarity(input, term))
                .fold(0.0, f64::max);

            let better = match best {
                None => true,
                Some((best_score, best_symptom)) => {
                    self.rank(score, *symptom, best_score, best_symptom) == Ordering::Greater
                }
            };
            if better {
                best = Some((score, *symptom));
            }
        }

        match best {
            Some((score, symptom)) if score >= self.threshold => (
                Some(SymptomMatch {
                    symptom,
                    similarity: score,
                    method: MatchMethod::Fuzzy,
                }),
                score,
            ),
            Some((score, _)) => (None, score),
            None => (None, 0.0),
        }
    }

    fn rank(&self, score: f64, symptom: SymptomId, other: f64, other_symptom: SymptomId) -> Ordering {
        score
            .total_cmp(&other)
            .then_with(|| {
                self.kb
                    .max_weight(symptom)
                    .total_cmp(&self.kb.max_weight(other_symptom))
            })
            .then_with(|| {
                self.kb
                    .symptom_name(other_symptom)
                    .cmp(self.kb.symptom_name(symptom))
            })
    }
}

/// Split leading severity words off a normalised phrase.
///
/// Returns the strongest severity seen and the remaining words, or `None`
/// for the remainder when nothing but qualifiers was given.
pub fn strip_qualifiers(normalized: &str) -> (Severity, Option<String>) {
    let mut severity: Option<Severity> = None;
    let mut words = normalized.split(' ').peekable();

    while let Some(found) = words.peek().and_then(|w| Severity::from_qualifier(w)) {
        severity = Some(severity.map_or(found, |s| s.max(found)));
        words.next();
    }

    let rest: Vec<&str> = words.collect();
    let remainder = (!rest.is_empty()).then(|| rest.join(" "));
    (severity.unwrap_or_default(), remainder)
}
