use super::breakdown::ScoreBreakdown;
use super::normalizer::ScoreNormalizer;
use super::patterns::best_pattern;
use crate::config::{ScoringConfig, SymptomapConfig};
use crate::core::{normalize_text, PatientContext, Query};
use crate::knowledge::{Condition, ConditionId, KnowledgeBase, SymptomId};
use crate::matching::{split_phrases, PhraseMatch, SimilarityStrategy, SymptomMatcher};
use crate::report::{self, ScoreReport};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// A condition that received at least one matched symptom.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCondition {
    pub condition: ConditionId,
    /// Matched symptoms linked to this condition, in input order
    pub matched: Vec<SymptomId>,
    pub critical_count: usize,
    pub breakdown: ScoreBreakdown,
    pub probability: f64,
}

/// Ranks candidate conditions for a set of symptom phrases.
///
/// The scorer owns a shared handle to an immutable knowledge base and holds
/// no mutable state, so `score` is a pure function of its inputs and may be
/// called from many threads at once.
pub struct DiseaseScorer {
    kb: Arc<KnowledgeBase>,
    matcher: SymptomMatcher,
    config: ScoringConfig,
}

impl DiseaseScorer {
    pub fn new(
        kb: Arc<KnowledgeBase>,
        config: ScoringConfig,
        strategy: Box<dyn SimilarityStrategy>,
        threshold: f64,
    ) -> Self {
        let matcher = SymptomMatcher::new(Arc::clone(&kb), strategy, threshold);
        Self {
            kb,
            matcher,
            config,
        }
    }

    pub fn from_config(kb: Arc<KnowledgeBase>, config: &SymptomapConfig) -> Self {
        let matching = config.matching();
        Self::new(
            kb,
            config.scoring(),
            matching.strategy.build(),
            matching.threshold,
        )
    }

    pub fn with_defaults(kb: Arc<KnowledgeBase>) -> Self {
        Self::from_config(kb, &SymptomapConfig::default())
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn matcher(&self) -> &SymptomMatcher {
        &self.matcher
    }

    /// Score pre-tokenised symptom phrases.
    pub fn score<S: AsRef<str>>(
        &self,
        phrases: &[S],
        patient: Option<&PatientContext>,
    ) -> ScoreReport {
        let matches: Vec<PhraseMatch> = phrases
            .iter()
            .filter_map(|p| self.matcher.match_phrase(p.as_ref()))
            .collect();

        let mut seen = BTreeSet::new();
        let matched: Vec<SymptomId> = matches
            .iter()
            .filter_map(|m| m.matched.map(|hit| hit.symptom))
            .filter(|id| seen.insert(*id))
            .collect();

        let scored = self.score_symptoms(&matched, patient);
        let report = report::assemble(&self.kb, scored, &matches, self.config.ranking.top_n);

        debug!(
            phrases = phrases.len(),
            matched = matched.len(),
            unmatched = report.unmatched_phrases.len(),
            ranked = report.ranked.len(),
            "scored query"
        );
        report
    }

    /// Split a free-text description into phrases and score them.
    pub fn score_text(&self, text: &str, patient: Option<&PatientContext>) -> ScoreReport {
        self.score(&split_phrases(text), patient)
    }

    /// Score a query: its explicit symptoms followed by the phrases of its free text.
    pub fn score_query(&self, query: &Query) -> ScoreReport {
        let mut phrases = query.symptoms.clone();
        if let Some(text) = &query.text {
            phrases.extend(split_phrases(text));
        }
        self.score(&phrases, query.patient.as_ref())
    }

    /// Raw scoring and normalization over all conditions touched by `matched`.
    ///
    /// Results are unsorted; conditions without a matched symptom never appear.
    pub fn score_symptoms(
        &self,
        matched: &[SymptomId],
        patient: Option<&PatientContext>,
    ) -> Vec<ScoredCondition> {
        let matched_set: BTreeSet<SymptomId> = matched.iter().copied().collect();
        let candidates: BTreeSet<ConditionId> = matched_set
            .iter()
            .flat_map(|symptom| self.kb.edges_for(*symptom))
            .map(|edge| edge.condition)
            .collect();

        let mut scored: Vec<ScoredCondition> = candidates
            .into_iter()
            .filter_map(|id| self.score_condition(id, matched, &matched_set, patient))
            .collect();

        let raw: Vec<f64> = scored.iter().map(|s| s.breakdown.raw_score).collect();
        let normalizer = ScoreNormalizer::from_scores(&raw, self.config.normalization);
        for entry in &mut scored {
            entry.probability = normalizer.normalize(entry.breakdown.raw_score);
        }
        scored
    }

    fn score_condition(
        &self,
        id: ConditionId,
        matched: &[SymptomId],
        matched_set: &BTreeSet<SymptomId>,
        patient: Option<&PatientContext>,
    ) -> Option<ScoredCondition> {
        let condition = self.kb.condition(id);
        let multipliers = &self.config.multipliers;

        let edges: Vec<_> = matched
            .iter()
            .filter_map(|symptom| condition.edge_for(*symptom))
            .collect();
        if edges.is_empty() {
            return None;
        }

        let base: f64 = edges.iter().map(|e| e.weight).sum();
        let mut breakdown = ScoreBreakdown::new(base, multipliers.prevalence(condition.prevalence));

        if age_applies(condition, patient) {
            breakdown = breakdown.with_age(multipliers.age);
        }
        if let Some(hit) = best_pattern(
            &condition.patterns,
            matched_set,
            self.config.patterns.min_coverage,
        ) {
            breakdown = breakdown.with_pattern(multipliers.pattern, &hit.pattern.name);
        }
        if chronic_applies(condition, patient) {
            breakdown = breakdown.with_chronic(multipliers.chronic);
        }

        Some(ScoredCondition {
            condition: id,
            matched: edges.iter().map(|e| e.symptom).collect(),
            critical_count: edges.iter().filter(|e| e.critical).count(),
            breakdown,
            probability: 0.0,
        })
    }
}

fn age_applies(condition: &Condition, patient: Option<&PatientContext>) -> bool {
    match (condition.age_tag, patient.and_then(|p| p.age)) {
        (Some(tag), Some(age)) => tag.contains(age),
        _ => false,
    }
}

fn chronic_applies(condition: &Condition, patient: Option<&PatientContext>) -> bool {
    let Some(patient) = patient else {
        return false;
    };
    patient.chronic_conditions.iter().any(|entry| {
        let entry = normalize_text(entry);
        condition
            .chronic_affinities
            .iter()
            .any(|keyword| contains_words(&entry, keyword))
    })
}

/// Whether `keyword` occurs in `text` as a whole-word sequence.
pub fn contains_words(text: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    format!(" {text} ").contains(&format!(" {keyword} "))
}
