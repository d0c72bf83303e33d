use super::{ConfidenceLevel, RankedCondition, ReportAnalysis, ScoreReport, SymptomInterpretation};
use crate::knowledge::KnowledgeBase;
use crate::matching::PhraseMatch;
use crate::scoring::ScoredCondition;
use std::cmp::Ordering;
use std::collections::BTreeSet;

const EDGE_COVERAGE_WEIGHT: f64 = 0.6;
const INPUT_COVERAGE_WEIGHT: f64 = 0.4;
const CRITICAL_CONFIDENCE_BOOST: f64 = 1.2;
const CRITICAL_CONFIDENCE_CAP: f64 = 95.0;

/// Rank, truncate and package scored conditions with the phrase outcomes.
///
/// Order: probability descending, matched critical symptoms descending,
/// condition name ascending.
pub fn assemble(
    kb: &KnowledgeBase,
    mut scored: Vec<ScoredCondition>,
    matches: &[PhraseMatch],
    top_n: usize,
) -> ScoreReport {
    scored.sort_by(|a, b| compare_ranked(kb, a, b));
    scored.truncate(top_n);

    let reported = reported_symptom_count(matches);
    let ranked: Vec<RankedCondition> = scored
        .into_iter()
        .map(|entry| to_ranked(kb, entry, reported))
        .collect();
    let analysis = analyze(&ranked, reported);

    let unmatched_phrases = matches
        .iter()
        .filter(|m| m.matched.is_none())
        .map(|m| m.phrase.clone())
        .collect();

    let interpretations = matches
        .iter()
        .map(|m| SymptomInterpretation {
            phrase: m.phrase.clone(),
            canonical: m
                .matched
                .map(|hit| kb.symptom_name(hit.symptom).to_string()),
            similarity: m.best_similarity,
            method: m.matched.map(|hit| hit.method),
            severity: m.severity,
        })
        .collect();

    ScoreReport {
        ranked,
        unmatched_phrases,
        interpretations,
        analysis,
    }
}

/// Distinct recognised symptoms plus phrases that matched nothing.
fn reported_symptom_count(matches: &[PhraseMatch]) -> usize {
    let distinct: BTreeSet<_> = matches
        .iter()
        .filter_map(|m| m.matched.map(|hit| hit.symptom))
        .collect();
    let unmatched = matches.iter().filter(|m| m.matched.is_none()).count();
    distinct.len() + unmatched
}

/// Match quality in [0, 100]: how much of the condition's symptom profile was
/// seen, blended with how much of the query the condition explains.
///
/// Informational only; ranking never reads it.
pub fn confidence(matched: usize, condition_edges: usize, reported: usize, critical: bool) -> f64 {
    let edge_coverage = if condition_edges == 0 {
        0.0
    } else {
        matched as f64 / condition_edges as f64
    };
    let input_coverage = matched as f64 / reported.max(1) as f64;
    let score =
        (edge_coverage * EDGE_COVERAGE_WEIGHT + input_coverage * INPUT_COVERAGE_WEIGHT) * 100.0;
    if critical {
        (score * CRITICAL_CONFIDENCE_BOOST).min(CRITICAL_CONFIDENCE_CAP)
    } else {
        score
    }
}

fn analyze(ranked: &[RankedCondition], reported: usize) -> Option<ReportAnalysis> {
    let top = ranked.first()?;

    let mut summary = match ranked {
        [only] => format!(
            "{} is the most likely condition ({:.1}%).",
            only.condition, only.probability
        ),
        [first, second, rest @ ..] => {
            let mut text = format!(
                "{} ({:.1}%) is the primary concern. Other possibilities include {} ({:.1}%)",
                first.condition, first.probability, second.condition, second.probability
            );
            if let Some(third) = rest.first() {
                text.push_str(&format!(
                    " and {} ({:.1}%)",
                    third.condition, third.probability
                ));
            }
            text.push('.');
            text
        }
        [] => return None,
    };
    if top.critical {
        summary.push_str(" Critical symptoms are present and need prompt medical attention.");
    }

    Some(ReportAnalysis {
        summary,
        symptom_analysis: format!(
            "Matched {} out of {} reported symptoms.",
            top.matched_symptoms.len(),
            reported
        ),
        confidence_level: ConfidenceLevel::from_confidence(top.confidence),
    })
}

fn compare_ranked(kb: &KnowledgeBase, a: &ScoredCondition, b: &ScoredCondition) -> Ordering {
    b.probability
        .total_cmp(&a.probability)
        .then_with(|| b.critical_count.cmp(&a.critical_count))
        .then_with(|| {
            kb.condition(a.condition)
                .name
                .cmp(&kb.condition(b.condition).name)
        })
}

fn to_ranked(kb: &KnowledgeBase, entry: ScoredCondition, reported: usize) -> RankedCondition {
    let condition = kb.condition(entry.condition);
    let critical = entry.critical_count > 0;

    let unmatched_critical_symptoms = condition
        .critical_symptoms()
        .filter(|symptom| !entry.matched.contains(symptom))
        .map(|symptom| kb.symptom_name(symptom).to_string())
        .collect();

    RankedCondition {
        condition: condition.name.clone(),
        probability: entry.probability,
        raw_score: entry.breakdown.raw_score,
        matched_symptoms: entry
            .matched
            .iter()
            .map(|symptom| kb.symptom_name(*symptom).to_string())
            .collect(),
        confidence: confidence(
            entry.matched.len(),
            condition.edges.len(),
            reported,
            critical,
        ),
        critical,
        critical_symptom_count: entry.critical_count,
        unmatched_critical_symptoms,
        department: condition.department.clone(),
        description: condition.description.clone(),
        breakdown: entry.breakdown,
    }
}
