use super::rules::{TriageRules, UrgencyLevel};
use crate::core::{normalize_text, Severity};
use crate::report::ScoreReport;
use crate::scoring::engine::contains_words;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_DEPARTMENT: &str = "General Medicine";

const GENERAL_QUESTIONS: [&str; 3] = [
    "How long have you been experiencing these symptoms?",
    "Have the symptoms gotten better, worse, or stayed the same?",
    "Are you currently taking any medications?",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub level: UrgencyLevel,
    /// Why the level was chosen, in the order the rules fired
    pub reasons: Vec<String>,
    pub department: String,
    pub recommendations: Vec<String>,
    pub follow_up_questions: Vec<String>,
}

/// Classify urgency for a scored query.
///
/// Works from the report's phrase interpretations, so both the words the
/// patient used and the canonical symptoms they resolved to are considered.
pub fn assess(report: &ScoreReport, rules: &TriageRules) -> TriageAssessment {
    let texts: Vec<String> = report
        .interpretations
        .iter()
        .flat_map(|i| {
            std::iter::once(normalize_text(&i.phrase))
                .chain(i.canonical.as_deref().map(normalize_text))
        })
        .collect();
    let mentions = |term: &str| {
        let term = normalize_text(term);
        texts.iter().any(|text| contains_words(text, &term))
    };

    let mut level = UrgencyLevel::SelfCare;
    let mut reasons = Vec::new();

    let tiers = [
        (&rules.emergency_terms, UrgencyLevel::Emergency),
        (&rules.urgent_terms, UrgencyLevel::Urgent),
        (&rules.gp_terms, UrgencyLevel::Gp),
    ];
    for (terms, tier) in tiers {
        if let Some(term) = terms.iter().find(|t| mentions(t.as_str())) {
            level = tier;
            reasons.push(format!("'{term}' reported"));
            break;
        }
    }

    let phrase_count = report.interpretations.len();
    if level == UrgencyLevel::SelfCare && phrase_count > rules.gp_phrase_count {
        level = UrgencyLevel::Gp;
        reasons.push(format!("{phrase_count} symptoms reported"));
    }

    for combo in &rules.combinations {
        let present = combo.symptoms.iter().filter(|s| mentions(s.as_str())).count();
        let ratio = present as f64 / combo.symptoms.len().max(1) as f64;
        if ratio >= rules.combination_threshold && combo.level > level {
            level = combo.level;
            reasons.push(format!(
                "{} ({present} of {} signs)",
                combo.name,
                combo.symptoms.len()
            ));
        }
    }

    if let Some(critical) = report.ranked.iter().find(|r| r.critical) {
        if level < UrgencyLevel::Urgent {
            level = UrgencyLevel::Urgent;
            reasons.push(format!("critical symptom for {}", critical.condition));
        }
    }

    let severe = report
        .interpretations
        .iter()
        .any(|i| i.severity == Severity::Severe);
    if severe && level == UrgencyLevel::Gp {
        level = UrgencyLevel::Urgent;
        reasons.push("symptom described as severe".to_string());
    }

    let department = report
        .top()
        .and_then(|top| top.department.clone())
        .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string());

    debug!(%level, %department, reasons = reasons.len(), "triage assessed");

    TriageAssessment {
        level,
        reasons,
        department,
        recommendations: level.recommendations().iter().map(|r| r.to_string()).collect(),
        follow_up_questions: follow_up_questions(&texts, rules.max_questions),
    }
}

fn follow_up_questions(texts: &[String], limit: usize) -> Vec<String> {
    let mentions = |word: &str| texts.iter().any(|t| t.contains(word));

    let mut questions: Vec<String> = GENERAL_QUESTIONS.iter().map(|q| q.to_string()).collect();
    if mentions("pain") {
        questions.push("On a scale of 1-10, how would you rate the pain intensity?".to_string());
    }
    if mentions("fever") {
        questions.push("What is your current temperature if measured?".to_string());
    }
    if mentions("headache") {
        questions.push("Is this different from your usual headaches?".to_string());
    }
    questions.truncate(limit);
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SymptomInterpretation;

    fn interpretation(phrase: &str, canonical: Option<&str>, severity: Severity) -> SymptomInterpretation {
        SymptomInterpretation {
            phrase: phrase.to_string(),
            canonical: canonical.map(str::to_string),
            similarity: 1.0,
            method: None,
            severity,
        }
    }

    fn report(phrases: &[(&str, Option<&str>)]) -> ScoreReport {
        ScoreReport {
            ranked: Vec::new(),
            unmatched_phrases: Vec::new(),
            interpretations: phrases
                .iter()
                .map(|(p, c)| interpretation(p, *c, Severity::Unspecified))
                .collect(),
            analysis: None,
        }
    }

    #[test]
    fn test_emergency_term() {
        let result = assess(&report(&[("crushing chest pain", None)]), &TriageRules::default());
        assert_eq!(result.level, UrgencyLevel::Emergency);
        assert_eq!(result.department, DEFAULT_DEPARTMENT);
        assert_eq!(result.recommendations[0], "Seek immediate emergency care");
    }

    #[test]
    fn test_canonical_name_counts_as_mention() {
        let result = assess(
            &report(&[("rhinorrhea", Some("runny nose"))]),
            &TriageRules::default(),
        );
        assert_eq!(result.level, UrgencyLevel::Gp);
    }

    #[test]
    fn test_many_unknown_phrases_default_to_gp() {
        let phrases = [("a", None), ("b", None), ("c", None), ("d", None)];
        let result = assess(&report(&phrases), &TriageRules::default());
        assert_eq!(result.level, UrgencyLevel::Gp);

        let result = assess(&report(&phrases[..3]), &TriageRules::default());
        assert_eq!(result.level, UrgencyLevel::SelfCare);
    }

    #[test]
    fn test_combination_escalates_at_half_match() {
        let result = assess(
            &report(&[("sweating", None), ("nausea", None)]),
            &TriageRules::default(),
        );
        assert_eq!(result.level, UrgencyLevel::Emergency);
        assert_eq!(
            result.reasons,
            vec![
                "'nausea' reported".to_string(),
                "cardiac emergency (2 of 4 signs)".to_string()
            ]
        );
    }

    #[test]
    fn test_severe_qualifier_raises_gp_to_urgent() {
        let mut r = report(&[]);
        r.interpretations = vec![interpretation("severe cough", Some("cough"), Severity::Severe)];
        let result = assess(&r, &TriageRules::default());
        assert_eq!(result.level, UrgencyLevel::Urgent);
    }

    #[test]
    fn test_follow_up_questions_are_capped() {
        let result = assess(
            &report(&[("fever", None), ("headache", None), ("back pain", None)]),
            &TriageRules::default(),
        );
        assert_eq!(result.follow_up_questions.len(), 5);
        assert!(result.follow_up_questions[3].contains("scale of 1-10"));
        assert!(result.follow_up_questions[4].contains("temperature"));
    }

    #[test]
    fn test_empty_report_is_self_care() {
        let result = assess(&ScoreReport::default(), &TriageRules::default());
        assert_eq!(result.level, UrgencyLevel::SelfCare);
        assert!(result.reasons.is_empty());
        assert_eq!(result.follow_up_questions.len(), 3);
    }
}
