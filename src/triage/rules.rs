use serde::{Deserialize, Serialize};
use std::fmt;

/// Care level, ordered from least to most urgent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    #[default]
    SelfCare,
    Gp,
    Urgent,
    Emergency,
}

impl UrgencyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SelfCare => "self-care",
            Self::Gp => "GP",
            Self::Urgent => "urgent",
            Self::Emergency => "emergency",
        }
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            Self::SelfCare => &[
                "Monitor symptoms and rest",
                "Stay hydrated",
                "Consider over-the-counter remedies if appropriate",
                "Seek medical advice if symptoms worsen or persist beyond 48-72 hours",
            ],
            Self::Gp => &[
                "Schedule an appointment with your general practitioner",
                "Monitor symptoms closely",
                "Seek urgent care if symptoms worsen significantly",
                "Keep a symptom diary",
            ],
            Self::Urgent => &[
                "Seek medical attention within 2-4 hours",
                "Go to urgent care or contact your doctor immediately",
                "Do not delay seeking medical care",
                "Have someone accompany you if possible",
            ],
            Self::Emergency => &[
                "Seek immediate emergency care",
                "Call emergency services or go to the emergency room now",
                "Do not drive yourself",
                "Inform medical staff of all symptoms immediately",
            ],
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A set of symptoms that is dangerous in combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DangerousCombination {
    pub name: String,
    pub symptoms: Vec<String>,
    pub level: UrgencyLevel,
}

impl DangerousCombination {
    fn new(name: &str, symptoms: &[&str], level: UrgencyLevel) -> Self {
        Self {
            name: name.to_string(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            level,
        }
    }
}

/// Term lists and thresholds for rule-based triage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageRules {
    #[serde(default = "default_emergency_terms")]
    pub emergency_terms: Vec<String>,

    #[serde(default = "default_urgent_terms")]
    pub urgent_terms: Vec<String>,

    #[serde(default = "default_gp_terms")]
    pub gp_terms: Vec<String>,

    /// More phrases than this default to a GP visit
    #[serde(default = "default_gp_phrase_count")]
    pub gp_phrase_count: usize,

    #[serde(default = "default_combinations")]
    pub combinations: Vec<DangerousCombination>,

    /// Fraction of a combination that must be present to escalate
    #[serde(default = "default_combination_threshold")]
    pub combination_threshold: f64,

    #[serde(default = "default_max_questions")]
    pub max_questions: usize,
}

impl Default for TriageRules {
    fn default() -> Self {
        Self {
            emergency_terms: default_emergency_terms(),
            urgent_terms: default_urgent_terms(),
            gp_terms: default_gp_terms(),
            gp_phrase_count: default_gp_phrase_count(),
            combinations: default_combinations(),
            combination_threshold: default_combination_threshold(),
            max_questions: default_max_questions(),
        }
    }
}

impl TriageRules {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.combination_threshold > 0.0 && self.combination_threshold <= 1.0) {
            return Err(format!(
                "combination_threshold must lie in (0, 1], got {}",
                self.combination_threshold
            ));
        }
        if let Some(combo) = self.combinations.iter().find(|c| c.symptoms.is_empty()) {
            return Err(format!("combination '{}' lists no symptoms", combo.name));
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_emergency_terms() -> Vec<String> {
    strings(&[
        "chest pain",
        "shortness of breath",
        "severe headache",
        "loss of consciousness",
        "severe bleeding",
        "heart attack",
        "stroke",
        "difficulty breathing",
        "coughing blood",
        "slurred speech",
        "one sided weakness",
        "facial droop",
        "seizure",
    ])
}

pub fn default_urgent_terms() -> Vec<String> {
    strings(&[
        "high fever",
        "severe pain",
        "persistent vomiting",
        "severe abdominal pain",
        "lower right abdominal pain",
        "rapid heartbeat",
        "palpitations",
        "stiff neck",
        "confusion",
        "wheezing",
    ])
}

pub fn default_gp_terms() -> Vec<String> {
    strings(&[
        "fever",
        "cough",
        "cold",
        "flu",
        "sore throat",
        "headache",
        "body ache",
        "nausea",
        "diarrhea",
        "stomach pain",
        "abdominal pain",
        "runny nose",
        "congestion",
        "fatigue",
        "burning urination",
        "rash",
    ])
}

pub fn default_gp_phrase_count() -> usize {
    3
}

pub fn default_combinations() -> Vec<DangerousCombination> {
    vec![
        DangerousCombination::new(
            "cardiac emergency",
            &["chest pain", "shortness of breath", "sweating", "nausea"],
            UrgencyLevel::Emergency,
        ),
        DangerousCombination::new(
            "stroke indicators",
            &["one sided weakness", "slurred speech", "confusion"],
            UrgencyLevel::Emergency,
        ),
        DangerousCombination::new(
            "respiratory distress",
            &["shortness of breath", "chest tightness", "wheezing"],
            UrgencyLevel::Urgent,
        ),
        DangerousCombination::new(
            "severe infection",
            &["high fever", "fatigue", "confusion", "palpitations"],
            UrgencyLevel::Urgent,
        ),
        DangerousCombination::new(
            "neurological concern",
            &["severe headache", "blurred vision", "confusion", "seizure"],
            UrgencyLevel::Urgent,
        ),
    ]
}

pub fn default_combination_threshold() -> f64 {
    0.5
}

pub fn default_max_questions() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(UrgencyLevel::SelfCare < UrgencyLevel::Gp);
        assert!(UrgencyLevel::Gp < UrgencyLevel::Urgent);
        assert!(UrgencyLevel::Urgent < UrgencyLevel::Emergency);
        assert_eq!(UrgencyLevel::Gp.to_string(), "GP");
    }

    #[test]
    fn test_every_level_has_recommendations() {
        for level in [
            UrgencyLevel::SelfCare,
            UrgencyLevel::Gp,
            UrgencyLevel::Urgent,
            UrgencyLevel::Emergency,
        ] {
            assert_eq!(level.recommendations().len(), 4);
        }
    }

    #[test]
    fn test_partial_rules_keep_default_lists() {
        let rules: TriageRules = toml::from_str("gp_phrase_count = 5").unwrap();
        assert_eq!(rules.gp_phrase_count, 5);
        assert_eq!(rules.combinations.len(), 5);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let rules = TriageRules {
            combination_threshold: 0.0,
            ..Default::default()
        };
        assert!(rules.validate().is_err());
    }
}
