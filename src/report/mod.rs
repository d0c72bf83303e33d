//! The response value of a scoring request.
//!
//! Assembly is a pure transformation of scored conditions and phrase matches:
//! ranking, truncation, and conversion of identifiers back to names.

mod assembly;

pub use assembly::{assemble, confidence};

use crate::core::Severity;
use crate::matching::MatchMethod;
use crate::scoring::ScoreBreakdown;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// At most `top_n` conditions, best first
    pub ranked: Vec<RankedCondition>,
    /// Input phrases that resolved to no symptom, verbatim
    pub unmatched_phrases: Vec<String>,
    /// How each non-blank input phrase was read
    pub interpretations: Vec<SymptomInterpretation>,
    /// Plain-language reading of the top results; absent when nothing ranked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ReportAnalysis>,
}

impl ScoreReport {
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn top(&self) -> Option<&RankedCondition> {
        self.ranked.first()
    }

    pub fn has_critical(&self) -> bool {
        self.ranked.iter().any(|r| r.critical)
    }

    pub fn find(&self, condition: &str) -> Option<&RankedCondition> {
        self.ranked.iter().find(|r| r.condition == condition)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCondition {
    pub condition: String,
    /// Display probability in [floor, ceiling], not a calibrated probability
    pub probability: f64,
    pub raw_score: f64,
    /// Symptom match quality in [0, 100], independent of the ranking
    pub confidence: f64,
    pub matched_symptoms: Vec<String>,
    /// Any matched symptom is flagged critical for this condition
    pub critical: bool,
    pub critical_symptom_count: usize,
    /// Critical symptoms of this condition the query did not mention
    pub unmatched_critical_symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomInterpretation {
    pub phrase: String,
    pub canonical: Option<String>,
    pub similarity: f64,
    pub method: Option<MatchMethod>,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAnalysis {
    pub summary: String,
    pub symptom_analysis: String,
    /// Banded confidence of the top ranked condition
    pub confidence_level: ConfidenceLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Moderate,
    High,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 70.0 {
            Self::High
        } else if confidence >= 50.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
