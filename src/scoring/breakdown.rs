use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Factor-by-factor account of one condition's raw score.
///
/// `raw_score = base * prevalence * age * pattern * chronic`; neutral factors are 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Sum of matched edge weights
    pub base: f64,
    pub prevalence: f64,
    pub age: f64,
    pub pattern: f64,
    pub chronic: f64,
    pub raw_score: f64,
    /// Name of the symptom combination that earned the pattern bonus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
}

impl ScoreBreakdown {
    pub fn new(base: f64, prevalence: f64) -> Self {
        let mut breakdown = Self {
            base,
            prevalence,
            age: 1.0,
            pattern: 1.0,
            chronic: 1.0,
            raw_score: 0.0,
            matched_pattern: None,
        };
        breakdown.raw_score = breakdown.calculate_raw();
        breakdown
    }

    pub fn with_age(mut self, factor: f64) -> Self {
        self.age = factor;
        self.raw_score = self.calculate_raw();
        self
    }

    pub fn with_pattern(mut self, factor: f64, name: impl Into<String>) -> Self {
        self.pattern = factor;
        self.matched_pattern = Some(name.into());
        self.raw_score = self.calculate_raw();
        self
    }

    pub fn with_chronic(mut self, factor: f64) -> Self {
        self.chronic = factor;
        self.raw_score = self.calculate_raw();
        self
    }

    pub fn calculate_raw(&self) -> f64 {
        self.base * self.prevalence * self.age * self.pattern * self.chronic
    }

    /// One-line human readable explanation, listing only non-neutral factors.
    pub fn explain(&self) -> String {
        let mut text = format!("base {:.2} x prevalence {:.1}", self.base, self.prevalence);
        if self.age != 1.0 {
            let _ = write!(text, " x age {:.1}", self.age);
        }
        if self.pattern != 1.0 {
            match &self.matched_pattern {
                Some(name) => {
                    let _ = write!(text, " x pattern {:.1} ({name})", self.pattern);
                }
                None => {
                    let _ = write!(text, " x pattern {:.1}", self.pattern);
                }
            }
        }
        if self.chronic != 1.0 {
            let _ = write!(text, " x chronic {:.1}", self.chronic);
        }
        let _ = write!(text, " = {:.3}", self.raw_score);
        text
    }
}
