use crate::matching::{StrategyKind, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const THRESHOLD_RANGE: RangeInclusive<f64> = 0.80..=1.00;

/// Fuzzy matcher tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum similarity for a fuzzy candidate to be accepted
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default)]
    pub strategy: StrategyKind,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            strategy: StrategyKind::default(),
        }
    }
}

impl MatchingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if THRESHOLD_RANGE.contains(&self.threshold) {
            Ok(())
        } else {
            Err(format!(
                "matching threshold must lie in [0.80, 1.00], got {}",
                self.threshold
            ))
        }
    }
}

pub fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}
