//! Scoring configuration for condition ranking
//!
//! This module contains the tunable numbers of the scoring pipeline:
//! - Prevalence, age, pattern and chronic multipliers
//! - Normalization floor and ceiling
//! - Ranking cut-off
//! - Pattern coverage requirement

use crate::core::PrevalenceClass;
use serde::{Deserialize, Serialize};

/// The fixed multiplier table applied to every condition's base score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTable {
    #[serde(default = "default_very_common")]
    pub very_common: f64,

    #[serde(default = "default_common")]
    pub common: f64,

    #[serde(default = "default_uncommon")]
    pub uncommon: f64,

    #[serde(default = "default_rare")]
    pub rare: f64,

    #[serde(default = "default_very_rare")]
    pub very_rare: f64,

    /// Applied when the patient's age falls inside the condition's age tag
    #[serde(default = "default_age")]
    pub age: f64,

    /// Applied when a known symptom combination is matched
    #[serde(default = "default_pattern")]
    pub pattern: f64,

    /// Applied when a chronic condition matches the condition's affinities
    #[serde(default = "default_chronic")]
    pub chronic: f64,
}

impl Default for MultiplierTable {
    fn default() -> Self {
        Self {
            very_common: default_very_common(),
            common: default_common(),
            uncommon: default_uncommon(),
            rare: default_rare(),
            very_rare: default_very_rare(),
            age: default_age(),
            pattern: default_pattern(),
            chronic: default_chronic(),
        }
    }
}

impl MultiplierTable {
    pub fn prevalence(&self, class: PrevalenceClass) -> f64 {
        match class {
            PrevalenceClass::VeryCommon => self.very_common,
            PrevalenceClass::Common => self.common,
            PrevalenceClass::Uncommon => self.uncommon,
            PrevalenceClass::Rare => self.rare,
            PrevalenceClass::VeryRare => self.very_rare,
        }
    }

    // Pure function: Check a single multiplier
    pub fn validate_multiplier(value: f64, name: &str) -> Result<(), String> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(format!("{name} multiplier must be a positive number, got {value}"))
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        [
            (self.very_common, "very_common"),
            (self.common, "common"),
            (self.uncommon, "uncommon"),
            (self.rare, "rare"),
            (self.very_rare, "very_rare"),
            (self.age, "age"),
            (self.pattern, "pattern"),
            (self.chronic, "chronic"),
        ]
        .into_iter()
        .try_for_each(|(value, name)| Self::validate_multiplier(value, name))
    }
}

pub fn default_very_common() -> f64 {
    2.0
}
pub fn default_common() -> f64 {
    1.5
}
pub fn default_uncommon() -> f64 {
    1.0
}
pub fn default_rare() -> f64 {
    0.6
}
pub fn default_very_rare() -> f64 {
    0.3
}
pub fn default_age() -> f64 {
    1.2
}
pub fn default_pattern() -> f64 {
    2.5
}
pub fn default_chronic() -> f64 {
    1.6
}

/// Display-probability bounds for linear normalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationBounds {
    #[serde(default = "default_floor")]
    pub floor: f64,

    #[serde(default = "default_ceiling")]
    pub ceiling: f64,
}

impl Default for NormalizationBounds {
    fn default() -> Self {
        Self {
            floor: default_floor(),
            ceiling: default_ceiling(),
        }
    }
}

impl NormalizationBounds {
    pub fn validate(&self) -> Result<(), String> {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
        if !in_range(self.floor) || !in_range(self.ceiling) {
            return Err("floor and ceiling must lie within [0, 100]".to_string());
        }
        if self.floor >= self.ceiling {
            return Err(format!(
                "floor ({}) must be below ceiling ({})",
                self.floor, self.ceiling
            ));
        }
        Ok(())
    }
}

pub fn default_floor() -> f64 {
    5.0
}
pub fn default_ceiling() -> f64 {
    95.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Number of ranked conditions returned per query
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

impl RankingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.top_n == 0 {
            return Err("top_n must be at least 1".to_string());
        }
        Ok(())
    }
}

pub fn default_top_n() -> usize {
    5
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Fraction of a pattern's symptoms that must be matched for the bonus
    #[serde(default = "default_min_coverage")]
    pub min_coverage: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_coverage: default_min_coverage(),
        }
    }
}

impl PatternConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_coverage.is_finite() && self.min_coverage > 0.0 && self.min_coverage <= 1.0 {
            Ok(())
        } else {
            Err(format!(
                "min_coverage must lie in (0, 1], got {}",
                self.min_coverage
            ))
        }
    }
}

pub fn default_min_coverage() -> f64 {
    0.75
}

/// Everything the scorer needs, resolved from configuration sections
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoringConfig {
    pub multipliers: MultiplierTable,
    pub normalization: NormalizationBounds,
    pub ranking: RankingConfig,
    pub patterns: PatternConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_multipliers() {
        let table = MultiplierTable::default();
        assert_eq!(table.prevalence(PrevalenceClass::VeryCommon), 2.0);
        assert_eq!(table.prevalence(PrevalenceClass::Common), 1.5);
        assert_eq!(table.prevalence(PrevalenceClass::Uncommon), 1.0);
        assert_eq!(table.prevalence(PrevalenceClass::Rare), 0.6);
        assert_eq!(table.prevalence(PrevalenceClass::VeryRare), 0.3);
        assert_eq!(table.age, 1.2);
        assert_eq!(table.pattern, 2.5);
        assert_eq!(table.chronic, 1.6);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_partial_table_fills_defaults() {
        let table: MultiplierTable = toml::from_str("rare = 0.5").unwrap();
        assert_eq!(table.rare, 0.5);
        assert_eq!(table.very_common, 2.0);
    }

    #[test]
    fn test_rejects_non_positive_multiplier() {
        let table = MultiplierTable {
            chronic: 0.0,
            ..Default::default()
        };
        assert!(table.validate().unwrap_err().contains("chronic"));

        let table = MultiplierTable {
            age: f64::NAN,
            ..Default::default()
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_normalization_bounds_validation() {
        assert!(NormalizationBounds::default().validate().is_ok());
        assert!(NormalizationBounds {
            floor: 50.0,
            ceiling: 50.0
        }
        .validate()
        .is_err());
        assert!(NormalizationBounds {
            floor: 0.0,
            ceiling: 120.0
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_ranking_and_pattern_validation() {
        assert!(RankingConfig { top_n: 0 }.validate().is_err());
        assert!(PatternConfig { min_coverage: 0.0 }.validate().is_err());
        assert!(PatternConfig { min_coverage: 1.0 }.validate().is_ok());
    }
}
