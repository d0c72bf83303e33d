use super::matching::MatchingConfig;
use super::scoring::{
    MultiplierTable, NormalizationBounds, PatternConfig, RankingConfig, ScoringConfig,
};
use crate::triage::TriageRules;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Root configuration structure for symptomap
///
/// Every section is optional; an absent section means its defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SymptomapConfig {
    /// Prevalence, age, pattern and chronic multipliers
    #[serde(default)]
    pub multipliers: Option<MultiplierTable>,

    /// Display probability bounds
    #[serde(default)]
    pub normalization: Option<NormalizationBounds>,

    /// Fuzzy matcher threshold and strategy
    #[serde(default)]
    pub matching: Option<MatchingConfig>,

    #[serde(default)]
    pub ranking: Option<RankingConfig>,

    /// Pattern bonus coverage requirement
    #[serde(default)]
    pub patterns: Option<PatternConfig>,

    #[serde(default)]
    pub output: Option<OutputConfig>,

    /// Rule-based triage term lists and combinations
    #[serde(default)]
    pub triage: Option<TriageRules>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// terminal, json or markdown
    pub default_format: Option<String>,
    /// Enable colored output (default: auto-detect based on TTY)
    #[serde(default)]
    pub use_color: Option<bool>,
}

impl SymptomapConfig {
    pub fn multipliers(&self) -> MultiplierTable {
        self.multipliers.unwrap_or_default()
    }

    pub fn normalization(&self) -> NormalizationBounds {
        self.normalization.unwrap_or_default()
    }

    pub fn matching(&self) -> MatchingConfig {
        self.matching.unwrap_or_default()
    }

    pub fn ranking(&self) -> RankingConfig {
        self.ranking.unwrap_or_default()
    }

    pub fn patterns(&self) -> PatternConfig {
        self.patterns.unwrap_or_default()
    }

    pub fn output(&self) -> OutputConfig {
        self.output.clone().unwrap_or_default()
    }

    pub fn triage(&self) -> TriageRules {
        self.triage.clone().unwrap_or_default()
    }

    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig {
            multipliers: self.multipliers(),
            normalization: self.normalization(),
            ranking: self.ranking(),
            patterns: self.patterns(),
        }
    }

    /// Replace every invalid section with its defaults.
    ///
    /// Returns one message per replaced section; each is also logged at `warn`.
    pub fn validate_sections(&mut self) -> Vec<String> {
        let mut replaced = Vec::new();

        reset_if_invalid(&mut self.multipliers, "multipliers", MultiplierTable::validate, &mut replaced);
        reset_if_invalid(
            &mut self.normalization,
            "normalization",
            NormalizationBounds::validate,
            &mut replaced,
        );
        reset_if_invalid(&mut self.matching, "matching", MatchingConfig::validate, &mut replaced);
        reset_if_invalid(&mut self.ranking, "ranking", RankingConfig::validate, &mut replaced);
        reset_if_invalid(&mut self.patterns, "patterns", PatternConfig::validate, &mut replaced);
        reset_if_invalid(&mut self.triage, "triage", TriageRules::validate, &mut replaced);

        replaced
    }
}

fn reset_if_invalid<T: Default>(
    section: &mut Option<T>,
    name: &str,
    validate: impl Fn(&T) -> Result<(), String>,
    replaced: &mut Vec<String>,
) {
    let Some(value) = section.as_mut() else {
        return;
    };
    if let Err(e) = validate(value) {
        warn!(section = name, error = %e, "invalid configuration section, using defaults");
        replaced.push(format!("[{name}] {e}"));
        *value = T::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::StrategyKind;
    use indoc::indoc;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: SymptomapConfig = toml::from_str("").unwrap();
        assert_eq!(config.scoring(), ScoringConfig::default());
        assert_eq!(config.matching(), MatchingConfig::default());
        assert_eq!(config.triage(), TriageRules::default());
    }

    #[test]
    fn test_sections_parse() {
        let config: SymptomapConfig = toml::from_str(indoc! {r#"
            [multipliers]
            very_common = 3.0

            [matching]
            threshold = 0.9
            strategy = "levenshtein"

            [ranking]
            top_n = 3

            [output]
            default_format = "json"
        "#})
        .unwrap();

        assert_eq!(config.multipliers().very_common, 3.0);
        assert_eq!(config.multipliers().common, 1.5);
        assert_eq!(config.matching().strategy, StrategyKind::Levenshtein);
        assert_eq!(config.ranking().top_n, 3);
        assert_eq!(config.output().default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_invalid_section_falls_back_to_defaults() {
        let mut config: SymptomapConfig = toml::from_str(indoc! {r#"
            [normalization]
            floor = 90.0
            ceiling = 10.0

            [ranking]
            top_n = 2
        "#})
        .unwrap();

        let replaced = config.validate_sections();
        assert_eq!(replaced.len(), 1);
        assert!(replaced[0].starts_with("[normalization]"));
        assert_eq!(config.normalization(), NormalizationBounds::default());
        assert_eq!(config.ranking().top_n, 2);
    }
}
