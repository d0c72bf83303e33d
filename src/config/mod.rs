//! `.symptomap.toml` configuration.
//!
//! Sections are optional and individually validated: a bad value replaces
//! only its own section with defaults and logs a warning.

pub mod core;
pub mod loader;
pub mod matching;
pub mod scoring;

pub use self::core::{OutputConfig, SymptomapConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, resolve_config, CONFIG_FILE_NAME,
};
pub use matching::MatchingConfig;
pub use scoring::{
    MultiplierTable, NormalizationBounds, PatternConfig, RankingConfig, ScoringConfig,
};

/// Default configuration file contents written by `symptomap init`
pub const DEFAULT_CONFIG_TOML: &str = r#"# symptomap configuration

[multipliers]
# Prevalence class multipliers
very_common = 2.0
common = 1.5
uncommon = 1.0
rare = 0.6
very_rare = 0.3
# Patient age inside the condition's age group
age = 1.2
# Known symptom combination matched
pattern = 2.5
# Chronic condition matches the condition's affinities
chronic = 1.6

[normalization]
# Display probability range
floor = 5.0
ceiling = 95.0

[matching]
# Minimum similarity for a fuzzy match, within [0.80, 1.00]
threshold = 0.85
# token_sort, levenshtein or subsequence
strategy = "token_sort"

[ranking]
top_n = 5

[patterns]
# Fraction of a pattern's symptoms that must be present
min_coverage = 0.75

[output]
# terminal, json or markdown
default_format = "terminal"
"#;
