//! Serialized shapes of the two knowledge base sources.
//!
//! The conditions document carries condition metadata plus one row per
//! condition/symptom edge. The synonyms document carries one group per
//! canonical symptom. Both accept singular table names (`[[condition]]`,
//! `[[edge]]`, `[[symptom]]`) as TOML writes them, and plural keys as JSON
//! and YAML usually do.

use crate::core::PrevalenceClass;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionsDocument {
    #[serde(default, rename = "condition", alias = "conditions")]
    pub conditions: Vec<ConditionRecord>,
    #[serde(default, rename = "edge", alias = "edges")]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionRecord {
    pub name: String,
    pub prevalence: PrevalenceClass,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub chronic_affinities: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<PatternRecord>,
}

/// A curated symptom combination that earns the pattern bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternRecord {
    #[serde(default)]
    pub name: Option<String>,
    pub symptoms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeRecord {
    pub condition: String,
    pub symptom: String,
    pub weight: f64,
    #[serde(default)]
    pub critical: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SynonymsDocument {
    #[serde(default, rename = "symptom", alias = "symptoms")]
    pub symptoms: Vec<SymptomRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymptomRecord {
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}
