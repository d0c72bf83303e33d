use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Population frequency class of a condition. Drives the prevalence multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrevalenceClass {
    VeryCommon,
    Common,
    Uncommon,
    Rare,
    VeryRare,
}

impl PrevalenceClass {
    pub const ALL: [PrevalenceClass; 5] = [
        PrevalenceClass::VeryCommon,
        PrevalenceClass::Common,
        PrevalenceClass::Uncommon,
        PrevalenceClass::Rare,
        PrevalenceClass::VeryRare,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryCommon => "very common",
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::VeryRare => "very rare",
        }
    }
}

impl fmt::Display for PrevalenceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive age range a condition correlates with, written `"65+"` or `"41-60"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgeTag {
    pub min: u32,
    pub max: Option<u32>,
}

impl AgeTag {
    pub fn contains(&self, age: u32) -> bool {
        age >= self.min && self.max.map_or(true, |max| age <= max)
    }

    /// Parse an age group string. `"all"`, `"all ages"` and blanks mean "no tag".
    pub fn parse_group(value: &str) -> Result<Option<Self>, String> {
        let trimmed = value.trim().to_ascii_lowercase();
        if trimmed.is_empty() || trimmed == "all" || trimmed == "all ages" {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl FromStr for AgeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse_bound = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("'{s}' is not an age group"))
        };

        if let Some(lower) = s.strip_suffix('+') {
            return Ok(Self {
                min: parse_bound(lower)?,
                max: None,
            });
        }

        let (lower, upper) = s
            .split_once('-')
            .ok_or_else(|| format!("'{s}' is not an age group"))?;
        let (min, max) = (parse_bound(lower)?, parse_bound(upper)?);
        if min > max {
            return Err(format!("age group '{s}' has its bounds reversed"));
        }
        Ok(Self {
            min,
            max: Some(max),
        })
    }
}

impl fmt::Display for AgeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

/// Severity qualifier detected at the start of a symptom phrase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    #[default]
    Unspecified,
    Moderate,
    Severe,
}

impl Severity {
    /// Qualifier words and the severity they signal.
    pub const QUALIFIERS: [(&'static str, Severity); 11] = [
        ("mild", Severity::Mild),
        ("slight", Severity::Mild),
        ("minor", Severity::Mild),
        ("moderate", Severity::Moderate),
        ("severe", Severity::Severe),
        ("intense", Severity::Severe),
        ("extreme", Severity::Severe),
        ("unbearable", Severity::Severe),
        ("sudden", Severity::Severe),
        ("very", Severity::Severe),
        ("really", Severity::Severe),
    ];

    pub fn from_qualifier(word: &str) -> Option<Severity> {
        Self::QUALIFIERS
            .iter()
            .find(|(qualifier, _)| *qualifier == word)
            .map(|(_, severity)| *severity)
    }
}

/// Optional patient information that adjusts scoring.
///
/// Deserialization is permissive: a non-numeric or negative `age` becomes
/// `None`, and non-string chronic condition entries are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientContext {
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "lenient_conditions")]
    pub chronic_conditions: BTreeSet<String>,
}

impl PatientContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_chronic_condition(mut self, condition: impl Into<String>) -> Self {
        self.chronic_conditions.insert(condition.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.chronic_conditions.is_empty()
    }
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(age_from_value(&value))
}

fn age_from_value(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn lenient_conditions<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let entries = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        serde_json::Value::String(s) if !s.trim().is_empty() => BTreeSet::from([s]),
        _ => BTreeSet::new(),
    };
    Ok(entries)
}

/// One scoring request: raw phrases plus optional patient context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Free-text description, split into phrases before matching
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub patient: Option<PatientContext>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_age_tag_parsing() {
        assert_eq!(
            "65+".parse::<AgeTag>().unwrap(),
            AgeTag { min: 65, max: None }
        );
        assert_eq!(
            " 41 - 60 ".parse::<AgeTag>().unwrap(),
            AgeTag {
                min: 41,
                max: Some(60)
            }
        );
        assert!("sixty".parse::<AgeTag>().is_err());
        assert!("60-41".parse::<AgeTag>().is_err());
        assert_eq!(AgeTag::parse_group("All ages").unwrap(), None);
        assert_eq!(AgeTag::parse_group("").unwrap(), None);
    }

    #[test]
    fn test_age_tag_contains_is_inclusive() {
        let tag: AgeTag = "0-12".parse().unwrap();
        assert!(tag.contains(0));
        assert!(tag.contains(12));
        assert!(!tag.contains(13));

        let open: AgeTag = "65+".parse().unwrap();
        assert!(!open.contains(64));
        assert!(open.contains(65));
        assert!(open.contains(101));
        assert_eq!(open.to_string(), "65+");
    }

    #[test]
    fn test_patient_context_ignores_malformed_age() {
        let ctx: PatientContext =
            serde_json::from_str(r#"{"age": "sixty", "chronic_conditions": ["asthma"]}"#).unwrap();
        assert_eq!(ctx.age, None);
        assert!(ctx.chronic_conditions.contains("asthma"));

        let ctx: PatientContext = serde_json::from_str(r#"{"age": -4}"#).unwrap();
        assert_eq!(ctx.age, None);

        let ctx: PatientContext = serde_json::from_str(r#"{"age": "72"}"#).unwrap();
        assert_eq!(ctx.age, Some(72));

        let ctx: PatientContext = serde_json::from_str(r#"{"age": 34.0}"#).unwrap();
        assert_eq!(ctx.age, Some(34));
    }

    #[test]
    fn test_patient_context_drops_malformed_conditions() {
        let ctx: PatientContext =
            serde_json::from_str(r#"{"chronic_conditions": ["diabetes", 7, null, " "]}"#).unwrap();
        assert_eq!(ctx.chronic_conditions, BTreeSet::from(["diabetes".to_string()]));

        let ctx: PatientContext = serde_json::from_str(r#"{"chronic_conditions": 12}"#).unwrap();
        assert!(ctx.chronic_conditions.is_empty());
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_severity_qualifiers() {
        assert_eq!(Severity::from_qualifier("severe"), Some(Severity::Severe));
        assert_eq!(Severity::from_qualifier("slight"), Some(Severity::Mild));
        assert_eq!(Severity::from_qualifier("headache"), None);
    }
}
