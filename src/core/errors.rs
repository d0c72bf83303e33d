//! Shared error types for the application

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for symptomap operations
///
/// Only loading can fail. Scoring a query never returns an error: unmatched
/// phrases and empty results are reported as data.
#[derive(Debug, Error)]
pub enum Error {
    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A knowledge base or configuration document could not be deserialized
    #[error("Failed to parse {format} document {}: {message}", .path.display())]
    Parse {
        format: DocumentFormat,
        path: PathBuf,
        message: String,
    },

    /// Document extension is not one of toml/json/yaml/yml
    #[error("Unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The knowledge base references undefined entries or carries malformed values
    #[error("Knowledge base failed integrity check with {} violation(s):\n{}", .0.len(), format_violations(.0))]
    Integrity(Vec<IntegrityViolation>),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Create a parse error for a document
    pub fn parse(
        format: DocumentFormat,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            format,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Violations carried by an integrity failure, empty for other variants
    pub fn violations(&self) -> &[IntegrityViolation] {
        match self {
            Self::Integrity(violations) => violations,
            _ => &[],
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Serialization format of a knowledge base or configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub const ALL_EXTENSIONS: [&'static str; 4] = ["toml", "json", "yaml", "yml"];
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml => write!(f, "TOML"),
            Self::Json => write!(f, "JSON"),
            Self::Yaml => write!(f, "YAML"),
        }
    }
}

/// A single startup-time integrity problem in the knowledge base.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityViolation {
    DuplicateCondition(String),
    DuplicateSymptom(String),
    /// A synonym claimed by two canonical symptoms, or equal to another canonical name
    AmbiguousSynonym {
        synonym: String,
        first: String,
        second: String,
    },
    UndefinedCondition {
        condition: String,
        symptom: String,
    },
    UndefinedSymptom {
        condition: String,
        symptom: String,
    },
    DuplicateEdge {
        condition: String,
        symptom: String,
    },
    WeightOutOfRange {
        condition: String,
        symptom: String,
        weight: f64,
    },
    InvalidAgeGroup {
        condition: String,
        value: String,
    },
    EmptyPattern {
        condition: String,
        pattern: String,
    },
    /// A pattern names a symptom the condition has no edge to
    PatternSymptomNotLinked {
        condition: String,
        pattern: String,
        symptom: String,
    },
    EmptyName(&'static str),
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateCondition(name) => write!(f, "condition '{name}' is defined twice"),
            Self::DuplicateSymptom(name) => write!(f, "symptom '{name}' is defined twice"),
            Self::AmbiguousSynonym {
                synonym,
                first,
                second,
            } => write!(
                f,
                "synonym '{synonym}' maps to both '{first}' and '{second}'"
            ),
            Self::UndefinedCondition { condition, symptom } => write!(
                f,
                "edge '{condition}' -> '{symptom}' references undefined condition '{condition}'"
            ),
            Self::UndefinedSymptom { condition, symptom } => write!(
                f,
                "edge '{condition}' -> '{symptom}' references undefined symptom '{symptom}'"
            ),
            Self::DuplicateEdge { condition, symptom } => {
                write!(f, "edge '{condition}' -> '{symptom}' is defined twice")
            }
            Self::WeightOutOfRange {
                condition,
                symptom,
                weight,
            } => write!(
                f,
                "edge '{condition}' -> '{symptom}' has weight {weight} outside [0, 1]"
            ),
            Self::InvalidAgeGroup { condition, value } => write!(
                f,
                "condition '{condition}' has unparseable age group '{value}'"
            ),
            Self::EmptyPattern { condition, pattern } => {
                write!(f, "pattern '{pattern}' of '{condition}' has no symptoms")
            }
            Self::PatternSymptomNotLinked {
                condition,
                pattern,
                symptom,
            } => write!(
                f,
                "pattern '{pattern}' of '{condition}' names '{symptom}', which has no edge to the condition"
            ),
            Self::EmptyName(kind) => write!(f, "a {kind} has an empty name"),
        }
    }
}

fn format_violations(violations: &[IntegrityViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
