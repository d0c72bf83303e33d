// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod io;
pub mod knowledge;
pub mod matching;
pub mod observability;
pub mod report;
pub mod scoring;
pub mod triage;

// Re-export commonly used types
pub use crate::core::{
    AgeTag, Error, IntegrityViolation, PatientContext, PrevalenceClass, Query, Result, Severity,
};

pub use crate::config::SymptomapConfig;

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::knowledge::{Condition, KnowledgeBase, Symptom};

pub use crate::matching::{
    MatchMethod, SimilarityStrategy, StrategyKind, SymptomMatch, SymptomMatcher,
};

pub use crate::report::{
    ConfidenceLevel, RankedCondition, ReportAnalysis, ScoreReport, SymptomInterpretation,
};

pub use crate::scoring::{DiseaseScorer, ScoreBreakdown, ScoreNormalizer};

pub use crate::triage::{assess, TriageAssessment, TriageRules, UrgencyLevel};
