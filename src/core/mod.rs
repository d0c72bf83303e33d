pub mod errors;
pub mod types;

pub use errors::{DocumentFormat, Error, IntegrityViolation, Result};
pub use types::{AgeTag, PatientContext, PrevalenceClass, Query, Severity};

/// Normalise a phrase or name for comparison: trim, lowercase, collapse whitespace.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
