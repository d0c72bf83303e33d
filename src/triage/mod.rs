//! Rule-based urgency classification over a score report.
//!
//! Advisory only: term lists, dangerous symptom combinations and critical
//! flags decide between self-care, a GP visit, urgent care and emergency care.

pub mod assessment;
pub mod rules;

pub use assessment::{assess, TriageAssessment, DEFAULT_DEPARTMENT};
pub use rules::{DangerousCombination, TriageRules, UrgencyLevel};
