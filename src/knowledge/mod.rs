//! Symptom/condition knowledge base.
//!
//! Loaded once at startup from a conditions document and a synonyms document,
//! integrity-checked, and then shared read-only by every scoring request.

pub mod base;
pub mod document;
pub mod loader;

pub use base::{
    Condition, ConditionId, Edge, KnowledgeBase, KnowledgeBaseStats, Symptom, SymptomId,
    SymptomPattern,
};
pub use document::{
    ConditionRecord, ConditionsDocument, EdgeRecord, PatternRecord, SymptomRecord,
    SynonymsDocument,
};
pub use loader::{load, load_builtin, load_from_dir};

impl KnowledgeBase {
    /// The knowledge base embedded in the binary.
    pub fn builtin() -> crate::core::Result<Self> {
        load_builtin()
    }
}
