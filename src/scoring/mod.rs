pub mod breakdown;
pub mod engine;
pub mod normalizer;
pub mod patterns;

pub use breakdown::ScoreBreakdown;
pub use engine::{DiseaseScorer, ScoredCondition};
pub use normalizer::ScoreNormalizer;
pub use patterns::{best_pattern, PatternHit};
