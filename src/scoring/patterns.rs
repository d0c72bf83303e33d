use crate::knowledge::{SymptomId, SymptomPattern};
use std::collections::BTreeSet;

/// A pattern that qualified for the bonus, with how well it was covered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternHit<'a> {
    pub pattern: &'a SymptomPattern,
    pub coverage: f64,
    pub matched: usize,
}

/// Pick the single best qualifying pattern.
///
/// Coverage is `|pattern ∩ matched| / |pattern|` and must reach
/// `min_coverage`. Ranking: highest coverage, then most matched pattern
/// symptoms, then earliest declared.
pub fn best_pattern<'a>(
    patterns: &'a [SymptomPattern],
    matched: &BTreeSet<SymptomId>,
    min_coverage: f64,
) -> Option<PatternHit<'a>> {
    patterns
        .iter()
        .filter(|p| !p.symptoms.is_empty())
        .filter_map(|pattern| {
            let hits = pattern.symptoms.intersection(matched).count();
            let coverage = hits as f64 / pattern.symptoms.len() as f64;
            (coverage >= min_coverage).then_some(PatternHit {
                pattern,
                coverage,
                matched: hits,
            })
        })
        .fold(None, |best: Option<PatternHit<'a>>, hit| match best {
            Some(current)
                if current.coverage > hit.coverage
                    || (current.coverage == hit.coverage && current.matched >= hit.matched) =>
            {
                Some(current)
            }
            _ => Some(hit),
        })
}
