use crate::config::NormalizationBounds;

/// Linear mapping of raw scores onto display probabilities.
///
/// The largest raw score in a result set maps to the ceiling, the smallest
/// nonzero one to the floor, and everything in between is interpolated and
/// clamped. Zero scores sit at the floor whenever some score is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreNormalizer {
    min: f64,
    max: f64,
    bounds: NormalizationBounds,
}

impl ScoreNormalizer {
    pub fn from_scores(scores: &[f64], bounds: NormalizationBounds) -> Self {
        let finite = scores.iter().copied().filter(|s| s.is_finite());
        let max = finite.clone().fold(f64::NEG_INFINITY, f64::max);
        let min = finite.filter(|s| *s > 0.0).fold(f64::INFINITY, f64::min);
        Self { min, max, bounds }
    }

    pub fn normalize(&self, raw_score: f64) -> f64 {
        let NormalizationBounds { floor, ceiling } = self.bounds;
        if raw_score <= 0.0 && self.max > 0.0 {
            return floor;
        }

        let span = self.max - self.min;

        // A single score, or a set of equal scores, sits at the ceiling.
        if !span.is_finite() || span <= f64::EPSILON {
            return ceiling;
        }

        let fraction = (raw_score - self.min) / span;
        (floor + fraction * (ceiling - floor)).clamp(floor, ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds() -> NormalizationBounds {
        NormalizationBounds::default()
    }

    #[test]
    fn test_extremes_map_to_floor_and_ceiling() {
        let normalizer = ScoreNormalizer::from_scores(&[1.0, 2.0, 5.0], bounds());
        assert_eq!(normalizer.normalize(5.0), 95.0);
        assert_eq!(normalizer.normalize(1.0), 5.0);
        assert!((normalizer.normalize(3.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_scores_all_get_ceiling() {
        let normalizer = ScoreNormalizer::from_scores(&[2.4, 2.4], bounds());
        assert_eq!(normalizer.normalize(2.4), 95.0);

        let single = ScoreNormalizer::from_scores(&[0.7], bounds());
        assert_eq!(single.normalize(0.7), 95.0);
    }

    #[test]
    fn test_minimum_nonzero_score_maps_to_floor() {
        let normalizer = ScoreNormalizer::from_scores(&[0.0, 0.5, 1.0], bounds());
        assert_eq!(normalizer.normalize(1.0), 95.0);
        assert_eq!(normalizer.normalize(0.5), 5.0);
        assert_eq!(normalizer.normalize(0.0), 5.0);
    }

    #[test]
    fn test_zero_beside_single_positive_score() {
        let normalizer = ScoreNormalizer::from_scores(&[0.0, 0.8], bounds());
        assert_eq!(normalizer.normalize(0.8), 95.0);
        assert_eq!(normalizer.normalize(0.0), 5.0);

        let all_zero = ScoreNormalizer::from_scores(&[0.0, 0.0], bounds());
        assert_eq!(all_zero.normalize(0.0), 95.0);
    }

    #[test]
    fn test_values_outside_observed_range_are_clamped() {
        let normalizer = ScoreNormalizer::from_scores(&[1.0, 3.0], bounds());
        assert_eq!(normalizer.normalize(10.0), 95.0);
        assert_eq!(normalizer.normalize(-1.0), 5.0);
    }

    proptest! {
        #[test]
        fn prop_normalized_within_bounds(scores in prop::collection::vec(0.001f64..100.0, 1..20)) {
            let normalizer = ScoreNormalizer::from_scores(&scores, bounds());
            for score in &scores {
                let p = normalizer.normalize(*score);
                prop_assert!((5.0..=95.0).contains(&p));
            }
        }

        #[test]
        fn prop_normalization_preserves_order(a in 0.001f64..50.0, b in 0.001f64..50.0) {
            let normalizer = ScoreNormalizer::from_scores(&[a, b], bounds());
            if a < b {
                prop_assert!(normalizer.normalize(a) <= normalizer.normalize(b));
            }
        }
    }
}
