//! Gap-to-weight lookup.
//!
//! A gap is `candidate value - target value`. Only exact integral gaps in `-4..=4` carry
//! weight; anything else, fractional gaps included, resolves to zero. Excess competency
//! is penalised less than the same amount of deficiency.

/// Weight awarded for a perfect match.
pub const MAX_WEIGHT: f64 = 5.0;

const GAP_WEIGHTS: [(f64, f64); 9] = [
    (0.0, MAX_WEIGHT),
    (1.0, 4.5),
    (-1.0, 4.0),
    (2.0, 3.5),
    (-2.0, 3.0),
    (3.0, 2.5),
    (-3.0, 2.0),
    (4.0, 1.5),
    (-4.0, 1.0),
];

/// Resolve a signed gap to its weight. Total over every `f64`, NaN included.
pub fn resolve_weight(gap: f64) -> f64 {
    GAP_WEIGHTS
        .iter()
        .find(|(key, _)| *key == gap)
        .map(|(_, weight)| *weight)
        .unwrap_or(0.0)
}
