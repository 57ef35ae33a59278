use std::cmp::Ordering;

use serde::Serialize;

use super::domain::MatchResult;

/// A result together with its 1-based place in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub rank: usize,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// Highest `total_score` first; ties go to the lower candidate id, then the older row.
pub fn compare_results(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.total_score
        .total_cmp(&a.total_score)
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn order_results(results: &mut [MatchResult]) {
    results.sort_by(compare_results);
}

/// Order `results` and number them. Ranks are never shared, even on equal scores.
pub fn rank_results(mut results: Vec<MatchResult>) -> Vec<RankedResult> {
    order_results(&mut results);
    results
        .into_iter()
        .enumerate()
        .map(|(index, result)| RankedResult {
            rank: index + 1,
            result,
        })
        .collect()
}
