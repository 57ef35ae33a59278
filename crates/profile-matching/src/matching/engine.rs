use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    CandidateId, Criterion, CriterionId, NewMatchResult, PositionId, TargetProfile, Track,
};
use super::gap::resolve_weight;

/// Shares of the two factor tracks in the total score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub core_share: f64,
    pub secondary_share: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            core_share: 0.6,
            secondary_share: 0.4,
        }
    }
}

/// Stateless scorer applying the gap table to one candidate at a time.
pub struct MatchingEngine {
    config: MatchingConfig,
}

impl MatchingEngine {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Score a candidate against `targets`, walking them in order.
    ///
    /// Target rows whose criterion is missing from `criteria`, or for which the
    /// candidate has no value, contribute nothing and are reported in `skipped`.
    pub fn score(
        &self,
        targets: &[TargetProfile],
        criteria: &HashMap<CriterionId, Criterion>,
        values: &HashMap<CriterionId, f64>,
    ) -> Scorecard {
        let mut core = TrackTally::default();
        let mut secondary = TrackTally::default();
        let mut components = Vec::new();
        let mut skipped = Vec::new();

        for target in targets {
            let Some(criterion) = criteria.get(&target.criterion_id) else {
                skipped.push(SkippedCriterion {
                    criterion_id: target.criterion_id,
                    reason: SkipReason::UnknownCriterion,
                });
                continue;
            };

            let Some(&actual) = values.get(&target.criterion_id) else {
                skipped.push(SkippedCriterion {
                    criterion_id: target.criterion_id,
                    reason: SkipReason::MissingScore,
                });
                continue;
            };

            let gap = actual - target.target_value;
            let weight = resolve_weight(gap);
            let track = criterion.track();

            match track {
                Track::Core => core.record(weight),
                Track::Secondary => secondary.record(weight),
            }

            components.push(GapComponent {
                criterion_id: criterion.id,
                code: criterion.code.clone(),
                track,
                target: target.target_value,
                actual,
                gap,
                weight,
            });
        }

        let core_factor = core.mean();
        let secondary_factor = secondary.mean();
        let total_score =
            self.config.core_share * core_factor + self.config.secondary_share * secondary_factor;

        Scorecard {
            core_factor,
            secondary_factor,
            total_score,
            components,
            skipped,
        }
    }
}

#[derive(Debug, Default)]
struct TrackTally {
    sum: f64,
    count: usize,
}

impl TrackTally {
    fn record(&mut self, weight: f64) {
        self.sum += weight;
        self.count += 1;
    }

    /// Zero when the track had no observations.
    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// One criterion's contribution, kept so a score can be audited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapComponent {
    pub criterion_id: CriterionId,
    pub code: String,
    pub track: Track,
    pub target: f64,
    pub actual: f64,
    pub gap: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnknownCriterion,
    MissingScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCriterion {
    pub criterion_id: CriterionId,
    pub reason: SkipReason,
}

/// Factors for a single candidate plus the trail that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub core_factor: f64,
    pub secondary_factor: f64,
    pub total_score: f64,
    pub components: Vec<GapComponent>,
    pub skipped: Vec<SkippedCriterion>,
}

impl Scorecard {
    pub fn to_result(&self, candidate_id: CandidateId, position_id: PositionId) -> NewMatchResult {
        NewMatchResult {
            candidate_id,
            position_id,
            total_score: self.total_score,
            core_factor: self.core_factor,
            secondary_factor: self.secondary_factor,
        }
    }
}
