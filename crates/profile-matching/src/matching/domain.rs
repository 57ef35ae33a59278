use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Job role a candidate is evaluated against.
    PositionId
);
record_id!(AspectId);
record_id!(CriterionId);
record_id!(TargetProfileId);
record_id!(
    /// Person being evaluated.
    CandidateId
);
record_id!(ScoreId);
record_id!(
    /// Ledger-assigned identifier of a persisted match result.
    ResultId
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub name: String,
    pub description: String,
}

/// Weighted grouping of criteria. `percentage` is informational and does not take part
/// in matching arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub id: AspectId,
    pub name: String,
    pub description: String,
    pub percentage: f64,
}

/// Individual evaluated competency.
///
/// `weight` is carried for display only: factors are plain means of the resolved gap
/// weights, never weighted by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub aspect_id: AspectId,
    pub code: String,
    pub name: String,
    pub is_core: bool,
    pub weight: f64,
}

impl Criterion {
    pub fn track(&self) -> Track {
        if self.is_core {
            Track::Core
        } else {
            Track::Secondary
        }
    }
}

/// The two independent scoring tracks a criterion can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Core,
    Secondary,
}

impl Track {
    pub const fn label(self) -> &'static str {
        match self {
            Track::Core => "core",
            Track::Secondary => "secondary",
        }
    }
}

/// Desired score for a position on one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProfile {
    pub id: TargetProfileId,
    pub position_id: PositionId,
    pub criterion_id: CriterionId,
    pub target_value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub national_id: String,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub address: String,
    pub phone: String,
}

/// A candidate's actual value for one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub id: ScoreId,
    pub candidate_id: CandidateId,
    pub criterion_id: CriterionId,
    pub value: f64,
}

/// Calculated outcome waiting to be appended to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMatchResult {
    pub candidate_id: CandidateId,
    pub position_id: PositionId,
    pub total_score: f64,
    pub core_factor: f64,
    pub secondary_factor: f64,
}

/// Historical snapshot of one candidate's calculation against one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: ResultId,
    pub candidate_id: CandidateId,
    pub position_id: PositionId,
    pub total_score: f64,
    pub core_factor: f64,
    pub secondary_factor: f64,
    pub created_at: DateTime<Utc>,
}

impl MatchResult {
    pub fn from_new(id: ResultId, result: NewMatchResult, created_at: DateTime<Utc>) -> Self {
        let NewMatchResult {
            candidate_id,
            position_id,
            total_score,
            core_factor,
            secondary_factor,
        } = result;

        Self {
            id,
            candidate_id,
            position_id,
            total_score,
            core_factor,
            secondary_factor,
            created_at,
        }
    }
}
