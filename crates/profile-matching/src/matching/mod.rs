//! Profile matching: gap-weighted comparison of candidate competency scores against a
//! position's target profile, with an append-only ledger of computed results.

pub mod domain;
pub(crate) mod engine;
pub mod gap;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    Aspect, AspectId, Candidate, CandidateId, CandidateScore, Criterion, CriterionId,
    MatchResult, NewMatchResult, Position, PositionId, ResultId, ScoreId, TargetProfile,
    TargetProfileId, Track,
};
pub use engine::{
    GapComponent, MatchingConfig, MatchingEngine, Scorecard, SkipReason, SkippedCriterion,
};
pub use gap::resolve_weight;
pub use ranking::{rank_results, RankedResult};
pub use repository::{ProfileCatalog, RepositoryError, ResultLedger};
pub use router::matching_router;
pub use service::{
    CalculationRequest, MatchingError, MatchingErrorKind, ProfileMatchingService, ResultView,
};
pub use store::{InMemoryCatalog, InMemoryLedger};
