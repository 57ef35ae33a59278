use super::domain::{
    Candidate, CandidateId, CandidateScore, Criterion, MatchResult, NewMatchResult, Position,
    PositionId, ResultId, TargetProfile,
};

/// Read access to the competency data maintained by the CRUD layer.
///
/// Every calculation re-reads through this trait; implementations must not rely on the
/// caller caching anything between runs.
pub trait ProfileCatalog: Send + Sync {
    fn get_position(&self, id: PositionId) -> Result<Option<Position>, RepositoryError>;
    fn list_target_profiles(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<TargetProfile>, RepositoryError>;
    fn list_criteria(&self) -> Result<Vec<Criterion>, RepositoryError>;
    fn get_candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn list_scores(&self) -> Result<Vec<CandidateScore>, RepositoryError>;
    fn list_scores_by_candidate(
        &self,
        candidate_id: CandidateId,
    ) -> Result<Vec<CandidateScore>, RepositoryError>;
}

/// Append-only store of calculated results.
pub trait ResultLedger: Send + Sync {
    /// Append a batch atomically, returning the rows with their assigned ids and
    /// timestamps in input order. On error nothing from the batch is visible.
    fn save_batch(&self, batch: Vec<NewMatchResult>) -> Result<Vec<MatchResult>, RepositoryError>;
    /// All results, best `total_score` first.
    fn list_all(&self) -> Result<Vec<MatchResult>, RepositoryError>;
    /// Results for one position, best `total_score` first.
    fn list_by_position(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<MatchResult>, RepositoryError>;
    fn get(&self, id: ResultId) -> Result<Option<MatchResult>, RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
