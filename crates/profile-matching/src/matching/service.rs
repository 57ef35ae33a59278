use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{
    Candidate, CandidateId, Criterion, CriterionId, MatchResult, Position, PositionId, ResultId,
    TargetProfile,
};
use super::engine::{MatchingConfig, MatchingEngine, Scorecard};
use super::ranking::rank_results;
use super::repository::{ProfileCatalog, RepositoryError, ResultLedger};

/// Request to score candidates against a position.
///
/// An empty `candidate_ids` means every candidate holding at least one score row,
/// whatever criteria those rows are for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub position_id: PositionId,
    #[serde(default)]
    pub candidate_ids: Vec<CandidateId>,
}

impl CalculationRequest {
    pub fn for_all(position_id: PositionId) -> Self {
        Self {
            position_id,
            candidate_ids: Vec::new(),
        }
    }
}

/// A stored result joined with the records it points at, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    #[serde(flatten)]
    pub result: MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Service composing the catalog, the scoring engine and the result ledger.
pub struct ProfileMatchingService<C, L> {
    catalog: Arc<C>,
    ledger: Arc<L>,
    engine: Arc<MatchingEngine>,
}

impl<C, L> ProfileMatchingService<C, L>
where
    C: ProfileCatalog + 'static,
    L: ResultLedger + 'static,
{
    pub fn new(catalog: Arc<C>, ledger: Arc<L>, config: MatchingConfig) -> Self {
        Self {
            catalog,
            ledger,
            engine: Arc::new(MatchingEngine::new(config)),
        }
    }

    pub fn catalog(&self) -> &Arc<C> {
        &self.catalog
    }

    /// Score the requested candidates and append one result per candidate to the ledger.
    ///
    /// Unknown candidates, unknown criteria and missing scores are skipped. Only a
    /// missing position, an empty target profile or a storage failure fail the call,
    /// and all of those leave the ledger untouched.
    pub fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<Vec<MatchResult>, MatchingError> {
        let position_id = request.position_id;
        let targets = self.load_targets(position_id)?;
        let criteria = self.criteria_index()?;
        let candidate_ids = self.resolve_candidate_ids(&request.candidate_ids)?;

        info!(
            %position_id,
            candidates = candidate_ids.len(),
            criteria = targets.len(),
            "profile matching calculation started"
        );

        let mut batch = Vec::with_capacity(candidate_ids.len());
        for candidate_id in candidate_ids {
            if self.catalog.get_candidate(candidate_id)?.is_none() {
                debug!(%candidate_id, "skipping unknown candidate");
                continue;
            }

            let scorecard = self.score_candidate(candidate_id, &targets, &criteria)?;
            for skipped in &scorecard.skipped {
                debug!(
                    %candidate_id,
                    criterion_id = %skipped.criterion_id,
                    reason = ?skipped.reason,
                    "criterion skipped"
                );
            }
            batch.push(scorecard.to_result(candidate_id, position_id));
        }

        if batch.is_empty() {
            info!(%position_id, "no candidates evaluated; nothing persisted");
            return Ok(Vec::new());
        }

        let stored = self.ledger.save_batch(batch).map_err(|error| {
            warn!(%position_id, %error, "result batch rejected by ledger");
            error
        })?;

        info!(%position_id, persisted = stored.len(), "profile matching calculation finished");
        Ok(stored)
    }

    /// Score a single candidate without recording anything.
    pub fn explain(
        &self,
        position_id: PositionId,
        candidate_id: CandidateId,
    ) -> Result<Scorecard, MatchingError> {
        let targets = self.load_targets(position_id)?;
        if self.catalog.get_candidate(candidate_id)?.is_none() {
            return Err(MatchingError::CandidateNotFound(candidate_id));
        }
        let criteria = self.criteria_index()?;
        self.score_candidate(candidate_id, &targets, &criteria)
    }

    /// Stored results, best first. Scoping to a position also numbers the rows.
    pub fn list_results(
        &self,
        position_id: Option<PositionId>,
    ) -> Result<Vec<ResultView>, MatchingError> {
        let mut joiner = RecordJoiner::new(self.catalog.as_ref());

        match position_id {
            Some(position_id) => {
                let results = self.ledger.list_by_position(position_id)?;
                rank_results(results)
                    .into_iter()
                    .map(|ranked| joiner.view(ranked.result, Some(ranked.rank)))
                    .collect()
            }
            None => self
                .ledger
                .list_all()?
                .into_iter()
                .map(|result| joiner.view(result, None))
                .collect(),
        }
    }

    pub fn get_result(&self, id: ResultId) -> Result<ResultView, MatchingError> {
        let result = self
            .ledger
            .get(id)?
            .ok_or(MatchingError::ResultNotFound(id))?;
        RecordJoiner::new(self.catalog.as_ref()).view(result, None)
    }

    fn load_targets(&self, position_id: PositionId) -> Result<Vec<TargetProfile>, MatchingError> {
        if self.catalog.get_position(position_id)?.is_none() {
            return Err(MatchingError::PositionNotFound(position_id));
        }

        let targets = self.catalog.list_target_profiles(position_id)?;
        if targets.is_empty() {
            return Err(MatchingError::MissingTargetProfile(position_id));
        }
        Ok(targets)
    }

    fn criteria_index(&self) -> Result<HashMap<CriterionId, Criterion>, MatchingError> {
        Ok(self
            .catalog
            .list_criteria()?
            .into_iter()
            .map(|criterion| (criterion.id, criterion))
            .collect())
    }

    fn resolve_candidate_ids(
        &self,
        requested: &[CandidateId],
    ) -> Result<Vec<CandidateId>, MatchingError> {
        if requested.is_empty() {
            let scored: BTreeSet<CandidateId> = self
                .catalog
                .list_scores()?
                .into_iter()
                .map(|score| score.candidate_id)
                .collect();
            return Ok(scored.into_iter().collect());
        }

        let mut seen = HashSet::new();
        Ok(requested
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect())
    }

    fn score_candidate(
        &self,
        candidate_id: CandidateId,
        targets: &[TargetProfile],
        criteria: &HashMap<CriterionId, Criterion>,
    ) -> Result<Scorecard, MatchingError> {
        let values: HashMap<CriterionId, f64> = self
            .catalog
            .list_scores_by_candidate(candidate_id)?
            .into_iter()
            .map(|score| (score.criterion_id, score.value))
            .collect();

        Ok(self.engine.score(targets, criteria, &values))
    }
}

/// Memoised candidate/position lookups while building a listing.
struct RecordJoiner<'a, C> {
    catalog: &'a C,
    candidates: HashMap<CandidateId, Option<Candidate>>,
    positions: HashMap<PositionId, Option<Position>>,
}

impl<'a, C: ProfileCatalog> RecordJoiner<'a, C> {
    fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            candidates: HashMap::new(),
            positions: HashMap::new(),
        }
    }

    fn view(
        &mut self,
        result: MatchResult,
        rank: Option<usize>,
    ) -> Result<ResultView, MatchingError> {
        let candidate = match self.candidates.get(&result.candidate_id) {
            Some(cached) => cached.clone(),
            None => {
                let fetched = self.catalog.get_candidate(result.candidate_id)?;
                self.candidates.insert(result.candidate_id, fetched.clone());
                fetched
            }
        };

        let position = match self.positions.get(&result.position_id) {
            Some(cached) => cached.clone(),
            None => {
                let fetched = self.catalog.get_position(result.position_id)?;
                self.positions.insert(result.position_id, fetched.clone());
                fetched
            }
        };

        Ok(ResultView {
            rank,
            result,
            candidate,
            position,
        })
    }
}

/// Error raised by the profile matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchingError {
    #[error("position {0} not found")]
    PositionNotFound(PositionId),
    #[error("candidate {0} not found")]
    CandidateNotFound(CandidateId),
    #[error("result {0} not found")]
    ResultNotFound(ResultId),
    #[error("no target profile defined for position {0}")]
    MissingTargetProfile(PositionId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchingErrorKind {
    NotFound,
    InvalidRequest,
    StorageFailure,
}

impl MatchingError {
    pub fn kind(&self) -> MatchingErrorKind {
        match self {
            MatchingError::PositionNotFound(_)
            | MatchingError::CandidateNotFound(_)
            | MatchingError::ResultNotFound(_)
            | MatchingError::Repository(RepositoryError::NotFound) => MatchingErrorKind::NotFound,
            MatchingError::MissingTargetProfile(_) => MatchingErrorKind::InvalidRequest,
            MatchingError::Repository(_) => MatchingErrorKind::StorageFailure,
        }
    }
}
