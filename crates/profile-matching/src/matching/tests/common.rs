use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::matching::domain::{
    Aspect, AspectId, Candidate, CandidateId, CandidateScore, Criterion, CriterionId,
    MatchResult, NewMatchResult, Position, PositionId, ResultId, ScoreId, TargetProfile,
    TargetProfileId,
};
use crate::matching::repository::{ProfileCatalog, RepositoryError, ResultLedger};
use crate::matching::store::{InMemoryCatalog, InMemoryLedger};
use crate::matching::{matching_router, MatchingConfig, ProfileMatchingService};

pub(super) const TOLERANCE: f64 = 1e-9;

pub(super) fn position(id: u64, name: &str) -> Position {
    Position {
        id: PositionId(id),
        name: name.to_string(),
        description: format!("{name} role"),
    }
}

pub(super) fn criterion(id: u64, code: &str, is_core: bool) -> Criterion {
    Criterion {
        id: CriterionId(id),
        aspect_id: AspectId(1),
        code: code.to_string(),
        name: format!("Criterion {code}"),
        is_core,
        weight: 1.0,
    }
}

pub(super) fn target(id: u64, position_id: u64, criterion_id: u64, value: f64) -> TargetProfile {
    TargetProfile {
        id: TargetProfileId(id),
        position_id: PositionId(position_id),
        criterion_id: CriterionId(criterion_id),
        target_value: value,
    }
}

pub(super) fn candidate(id: u64, name: &str) -> Candidate {
    Candidate {
        id: CandidateId(id),
        national_id: format!("TK{id:03}"),
        name: name.to_string(),
        birth_date: None,
        address: "Jl. Mawar No. 10".to_string(),
        phone: "081234567890".to_string(),
    }
}

pub(super) fn score(id: u64, candidate_id: u64, criterion_id: u64, value: f64) -> CandidateScore {
    CandidateScore {
        id: ScoreId(id),
        candidate_id: CandidateId(candidate_id),
        criterion_id: CriterionId(criterion_id),
        value,
    }
}

/// Position 1 targets a core criterion (1) at 4.0 and a secondary criterion (2) at 3.0.
/// Position 2 exists without any target profile. Candidate 1 has no scores yet.
pub(super) fn two_track_catalog() -> InMemoryCatalog {
    let catalog = InMemoryCatalog::default();
    catalog
        .insert_aspect(Aspect {
            id: AspectId(1),
            name: "Technical Competence".to_string(),
            description: String::new(),
            percentage: 100.0,
        })
        .expect("aspect");
    catalog
        .insert_position(position(1, "Manager"))
        .expect("position");
    catalog
        .insert_position(position(2, "Clerk"))
        .expect("position");
    catalog
        .insert_criterion(criterion(1, "K1", true))
        .expect("criterion");
    catalog
        .insert_criterion(criterion(2, "K2", false))
        .expect("criterion");
    catalog
        .insert_target_profile(target(1, 1, 1, 4.0))
        .expect("target");
    catalog
        .insert_target_profile(target(2, 1, 2, 3.0))
        .expect("target");
    catalog
        .insert_candidate(candidate(1, "Budi Santoso"))
        .expect("candidate");
    catalog
}

pub(super) type MemoryService = ProfileMatchingService<InMemoryCatalog, InMemoryLedger>;

pub(super) fn build_service(
    catalog: InMemoryCatalog,
) -> (MemoryService, Arc<InMemoryCatalog>, Arc<InMemoryLedger>) {
    let catalog = Arc::new(catalog);
    let ledger = Arc::new(InMemoryLedger::default());
    let service =
        ProfileMatchingService::new(catalog.clone(), ledger.clone(), MatchingConfig::default());
    (service, catalog, ledger)
}

pub(super) fn assert_weighted(result: &MatchResult) {
    let expected = 0.6 * result.core_factor + 0.4 * result.secondary_factor;
    assert!(
        (result.total_score - expected).abs() < TOLERANCE,
        "total {} != 0.6*{} + 0.4*{}",
        result.total_score,
        result.core_factor,
        result.secondary_factor
    );
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

/// Ledger that refuses every write, as a database would after losing its connection.
pub(super) struct UnavailableLedger;

impl ResultLedger for UnavailableLedger {
    fn save_batch(&self, _batch: Vec<NewMatchResult>) -> Result<Vec<MatchResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_all(&self) -> Result<Vec<MatchResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_by_position(
        &self,
        _position_id: PositionId,
    ) -> Result<Vec<MatchResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn get(&self, _id: ResultId) -> Result<Option<MatchResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Catalog whose candidate lookups fail while everything else is served from `inner`.
pub(super) struct CandidateOutageCatalog {
    pub(super) inner: InMemoryCatalog,
}

impl ProfileCatalog for CandidateOutageCatalog {
    fn get_position(&self, id: PositionId) -> Result<Option<Position>, RepositoryError> {
        self.inner.get_position(id)
    }

    fn list_target_profiles(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<TargetProfile>, RepositoryError> {
        self.inner.list_target_profiles(position_id)
    }

    fn list_criteria(&self) -> Result<Vec<Criterion>, RepositoryError> {
        self.inner.list_criteria()
    }

    fn get_candidate(&self, _id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection reset".to_string()))
    }

    fn list_scores(&self) -> Result<Vec<CandidateScore>, RepositoryError> {
        self.inner.list_scores()
    }

    fn list_scores_by_candidate(
        &self,
        candidate_id: CandidateId,
    ) -> Result<Vec<CandidateScore>, RepositoryError> {
        self.inner.list_scores_by_candidate(candidate_id)
    }
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    matching_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
