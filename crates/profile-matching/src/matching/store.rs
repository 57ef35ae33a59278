//! In-memory stores backing the service when no external database is wired in.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::Utc;

use super::domain::{
    Aspect, AspectId, Candidate, CandidateId, CandidateScore, Criterion, CriterionId,
    MatchResult, NewMatchResult, Position, PositionId, ResultId, ScoreId, TargetProfile,
    TargetProfileId,
};
use super::ranking::order_results;
use super::repository::{ProfileCatalog, RepositoryError, ResultLedger};

#[derive(Default)]
struct CatalogTables {
    positions: BTreeMap<PositionId, Position>,
    aspects: BTreeMap<AspectId, Aspect>,
    criteria: BTreeMap<CriterionId, Criterion>,
    target_profiles: BTreeMap<TargetProfileId, TargetProfile>,
    candidates: BTreeMap<CandidateId, Candidate>,
    scores: BTreeMap<ScoreId, CandidateScore>,
}

fn insert_unique<K: Ord, V: Clone>(
    table: &mut BTreeMap<K, V>,
    key: K,
    value: V,
) -> Result<V, RepositoryError> {
    if table.contains_key(&key) {
        return Err(RepositoryError::Conflict);
    }
    table.insert(key, value.clone());
    Ok(value)
}

/// Catalog of positions, criteria, target profiles, candidates and their scores.
///
/// Listings come back in id order, which stands in for a relational store's
/// primary-key order.
#[derive(Default)]
pub struct InMemoryCatalog {
    tables: Mutex<CatalogTables>,
}

impl InMemoryCatalog {
    pub fn insert_position(&self, position: Position) -> Result<Position, RepositoryError> {
        let mut guard = self.tables.lock().expect("catalog mutex poisoned");
        insert_unique(&mut guard.positions, position.id, position)
    }

    pub fn insert_aspect(&self, aspect: Aspect) -> Result<Aspect, RepositoryError> {
        let mut guard = self.tables.lock().expect("catalog mutex poisoned");
        insert_unique(&mut guard.aspects, aspect.id, aspect)
    }

    pub fn insert_criterion(&self, criterion: Criterion) -> Result<Criterion, RepositoryError> {
        let mut guard = self.tables.lock().expect("catalog mutex poisoned");
        insert_unique(&mut guard.criteria, criterion.id, criterion)
    }

    pub fn insert_target_profile(
        &self,
        target: TargetProfile,
    ) -> Result<TargetProfile, RepositoryError> {
        let mut guard = self.tables.lock().expect("catalog mutex poisoned");
        insert_unique(&mut guard.target_profiles, target.id, target)
    }

    pub fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        let mut guard = self.tables.lock().expect("catalog mutex poisoned");
        insert_unique(&mut guard.candidates, candidate.id, candidate)
    }

    pub fn insert_score(&self, score: CandidateScore) -> Result<CandidateScore, RepositoryError> {
        let mut guard = self.tables.lock().expect("catalog mutex poisoned");
        insert_unique(&mut guard.scores, score.id, score)
    }

    pub fn remove_candidate(&self, id: CandidateId) -> Option<Candidate> {
        let mut guard = self.tables.lock().expect("catalog mutex poisoned");
        guard.candidates.remove(&id)
    }

    pub fn positions(&self) -> Vec<Position> {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        guard.positions.values().cloned().collect()
    }

    pub fn aspects(&self) -> Vec<Aspect> {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        guard.aspects.values().cloned().collect()
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        guard.candidates.values().cloned().collect()
    }

    pub fn contains_position(&self, id: PositionId) -> bool {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        guard.positions.contains_key(&id)
    }

    pub fn contains_aspect(&self, id: AspectId) -> bool {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        guard.aspects.contains_key(&id)
    }

    pub fn contains_criterion(&self, id: CriterionId) -> bool {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        guard.criteria.contains_key(&id)
    }

    pub fn contains_candidate(&self, id: CandidateId) -> bool {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        guard.candidates.contains_key(&id)
    }
}

impl ProfileCatalog for InMemoryCatalog {
    fn get_position(&self, id: PositionId) -> Result<Option<Position>, RepositoryError> {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        Ok(guard.positions.get(&id).cloned())
    }

    fn list_target_profiles(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<TargetProfile>, RepositoryError> {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        Ok(guard
            .target_profiles
            .values()
            .filter(|target| target.position_id == position_id)
            .cloned()
            .collect())
    }

    fn list_criteria(&self) -> Result<Vec<Criterion>, RepositoryError> {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        Ok(guard.criteria.values().cloned().collect())
    }

    fn get_candidate(&self, id: CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        Ok(guard.candidates.get(&id).cloned())
    }

    fn list_scores(&self) -> Result<Vec<CandidateScore>, RepositoryError> {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        Ok(guard.scores.values().cloned().collect())
    }

    fn list_scores_by_candidate(
        &self,
        candidate_id: CandidateId,
    ) -> Result<Vec<CandidateScore>, RepositoryError> {
        let guard = self.tables.lock().expect("catalog mutex poisoned");
        Ok(guard
            .scores
            .values()
            .filter(|score| score.candidate_id == candidate_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct LedgerRows {
    last_id: u64,
    rows: Vec<MatchResult>,
}

/// Append-only result ledger. A batch is written under a single lock, so readers see
/// either none or all of it.
#[derive(Default)]
pub struct InMemoryLedger {
    rows: Mutex<LedgerRows>,
}

impl InMemoryLedger {
    pub fn len(&self) -> usize {
        self.rows.lock().expect("ledger mutex poisoned").rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultLedger for InMemoryLedger {
    fn save_batch(&self, batch: Vec<NewMatchResult>) -> Result<Vec<MatchResult>, RepositoryError> {
        let created_at = Utc::now();
        let mut guard = self.rows.lock().expect("ledger mutex poisoned");

        let first_id = guard.last_id + 1;
        let stored: Vec<MatchResult> = batch
            .into_iter()
            .zip(first_id..)
            .map(|(result, id)| MatchResult::from_new(ResultId(id), result, created_at))
            .collect();

        guard.last_id += stored.len() as u64;
        guard.rows.extend(stored.iter().cloned());
        Ok(stored)
    }

    fn list_all(&self) -> Result<Vec<MatchResult>, RepositoryError> {
        let guard = self.rows.lock().expect("ledger mutex poisoned");
        let mut rows = guard.rows.clone();
        order_results(&mut rows);
        Ok(rows)
    }

    fn list_by_position(
        &self,
        position_id: PositionId,
    ) -> Result<Vec<MatchResult>, RepositoryError> {
        let guard = self.rows.lock().expect("ledger mutex poisoned");
        let mut rows: Vec<MatchResult> = guard
            .rows
            .iter()
            .filter(|row| row.position_id == position_id)
            .cloned()
            .collect();
        order_results(&mut rows);
        Ok(rows)
    }

    fn get(&self, id: ResultId) -> Result<Option<MatchResult>, RepositoryError> {
        let guard = self.rows.lock().expect("ledger mutex poisoned");
        Ok(guard.rows.iter().find(|row| row.id == id).cloned())
    }
}
