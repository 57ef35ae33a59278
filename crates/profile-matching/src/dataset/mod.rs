//! CSV dataset loading for positions, criteria, target profiles, candidates and scores.
//!
//! A dataset directory holds one file per table (see the `*_FILE` constants). Rows are
//! checked for duplicate ids and dangling references as they are loaded, in dependency
//! order, so a loaded catalog is always referentially consistent.

mod rows;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::matching::{CandidateScore, Criterion, InMemoryCatalog, RepositoryError, TargetProfile};
use rows::{
    read_rows, AspectRow, CandidateRow, CriterionRow, PositionRow, ScoreRow, TargetProfileRow,
};

pub const POSITIONS_FILE: &str = "positions.csv";
pub const ASPECTS_FILE: &str = "aspects.csv";
pub const CRITERIA_FILE: &str = "criteria.csv";
pub const TARGET_PROFILES_FILE: &str = "target_profiles.csv";
pub const CANDIDATES_FILE: &str = "candidates.csv";
pub const SCORES_FILE: &str = "score_rows.csv";

const SAMPLE_POSITIONS: &str = include_str!("../../data/sample/positions.csv");
const SAMPLE_ASPECTS: &str = include_str!("../../data/sample/aspects.csv");
const SAMPLE_CRITERIA: &str = include_str!("../../data/sample/criteria.csv");
const SAMPLE_TARGET_PROFILES: &str = include_str!("../../data/sample/target_profiles.csv");
const SAMPLE_CANDIDATES: &str = include_str!("../../data/sample/candidates.csv");
const SAMPLE_SCORES: &str = include_str!("../../data/sample/score_rows.csv");

/// One reader per table.
pub struct DatasetSources<R> {
    pub positions: R,
    pub aspects: R,
    pub criteria: R,
    pub target_profiles: R,
    pub candidates: R,
    pub scores: R,
}

/// Load the bundled sample dataset: three positions, eight criteria, a target profile
/// for the first position and three scored candidates.
pub fn load_sample() -> Result<InMemoryCatalog, DatasetError> {
    load(DatasetSources {
        positions: SAMPLE_POSITIONS.as_bytes(),
        aspects: SAMPLE_ASPECTS.as_bytes(),
        criteria: SAMPLE_CRITERIA.as_bytes(),
        target_profiles: SAMPLE_TARGET_PROFILES.as_bytes(),
        candidates: SAMPLE_CANDIDATES.as_bytes(),
        scores: SAMPLE_SCORES.as_bytes(),
    })
}

pub fn load_dir(directory: impl AsRef<Path>) -> Result<InMemoryCatalog, DatasetError> {
    let directory = directory.as_ref();
    let open = |name: &str| {
        let path = directory.join(name);
        File::open(&path).map_err(|source| DatasetError::Io { path, source })
    };

    load(DatasetSources {
        positions: open(POSITIONS_FILE)?,
        aspects: open(ASPECTS_FILE)?,
        criteria: open(CRITERIA_FILE)?,
        target_profiles: open(TARGET_PROFILES_FILE)?,
        candidates: open(CANDIDATES_FILE)?,
        scores: open(SCORES_FILE)?,
    })
}

pub fn load<R: Read>(sources: DatasetSources<R>) -> Result<InMemoryCatalog, DatasetError> {
    let catalog = InMemoryCatalog::default();

    for row in read_rows::<PositionRow, _>(sources.positions, POSITIONS_FILE)? {
        let position = row.into();
        catalog
            .insert_position(position)
            .map_err(|err| rejected(err, POSITIONS_FILE))?;
    }

    for row in read_rows::<AspectRow, _>(sources.aspects, ASPECTS_FILE)? {
        let aspect = row.into();
        catalog
            .insert_aspect(aspect)
            .map_err(|err| rejected(err, ASPECTS_FILE))?;
    }

    for row in read_rows::<CriterionRow, _>(sources.criteria, CRITERIA_FILE)? {
        let criterion: Criterion = row.into();
        require(
            catalog.contains_aspect(criterion.aspect_id),
            CRITERIA_FILE,
            criterion.id.0,
            "aspect",
            criterion.aspect_id.0,
        )?;
        catalog
            .insert_criterion(criterion)
            .map_err(|err| rejected(err, CRITERIA_FILE))?;
    }

    for row in read_rows::<TargetProfileRow, _>(sources.target_profiles, TARGET_PROFILES_FILE)? {
        let target: TargetProfile = row.into();
        require(
            catalog.contains_position(target.position_id),
            TARGET_PROFILES_FILE,
            target.id.0,
            "position",
            target.position_id.0,
        )?;
        require(
            catalog.contains_criterion(target.criterion_id),
            TARGET_PROFILES_FILE,
            target.id.0,
            "criterion",
            target.criterion_id.0,
        )?;
        catalog
            .insert_target_profile(target)
            .map_err(|err| rejected(err, TARGET_PROFILES_FILE))?;
    }

    for row in read_rows::<CandidateRow, _>(sources.candidates, CANDIDATES_FILE)? {
        let candidate = row.into_candidate(CANDIDATES_FILE)?;
        catalog
            .insert_candidate(candidate)
            .map_err(|err| rejected(err, CANDIDATES_FILE))?;
    }

    for row in read_rows::<ScoreRow, _>(sources.scores, SCORES_FILE)? {
        let score: CandidateScore = row.into();
        require(
            catalog.contains_candidate(score.candidate_id),
            SCORES_FILE,
            score.id.0,
            "candidate",
            score.candidate_id.0,
        )?;
        require(
            catalog.contains_criterion(score.criterion_id),
            SCORES_FILE,
            score.id.0,
            "criterion",
            score.criterion_id.0,
        )?;
        catalog
            .insert_score(score)
            .map_err(|err| rejected(err, SCORES_FILE))?;
    }

    Ok(catalog)
}

fn require(
    present: bool,
    file: &'static str,
    id: u64,
    entity: &'static str,
    reference: u64,
) -> Result<(), DatasetError> {
    if present {
        Ok(())
    } else {
        Err(DatasetError::DanglingReference {
            file,
            id,
            entity,
            reference,
        })
    }
}

fn rejected(error: RepositoryError, file: &'static str) -> DatasetError {
    DatasetError::Table {
        file,
        source: error,
    }
}

/// Error raised while loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("unable to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed {file}: {source}")]
    Csv {
        file: &'static str,
        source: csv::Error,
    },
    #[error("{file}: row {id} has invalid birth date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate {
        file: &'static str,
        id: u64,
        value: String,
    },
    #[error("{file}: row {id} references unknown {entity} {reference}")]
    DanglingReference {
        file: &'static str,
        id: u64,
        entity: &'static str,
        reference: u64,
    },
    #[error("{file}: {source}")]
    Table {
        file: &'static str,
        source: RepositoryError,
    },
}
