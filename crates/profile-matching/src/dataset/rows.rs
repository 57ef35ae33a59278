use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::DatasetError;
use crate::matching::{
    Aspect, AspectId, Candidate, CandidateId, CandidateScore, Criterion, CriterionId, Position,
    PositionId, ScoreId, TargetProfile, TargetProfileId,
};

pub(crate) fn read_rows<T, R>(reader: R, file: &'static str) -> Result<Vec<T>, DatasetError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<T>() {
        let row = record.map_err(|source| DatasetError::Csv { file, source })?;
        rows.push(row);
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PositionRow {
    id: u64,
    name: String,
    #[serde(default)]
    description: String,
}

impl From<PositionRow> for Position {
    fn from(row: PositionRow) -> Self {
        Position {
            id: PositionId(row.id),
            name: row.name,
            description: row.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AspectRow {
    id: u64,
    name: String,
    #[serde(default)]
    description: String,
    percentage: f64,
}

impl From<AspectRow> for Aspect {
    fn from(row: AspectRow) -> Self {
        Aspect {
            id: AspectId(row.id),
            name: row.name,
            description: row.description,
            percentage: row.percentage,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CriterionRow {
    id: u64,
    aspect_id: u64,
    code: String,
    name: String,
    is_core: bool,
    weight: f64,
}

impl From<CriterionRow> for Criterion {
    fn from(row: CriterionRow) -> Self {
        Criterion {
            id: CriterionId(row.id),
            aspect_id: AspectId(row.aspect_id),
            code: row.code,
            name: row.name,
            is_core: row.is_core,
            weight: row.weight,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TargetProfileRow {
    id: u64,
    position_id: u64,
    criterion_id: u64,
    target_value: f64,
}

impl From<TargetProfileRow> for TargetProfile {
    fn from(row: TargetProfileRow) -> Self {
        TargetProfile {
            id: TargetProfileId(row.id),
            position_id: PositionId(row.position_id),
            criterion_id: CriterionId(row.criterion_id),
            target_value: row.target_value,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CandidateRow {
    id: u64,
    #[serde(default)]
    national_id: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    birth_date: Option<String>,
    #[serde(default)]
    address: String,
    #[serde(default)]
    phone: String,
}

impl CandidateRow {
    pub(crate) fn into_candidate(self, file: &'static str) -> Result<Candidate, DatasetError> {
        let birth_date = match self.birth_date {
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                DatasetError::InvalidDate {
                    file,
                    id: self.id,
                    value: raw.clone(),
                }
            })?),
            None => None,
        };

        Ok(Candidate {
            id: CandidateId(self.id),
            national_id: self.national_id,
            name: self.name,
            birth_date,
            address: self.address,
            phone: self.phone,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRow {
    id: u64,
    candidate_id: u64,
    criterion_id: u64,
    value: f64,
}

impl From<ScoreRow> for CandidateScore {
    fn from(row: ScoreRow) -> Self {
        CandidateScore {
            id: ScoreId(row.id),
            candidate_id: CandidateId(row.candidate_id),
            criterion_id: CriterionId(row.criterion_id),
            value: row.value,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
