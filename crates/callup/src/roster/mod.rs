//! Roster ingestion: turns a CSV or JSON export of the ranking into a [`CandidatePool`].

mod columns;
mod normalizer;
mod parser;

use crate::admission::{Candidate, CandidatePool, CandidateStatus, RegistrationId};
use columns::Column;
use parser::RosterRecord;
use serde::Serialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    MissingColumn(&'static str),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Json(err) => write!(f, "invalid roster JSON data: {}", err),
            RosterImportError::MissingColumn(column) => {
                write!(f, "roster has no {} column", column)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Json(err) => Some(err),
            RosterImportError::MissingColumn(_) => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for RosterImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// A row that was imported with a defect, or skipped because of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportWarning {
    pub row: usize,
    pub registration_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RosterImport {
    pub pool: CandidatePool,
    pub total_rows: usize,
    pub skipped_called: usize,
    pub skipped_duplicates: usize,
    pub warnings: Vec<ImportWarning>,
}

pub struct RosterImporter;

impl RosterImporter {
    /// Reads a roster file; `.csv` files are parsed as CSV, anything else as a JSON array.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RosterImport, RosterImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        let import = if is_csv {
            Self::from_csv_reader(file)?
        } else {
            Self::from_json_reader(file)?
        };

        info!(
            path = %path.display(),
            rows = import.total_rows,
            candidates = import.pool.len(),
            quota_eligible = import.pool.quota_eligible_count(),
            sub_judice = import.pool.sub_judice_count(),
            skipped_called = import.skipped_called,
            warnings = import.warnings.len(),
            "roster loaded"
        );
        Ok(import)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<RosterImport, RosterImportError> {
        build_import(parser::parse_csv(reader)?)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<RosterImport, RosterImportError> {
        build_import(parser::parse_json(reader)?)
    }
}

fn build_import(records: Vec<RosterRecord>) -> Result<RosterImport, RosterImportError> {
    if !records.is_empty() && !records.iter().any(|r| r.has(Column::Registration)) {
        return Err(RosterImportError::MissingColumn(Column::Registration.label()));
    }

    let total_rows = records.len();
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    let mut skipped_called = 0;
    let mut skipped_duplicates = 0;
    let mut candidates = Vec::with_capacity(total_rows);

    for record in records {
        let Some(candidate) = candidate_from(&record, &mut warnings) else {
            continue;
        };

        if candidate.status == CandidateStatus::Called {
            skipped_called += 1;
            continue;
        }
        if !seen.insert(candidate.registration_id.clone()) {
            skipped_duplicates += 1;
            warnings.push(ImportWarning {
                row: record.row,
                registration_id: Some(candidate.registration_id.to_string()),
                message: "duplicate registration id; keeping the first occurrence".to_string(),
            });
            continue;
        }
        candidates.push(candidate);
    }

    for warning in &warnings {
        warn!(
            row = warning.row,
            registration_id = warning.registration_id.as_deref().unwrap_or("-"),
            "{}",
            warning.message
        );
    }

    Ok(RosterImport {
        pool: CandidatePool::build(candidates),
        total_rows,
        skipped_called,
        skipped_duplicates,
        warnings,
    })
}

fn candidate_from(record: &RosterRecord, warnings: &mut Vec<ImportWarning>) -> Option<Candidate> {
    let Some(raw_id) = record.get(Column::Registration) else {
        warnings.push(ImportWarning {
            row: record.row,
            registration_id: None,
            message: "row has no registration id and was skipped".to_string(),
        });
        return None;
    };
    let registration_id = RegistrationId::new(raw_id);

    let mut rank = |column: Column| match record.get(column).map(normalizer::parse_rank) {
        Some(Ok(rank)) => rank,
        Some(Err(reason)) => {
            warnings.push(ImportWarning {
                row: record.row,
                registration_id: Some(registration_id.to_string()),
                message: format!("{} ignored: {}", column.label(), reason),
            });
            None
        }
        None => None,
    };
    let general_rank = rank(Column::GeneralRank);
    let quota_rank = rank(Column::QuotaRank);

    let name = record.get(Column::Name).unwrap_or_default().to_string();
    let status = record
        .get(Column::Status)
        .map(CandidateStatus::from_label)
        .unwrap_or(CandidateStatus::Awaiting);

    Some(Candidate {
        sub_judice: normalizer::has_sub_judice_marker(&name),
        registration_id,
        name,
        status,
        general_rank,
        quota_rank,
    })
}
