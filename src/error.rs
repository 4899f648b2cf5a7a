// Pipeline error taxonomy
// Every variant is fatal at startup: the dashboard never opens on bad data.

use std::path::PathBuf;
use thiserror::Error;

/// Input table could not be read or does not have the expected shape
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is empty", .path.display())]
    Empty { path: PathBuf },

    #[error("{} is missing expected columns: {}", .path.display(), .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("Failed to parse line {line} in {}: {source}", .path.display())]
    Row {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },
}

/// The domestic/world boundary could not be located
#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("Boundary city {sentinel:?} not found in {records} records; domestic rows must precede world rows")]
    SentinelNotFound { sentinel: String, records: usize },
}

/// The join produced nothing usable
#[derive(Error, Debug)]
pub enum JoinIntegrityError {
    #[error("No trail matched the city reference ({domestic} domestic records, {references} reference rows)")]
    NoMatches { domestic: usize, references: usize },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    Partition(#[from] PartitionError),

    #[error(transparent)]
    JoinIntegrity(#[from] JoinIntegrityError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
