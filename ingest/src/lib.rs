//! Loads benchmark result tables into validated record sets.

mod row;


use csv::{ReaderBuilder, StringRecord, Trim};
use dsan_analysis::{AnalysisError, PerformanceRecord, RecordSet};
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info, trace};

pub use row::{RawRecord, COLUMNS};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to open {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("Rejected record at line {line}: {source}")]
    Record {
        line: u64,
        #[source]
        source: AnalysisError,
    },
}

impl From<csv::Error> for IngestError {
    fn from(source: csv::Error) -> Self {
        Self::Csv {
            line: source.position().map(|position| position.line()).unwrap_or(0),
            source,
        }
    }
}

/// Read every record from a CSV source with a header row
///
/// Stops at the first malformed row or rejected category, nothing is returned partially.
pub fn load_reader<R: Read>(reader: R) -> Result<Vec<PerformanceRecord>, IngestError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    trace!(headers = ?headers, "Read CSV header");

    let mut raw = StringRecord::new();
    let mut records = Vec::new();

    while reader.read_record(&mut raw)? {
        let line = raw.position().map(|position| position.line()).unwrap_or(0);
        let row: RawRecord = raw
            .deserialize(Some(&headers))
            .map_err(|source| IngestError::Csv { line, source })?;

        let record = PerformanceRecord::try_from(row)
            .map_err(|source| IngestError::Record { line, source })?;
        trace!(line, record = ?record, "Parsed record");

        records.push(record);
    }

    debug!(records = records.len(), "Finished reading CSV");

    Ok(records)
}

pub fn load_path(path: &Path) -> Result<RecordSet, IngestError> {
    load_paths(&[path.to_path_buf()])
}

/// Concatenate the records of several files, in the order given
#[tracing::instrument(level = "debug")]
pub fn load_paths(paths: &[PathBuf]) -> Result<RecordSet, IngestError> {
    let mut records = Vec::new();

    for path in paths {
        let file = File::open(path).map_err(|source| IngestError::Io {
            path: path.clone(),
            source,
        })?;
        let loaded = load_reader(file)?;

        info!(path = ?path, records = loaded.len(), "Loaded benchmark results");
        records.extend(loaded);
    }

    // every record was validated on conversion, this only wraps them
    RecordSet::try_from(records).map_err(|source| IngestError::Record { line: 0, source })
}
