//! Record table loading
//!
//! Reads one bandwidth export into memory. The export is a CSV file whose
//! `Direction` and `Bandwidth(Kbps)` columns are the only ones consulted.

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Column holding the `source->destination` label
pub const DIRECTION_COLUMN: &str = "Direction";

/// Column holding the measured bandwidth
pub const BANDWIDTH_COLUMN: &str = "Bandwidth(Kbps)";

/// Errors that make a whole record table unusable
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Malformed record table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid bandwidth {value} on row {row}: must be finite and non-negative")]
    InvalidBandwidth { row: usize, value: f64 },
}

/// Result type for record loading
pub type Result<T> = std::result::Result<T, LoadError>;

/// One directional traffic measurement
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    /// `source->destination`; `None` when the cell is empty
    #[serde(rename = "Direction")]
    pub direction: Option<String>,
    #[serde(rename = "Bandwidth(Kbps)")]
    pub bandwidth: f64,
}

impl Record {
    pub fn new(direction: impl Into<String>, bandwidth: f64) -> Self {
        Self {
            direction: Some(direction.into()),
            bandwidth,
        }
    }
}

/// Read every record from a CSV stream
///
/// Fails if either required column is absent, a row cannot be parsed, or a
/// bandwidth is negative or non-finite.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut csv = csv::Reader::from_reader(reader);

    let headers = csv.headers()?.clone();
    for column in [DIRECTION_COLUMN, BANDWIDTH_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    for (row, record) in csv.deserialize::<Record>().enumerate() {
        let record = record?;
        if !record.bandwidth.is_finite() || record.bandwidth < 0.0 {
            return Err(LoadError::InvalidBandwidth {
                row,
                value: record.bandwidth,
            });
        }
        records.push(record);
    }

    Ok(records)
}

/// Load a record table from a file on disk
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_records(file)
}
