//! Per-file pipeline
//!
//! records → pair catalog → per-pair sums → residual → [`FileResult`]
//!
//! Pure: takes an in-memory table and the host identities, touches no
//! filesystem or global state. Safe to run for many files concurrently.

use crate::aggregate::{aggregate, FileResult, PatternFailure};
use crate::catalog::PairCatalog;
use crate::config::HostIdentity;
use crate::record::Record;
use crate::residual::apply_residual;

/// Result for one file plus the patterns that failed along the way
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub result: FileResult,
    pub failures: Vec<PatternFailure>,
}

/// Classify and sum one record table
pub fn process_records(file_name: &str, records: &[Record], identity: &HostIdentity) -> FileOutcome {
    let catalog = PairCatalog::build(records);
    let aggregation = aggregate(&catalog, records);

    let mut result = FileResult {
        file_name: file_name.to_string(),
        bandwidth: aggregation.totals,
    };
    apply_residual(&mut result, identity);

    tracing::info!(
        file = file_name,
        records = records.len(),
        pairs = result.bandwidth.len(),
        failures = aggregation.failures.len(),
        "processed record table"
    );

    FileOutcome {
        result,
        failures: aggregation.failures,
    }
}
