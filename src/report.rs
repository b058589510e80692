//! Merged multi-file report
//!
//! Combines [`FileResult`]s into one table. Columns are the sorted union of
//! every pair key, minus keys suppressed per file identity:
//!
//! - VC-role host files: `vc_others` and `clusternodes_vc`
//! - every other file: `clusternodes_vc`
//!
//! A cell is `None` when the file never observed the pair (or the pair is
//! suppressed for that file). That is distinct from an observed zero.

use crate::aggregate::FileResult;
use crate::config::HostIdentity;
use crate::residual::RESIDUAL_KEY;
use std::collections::BTreeSet;

/// Cluster nodes talking to the VC-role host
pub const CLUSTERNODES_VC_KEY: &str = "clusternodes_vc";

/// First header cell
pub const FILE_NAME_HEADER: &str = "File Name";

/// Keys never shown for `file_name`
pub fn suppressed_keys(file_name: &str, identity: &HostIdentity) -> &'static [&'static str] {
    if identity.is_vc_file(file_name) {
        &[RESIDUAL_KEY, CLUSTERNODES_VC_KEY]
    } else {
        &[CLUSTERNODES_VC_KEY]
    }
}

/// One row of the merged table
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub file_name: String,
    /// Aligned with [`MergedReport::columns`]
    pub cells: Vec<Option<f64>>,
}

/// Union table across all processed files
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedReport {
    pub columns: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl MergedReport {
    /// Merge results in input order; `results` is only read
    pub fn merge(results: &[FileResult], identity: &HostIdentity) -> Self {
        let mut universe = BTreeSet::new();
        for result in results {
            let suppressed = suppressed_keys(&result.file_name, identity);
            universe.extend(
                result
                    .bandwidth
                    .keys()
                    .filter(|key| !suppressed.contains(&key.as_str()))
                    .cloned(),
            );
        }
        let columns: Vec<String> = universe.into_iter().collect();

        let rows = results
            .iter()
            .map(|result| {
                let suppressed = suppressed_keys(&result.file_name, identity);
                let cells = columns
                    .iter()
                    .map(|key| {
                        if suppressed.contains(&key.as_str()) {
                            None
                        } else {
                            result.get(key)
                        }
                    })
                    .collect();
                ReportRow {
                    file_name: result.file_name.clone(),
                    cells,
                }
            })
            .collect();

        Self { columns, rows }
    }

    /// `File Name` followed by the pair columns
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(FILE_NAME_HEADER)
            .chain(self.columns.iter().map(String::as_str))
            .collect()
    }

    /// Cell lookup by file and column name
    pub fn cell(&self, file_name: &str, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        let row = self.rows.iter().find(|r| r.file_name == file_name)?;
        row.cells[col]
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render a bandwidth value the way the export always has: shortest
/// round-trip form, at least one decimal digit (`70.0`, `0.3333`)
pub fn format_bandwidth(value: f64, unit_suffix: &str) -> String {
    format!("{:?} {}", value, unit_suffix)
}

/// Render one cell, using `na_marker` for missing values
pub fn format_cell(cell: Option<f64>, unit_suffix: &str, na_marker: &str) -> String {
    match cell {
        Some(value) => format_bandwidth(value, unit_suffix),
        None => na_marker.to_string(),
    }
}
