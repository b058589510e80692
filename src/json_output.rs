//! JSON output format for merged reports
//!
//! Machine-readable twin of the CSV export. Cells are plain numbers; a pair a
//! file never observed is `null`.

use crate::batch::{Diagnostic, DiagnosticKind};
use crate::report::MergedReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One file's row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFileRow {
    pub file_name: String,
    /// Column → bandwidth (null when not applicable)
    pub bandwidth: BTreeMap<String, Option<f64>>,
}

/// A non-fatal problem reported alongside the table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub file_name: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Unit of every bandwidth value
    pub unit: String,
    /// Sorted pair columns
    pub columns: Vec<String>,
    pub files: Vec<JsonFileRow>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<JsonDiagnostic>,
}

impl JsonOutput {
    /// Create a new JSON output structure
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "bwpairs-json-v1".to_string(),
            unit: unit.into(),
            columns: Vec::new(),
            files: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Fill columns and rows from a merged report
    pub fn set_report(&mut self, report: &MergedReport) {
        self.columns = report.columns.clone();
        self.files = report
            .rows
            .iter()
            .map(|row| JsonFileRow {
                file_name: row.file_name.clone(),
                bandwidth: report
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.cells.iter().copied())
                    .collect(),
            })
            .collect();
    }

    /// Add a diagnostic
    pub fn add_diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(JsonDiagnostic {
            file_name: diagnostic.file_name.clone(),
            kind: diagnostic.kind,
            message: diagnostic.message.clone(),
        });
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new("Kbps")
    }
}
