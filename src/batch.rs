//! Batch processing over many record tables
//!
//! Loads each file, runs the per-file pipeline and collects results. A file
//! that cannot be loaded is skipped and reported as a [`Diagnostic`]; it never
//! aborts the batch. With `jobs > 1` files are processed on scoped worker
//! threads, and results still come back in input order.

use crate::aggregate::FileResult;
use crate::config::HostIdentity;
use crate::pipeline::{process_records, FileOutcome};
use crate::record::{load_records, LoadError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The whole file was left out of the report
    Skipped,
    /// One pattern contributed nothing; the file is still reported
    PatternFailed,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Skipped => f.write_str("skipped"),
            DiagnosticKind::PatternFailed => f.write_str("pattern_failed"),
        }
    }
}

/// A non-fatal problem found while processing a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file_name: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.file_name, self.kind, self.message)
    }
}

/// Everything a batch produced
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Input order, skipped files omitted
    pub results: Vec<FileResult>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BatchOutcome {
    fn push(&mut self, file_name: String, outcome: Result<FileOutcome, LoadError>) {
        match outcome {
            Ok(FileOutcome { result, failures }) => {
                self.diagnostics
                    .extend(failures.into_iter().map(|failure| Diagnostic {
                        file_name: file_name.clone(),
                        kind: DiagnosticKind::PatternFailed,
                        message: format!(
                            "pair {} pattern {}: {}",
                            failure.pair_key, failure.pattern, failure.error
                        ),
                    }));
                self.results.push(result);
            }
            Err(err) => {
                tracing::debug!(file = %file_name, "skipping file: {}", err);
                self.diagnostics.push(Diagnostic {
                    file_name,
                    kind: DiagnosticKind::Skipped,
                    message: err.to_string(),
                });
            }
        }
    }
}

/// Name a file is reported under: its final path component
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load and process one file
pub fn process_file(path: &Path, identity: &HostIdentity) -> Result<FileOutcome, LoadError> {
    let records = load_records(path)?;
    Ok(process_records(&display_name(path), &records, identity))
}

/// Process every file in `paths`
pub fn run_batch(paths: &[PathBuf], identity: &HostIdentity, jobs: usize) -> BatchOutcome {
    if jobs <= 1 || paths.len() <= 1 {
        let mut batch = BatchOutcome::default();
        for path in paths {
            batch.push(display_name(path), process_file(path, identity));
        }
        return batch;
    }
    run_parallel(paths, identity, jobs)
}

fn run_parallel(paths: &[PathBuf], identity: &HostIdentity, jobs: usize) -> BatchOutcome {
    let chunk_size = paths.len().div_ceil(jobs);
    let mut batch = BatchOutcome::default();

    let scoped = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = paths
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move |_| {
                    chunk
                        .iter()
                        .map(|path| process_file(path, identity))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for (chunk, handle) in paths.chunks(chunk_size).zip(handles) {
            match handle.join() {
                Ok(outcomes) => {
                    for (path, outcome) in chunk.iter().zip(outcomes) {
                        batch.push(display_name(path), outcome);
                    }
                }
                Err(_) => {
                    for path in chunk {
                        tracing::debug!(file = %path.display(), "worker thread panicked");
                        batch.diagnostics.push(Diagnostic {
                            file_name: display_name(path),
                            kind: DiagnosticKind::Skipped,
                            message: "worker thread panicked".to_string(),
                        });
                    }
                }
            }
        }
    });

    if scoped.is_err() {
        tracing::warn!("parallel batch scope reported an unjoined panic");
    }

    batch
}
