//! Bandwidth aggregation
//!
//! Second pass over a record table: sum bandwidth for every pair in a
//! [`PairCatalog`].
//!
//! A record is counted once per pattern it satisfies. When both patterns of a
//! pair match the same label (the anchor and the service text overlap, e.g.
//! `vc->vc` for pair `vc_vc`), that record is counted twice. This is existing
//! report behavior and is kept as-is.

use crate::catalog::{MatchError, MatchPattern, Pair, PairCatalog};
use crate::record::Record;
use std::collections::BTreeMap;

/// Decimal places kept on every stored bandwidth value
pub const PRECISION: usize = 4;

/// Round to [`PRECISION`] decimal places
///
/// Rounds the exact binary value, so `828.28365` (stored just below the
/// midpoint) goes down to `828.2836` rather than up.
pub fn round_bandwidth(value: f64) -> f64 {
    let rounded = format!("{:.*}", PRECISION, value)
        .parse::<f64>()
        .unwrap_or(value);
    // Normalize -0.0 so it never renders with a sign
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Classified-and-summed output for one input file
#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    pub file_name: String,
    /// Pair key → summed bandwidth
    pub bandwidth: BTreeMap<String, f64>,
}

impl FileResult {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            bandwidth: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.bandwidth.get(key).copied()
    }
}

/// A pattern that could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFailure {
    pub pair_key: String,
    pub pattern: String,
    pub error: MatchError,
}

/// Sum of one pattern over the table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PatternSum {
    pub bandwidth: f64,
    pub matched: usize,
}

/// Sum bandwidth of every record matching `pattern`
///
/// Fails on the first record the pattern cannot be evaluated against, in
/// which case none of the pattern's matches count.
pub fn sum_pattern(pattern: &MatchPattern, records: &[Record]) -> Result<PatternSum, MatchError> {
    let mut sum = PatternSum::default();
    for (row, record) in records.iter().enumerate() {
        if pattern.evaluate(row, record)? {
            sum.bandwidth += record.bandwidth;
            sum.matched += 1;
        }
    }
    Ok(sum)
}

/// Per-pair total plus how many record matches produced it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PairTotal {
    pub bandwidth: f64,
    pub matched: usize,
    pub failures: Vec<PatternFailure>,
}

/// Sum both patterns of `pair`, isolating failures per pattern
pub fn sum_pair(pair: &Pair, records: &[Record]) -> PairTotal {
    let mut total = PairTotal::default();

    for pattern in &pair.patterns {
        match sum_pattern(pattern, records) {
            Ok(sum) => {
                total.bandwidth = round_bandwidth(total.bandwidth + sum.bandwidth);
                total.matched += sum.matched;
            }
            Err(error) => {
                tracing::debug!(pair = %pair.key, %pattern, "pattern evaluation failed: {}", error);
                total.failures.push(PatternFailure {
                    pair_key: pair.key.clone(),
                    pattern: pattern.to_string(),
                    error,
                });
            }
        }
    }

    total
}

/// Totals for a whole catalog
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregation {
    /// Only pairs with at least one matching record appear here
    pub totals: BTreeMap<String, f64>,
    pub failures: Vec<PatternFailure>,
}

/// Sum every pair of `catalog` over `records`
pub fn aggregate(catalog: &PairCatalog, records: &[Record]) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for pair in catalog.pairs() {
        let total = sum_pair(pair, records);
        aggregation.failures.extend(total.failures);

        if total.matched == 0 {
            tracing::debug!(pair = %pair.key, "no matching records, pair omitted");
            continue;
        }

        tracing::debug!(pair = %pair.key, bandwidth = total.bandwidth, "pair total");
        aggregation.totals.insert(pair.key.clone(), total.bandwidth);
    }

    aggregation
}
