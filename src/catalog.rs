//! Pair catalog discovery
//!
//! First pass over a record table: find every service that exchanges traffic
//! with an anchor role and build one [`Pair`] per (anchor, service). Summing
//! bandwidth is a separate pass (see [`crate::aggregate`]).
//!
//! Matching uses a closed set of pattern kinds instead of composed regular
//! expressions, so service names are always compared literally.

use crate::normalize;
use crate::record::Record;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Separator between source and destination in a direction label
pub const ARROW: &str = "->";

/// Fixed traffic endpoints used as the classification pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Anchor {
    /// Management-plane host
    Vc,
    /// Cluster node hosts
    ClusterNodes,
}

impl Anchor {
    /// All anchors, in catalog order
    pub const ALL: [Anchor; 2] = [Anchor::Vc, Anchor::ClusterNodes];

    /// Token as it appears in direction labels and pair keys
    pub fn token(self) -> &'static str {
        match self {
            Anchor::Vc => "vc",
            Anchor::ClusterNodes => "clusternodes",
        }
    }

    /// `anchor->`, the anchor as traffic source
    pub fn outbound_token(self) -> String {
        format!("{}{}", self.token(), ARROW)
    }

    /// `->anchor`, the anchor as traffic destination
    pub fn inbound_token(self) -> String {
        format!("{}{}", ARROW, self.token())
    }

    /// Key prefix shared by every pair of this anchor (`vc_`)
    pub fn key_prefix(self) -> String {
        format!("{}_", self.token())
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Pattern evaluation failures
///
/// Isolated to the pattern that hit them; the aggregator logs the failure and
/// treats the pattern as contributing nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("row {row} has no direction text")]
    MissingDirection { row: usize },
}

/// One of the two directional patterns backing a pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchPattern {
    /// Anchor, then `->`, then the service, anywhere in the label
    AnchorToService { anchor: Anchor, service: String },
    /// Service, then `->`, then the anchor, anywhere in the label
    ServiceToAnchor { service: String, anchor: Anchor },
}

impl MatchPattern {
    /// Loose, unanchored match against a full direction label
    ///
    /// `vc->vxm-1a2b3c4d` matches `AnchorToService { vc, vxm }`, and so does
    /// `vc-proxy->vxm`, since the anchor only has to occur before the arrow.
    pub fn matches(&self, direction: &str) -> bool {
        match self {
            MatchPattern::AnchorToService { anchor, service } => {
                contains_in_order(direction, &[anchor.token(), ARROW, service.as_str()])
            }
            MatchPattern::ServiceToAnchor { service, anchor } => {
                contains_in_order(direction, &[service.as_str(), ARROW, anchor.token()])
            }
        }
    }

    /// Evaluate against a record, failing when the record has no direction
    pub fn evaluate(&self, row: usize, record: &Record) -> Result<bool, MatchError> {
        record
            .direction
            .as_deref()
            .map(|direction| self.matches(direction))
            .ok_or(MatchError::MissingDirection { row })
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPattern::AnchorToService { anchor, service } => {
                write!(f, "{}*{}*{}*", anchor, ARROW, service)
            }
            MatchPattern::ServiceToAnchor { service, anchor } => {
                write!(f, "{}*{}*{}", service, ARROW, anchor)
            }
        }
    }
}

/// True when every needle occurs in `haystack`, each after the previous one
fn contains_in_order(haystack: &str, needles: &[&str]) -> bool {
    let mut rest = haystack;
    for needle in needles {
        match rest.find(needle) {
            Some(idx) => rest = &rest[idx + needle.len()..],
            None => return false,
        }
    }
    true
}

/// A logical traffic category: one anchor talking to one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    pub anchor: Anchor,
    pub service: String,
    pub patterns: [MatchPattern; 2],
}

impl Pair {
    pub fn new(anchor: Anchor, service: impl Into<String>) -> Self {
        let service = service.into();
        Self {
            key: format!("{}{}", anchor.key_prefix(), service),
            anchor,
            patterns: [
                MatchPattern::AnchorToService {
                    anchor,
                    service: service.clone(),
                },
                MatchPattern::ServiceToAnchor {
                    service: service.clone(),
                    anchor,
                },
            ],
            service,
        }
    }
}

/// All pairs discovered in one record table
#[derive(Debug, Clone, Default)]
pub struct PairCatalog {
    pairs: Vec<Pair>,
}

impl PairCatalog {
    /// Scan `records` once and emit a pair per (anchor, service)
    ///
    /// Order is deterministic: anchors in [`Anchor::ALL`] order, services
    /// sorted within each anchor. Records without a direction are skipped.
    pub fn build(records: &[Record]) -> Self {
        let mut services: [BTreeSet<String>; 2] = Default::default();

        for direction in records.iter().filter_map(|r| r.direction.as_deref()) {
            for (idx, anchor) in Anchor::ALL.iter().enumerate() {
                if normalize::touches_anchor(direction, *anchor) {
                    services[idx].insert(normalize::service_name(direction, *anchor));
                }
            }
        }

        let pairs = Anchor::ALL
            .iter()
            .zip(services)
            .flat_map(|(anchor, names)| names.into_iter().map(move |s| Pair::new(*anchor, s)))
            .collect::<Vec<_>>();

        tracing::debug!(pairs = pairs.len(), "built pair catalog");

        Self { pairs }
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&Pair> {
        self.pairs.iter().find(|p| p.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|p| p.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
