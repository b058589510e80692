//! Management-plane residual bucket
//!
//! The management host's own report sees all of its traffic under the
//! self-pair `vc_vxm`. Whatever part of that total is not explained by the
//! other `vc` pairs is reported as `vc_others`.

use crate::aggregate::{round_bandwidth, FileResult};
use crate::catalog::Anchor;
use crate::config::HostIdentity;
use std::collections::BTreeMap;

/// Management host talking to itself
pub const SELF_PAIR_KEY: &str = "vc_vxm";

/// Synthetic key for unattributed management traffic
pub const RESIDUAL_KEY: &str = "vc_others";

/// `self_pair - Σ(other vc pairs)`, or `None` without a self-pair
///
/// Every other `vc_` total is attributed, including a measured `vc_others`
/// pair (a service literally named `others`). Clamped at zero: the other
/// pairs may overlap and exceed the self-pair.
pub fn compute_residual(totals: &BTreeMap<String, f64>) -> Option<f64> {
    let self_total = *totals.get(SELF_PAIR_KEY)?;
    let prefix = Anchor::Vc.key_prefix();

    let attributed: f64 = totals
        .iter()
        .filter(|(key, _)| key.starts_with(&prefix) && key.as_str() != SELF_PAIR_KEY)
        .map(|(_, bandwidth)| bandwidth)
        .sum();

    let residual = round_bandwidth(self_total - attributed);
    if residual < 0.0 {
        tracing::warn!(
            self_total,
            attributed,
            "attributed vc traffic exceeds {}, clamping {} to 0",
            SELF_PAIR_KEY,
            RESIDUAL_KEY
        );
        return Some(0.0);
    }
    Some(residual)
}

/// Add the residual bucket when `result` is the management host's report
///
/// Returns the value added, if any. Files from other hosts, or without a
/// self-pair, are left untouched.
pub fn apply_residual(result: &mut FileResult, identity: &HostIdentity) -> Option<f64> {
    if !identity.is_management_file(&result.file_name) {
        return None;
    }

    let residual = compute_residual(&result.bandwidth)?;
    if let Some(measured) = result.bandwidth.insert(RESIDUAL_KEY.to_string(), residual) {
        tracing::warn!(
            file = %result.file_name,
            measured,
            residual,
            "measured {} pair folded into the residual",
            RESIDUAL_KEY
        );
    } else {
        tracing::debug!(file = %result.file_name, residual, "added {}", RESIDUAL_KEY);
    }
    Some(residual)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> HostIdentity {
        HostIdentity::new("10.1.2.3", "10.1.2.4").unwrap()
    }

    fn result(file_name: &str, entries: &[(&str, f64)]) -> FileResult {
        let mut result = FileResult::new(file_name);
        for (key, value) in entries {
            result.bandwidth.insert(key.to_string(), *value);
        }
        result
    }

    #[test]
    fn test_residual_is_self_minus_other_vc_pairs() {
        let mut r = result(
            "10_1_2_3.csv",
            &[
                ("vc_vxm", 100.0),
                ("vc_serviceA", 20.0),
                ("vc_serviceB", 10.0),
                ("clusternodes_serviceC", 500.0),
            ],
        );
        assert_eq!(apply_residual(&mut r, &identity()), Some(70.0));
        assert_eq!(r.get(RESIDUAL_KEY), Some(70.0));
    }

    #[test]
    fn test_measured_others_pair_is_attributed_then_replaced() {
        let mut r = result(
            "10_1_2_3.csv",
            &[("vc_vxm", 100.0), ("vc_others", 40.0), ("vc_serviceA", 30.0)],
        );
        assert_eq!(apply_residual(&mut r, &identity()), Some(30.0));
        assert_eq!(r.get(RESIDUAL_KEY), Some(30.0));
        assert_eq!(r.bandwidth.len(), 3);
    }

    #[test]
    fn test_no_residual_for_other_hosts() {
        let mut r = result("10_9_9_9.csv", &[("vc_vxm", 100.0)]);
        assert_eq!(apply_residual(&mut r, &identity()), None);
        assert!(r.get(RESIDUAL_KEY).is_none());
    }

    #[test]
    fn test_no_residual_without_self_pair() {
        let mut r = result("10_1_2_3.csv", &[("vc_serviceA", 20.0)]);
        assert_eq!(apply_residual(&mut r, &identity()), None);
        assert_eq!(r.bandwidth.len(), 1);
    }

    #[test]
    fn test_residual_rounds() {
        let totals: BTreeMap<String, f64> = [
            ("vc_vxm".to_string(), 1.0),
            ("vc_a".to_string(), 0.33333),
        ]
        .into_iter()
        .collect();
        assert_eq!(compute_residual(&totals), Some(0.6667));
    }

    #[test]
    fn test_negative_residual_clamped() {
        let totals: BTreeMap<String, f64> = [
            ("vc_vxm".to_string(), 10.0),
            ("vc_a".to_string(), 25.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(compute_residual(&totals), Some(0.0));
    }

    #[test]
    fn test_self_pair_only() {
        let totals: BTreeMap<String, f64> =
            [("vc_vxm".to_string(), 42.5)].into_iter().collect();
        assert_eq!(compute_residual(&totals), Some(42.5));
    }
}
