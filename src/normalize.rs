//! Direction normalization
//!
//! Turns a raw `source->destination` label into the bare service name on the
//! far side of an anchor role, e.g. `vc->serviceA-7f3a9c21` → `serviceA`.

use crate::catalog::Anchor;
use regex::Regex;
use std::sync::OnceLock;

/// Per-instance suffix: hyphen, 8+ hex characters, anything after
const INSTANCE_SUFFIX: &str = r"-[a-f0-9]{8,}.*$";

fn instance_suffix() -> &'static Regex {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    SUFFIX.get_or_init(|| Regex::new(INSTANCE_SUFFIX).expect("instance suffix pattern is valid"))
}

/// Check whether a direction has `anchor` as its source or destination
pub fn touches_anchor(direction: &str, anchor: Anchor) -> bool {
    direction.starts_with(&anchor.outbound_token()) || direction.ends_with(&anchor.inbound_token())
}

/// Remove every occurrence of the anchor tokens from a direction
///
/// Only the `anchor->` and `->anchor` forms are removed, so a service whose
/// name merely contains the anchor text (`vcenter`) survives.
pub fn strip_anchor(direction: &str, anchor: Anchor) -> String {
    direction
        .replace(&anchor.outbound_token(), "")
        .replace(&anchor.inbound_token(), "")
}

/// Collapse per-instance identifiers (pod/container hashes) into one name
pub fn strip_instance_suffix(name: &str) -> String {
    instance_suffix().replace(name, "").into_owned()
}

/// Derive the canonical service name for `direction` relative to `anchor`
///
/// Never fails: a direction that does not touch the anchor passes through
/// with only the suffix rule applied.
pub fn service_name(direction: &str, anchor: Anchor) -> String {
    strip_instance_suffix(&strip_anchor(direction, anchor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_outbound_anchor_and_suffix() {
        assert_eq!(service_name("vc->serviceA-7f3a9c21", Anchor::Vc), "serviceA");
    }

    #[test]
    fn test_strip_inbound_anchor() {
        assert_eq!(service_name("serviceA->vc", Anchor::Vc), "serviceA");
    }

    #[test]
    fn test_clusternodes_anchor() {
        assert_eq!(
            service_name("clusternodes->serviceB-9f8e7d6c5b", Anchor::ClusterNodes),
            "serviceB"
        );
        assert_eq!(
            service_name("serviceB-0123abcd->clusternodes", Anchor::ClusterNodes),
            "serviceB"
        );
    }

    #[test]
    fn test_suffix_swallows_trailing_text() {
        assert_eq!(
            strip_instance_suffix("mystic-deadbeef00-extra.local"),
            "mystic"
        );
    }

    #[test]
    fn test_short_hex_suffix_is_kept() {
        // Seven hex characters are not an instance identifier
        assert_eq!(strip_instance_suffix("svc-abc1234"), "svc-abc1234");
    }

    #[test]
    fn test_uppercase_hex_is_not_an_instance_suffix() {
        assert_eq!(strip_instance_suffix("svc-ABCDEF12"), "svc-ABCDEF12");
    }

    #[test]
    fn test_canonical_name_is_fixed_point() {
        let once = service_name("vc->vxm-1234abcd", Anchor::Vc);
        let twice = service_name(&once, Anchor::Vc);
        assert_eq!(once, "vxm");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unrecognized_format_passes_through() {
        assert_eq!(service_name("hostA->hostB", Anchor::Vc), "hostA->hostB");
    }

    #[test]
    fn test_name_containing_anchor_text_survives() {
        assert_eq!(service_name("vc->vcenter", Anchor::Vc), "vcenter");
    }

    #[test]
    fn test_touches_anchor() {
        assert!(touches_anchor("vc->svc", Anchor::Vc));
        assert!(touches_anchor("svc->vc", Anchor::Vc));
        assert!(!touches_anchor("svc->vcenter", Anchor::Vc));
        assert!(!touches_anchor("vcenter->svc", Anchor::Vc));
        assert!(touches_anchor("svc->clusternodes", Anchor::ClusterNodes));
        assert!(!touches_anchor("svc->clusternodes", Anchor::Vc));
    }
}
