//! Core data model for discovery results
//!
//! This module contains the record type returned by a discovery lookup and
//! the pure helper predicates used to inspect a resolved set of records.
//! A record follows the Prometheus HTTP service discovery shape: a list of
//! target address strings plus a string-keyed label mapping.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label key under which a record carries its domain
pub const DOMAIN_LABEL: &str = "domain";

/// Path suffix of a Matrix federation version endpoint
pub const FEDERATION_SUFFIX: &str = "/_matrix/federation/v1/version";

/// Path suffix of a well-known Matrix server delegation document
pub const DELEGATION_SUFFIX: &str = "/.well-known/matrix/server";

/// Path suffix of a well-known Matrix support (MSC1929) document
pub const MSC1929_SUFFIX: &str = "/.well-known/matrix/support";

/// One discovery record: a group of targets sharing a label set
///
/// The shape is owned by the remote protocol; beyond JSON decoding the
/// client passes records through untouched. Labels commonly include a
/// `domain` entry naming the resolved domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Target address strings for this record
    #[serde(default)]
    pub targets: Vec<String>,
    /// String-keyed labels attached to every target in this record
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl Target {
    /// Returns the record's `domain` label, if present
    pub fn domain(&self) -> Option<&str> {
        self.labels.get(DOMAIN_LABEL).map(String::as_str)
    }
}

/// Collects the distinct domain labels across `records`, first-seen order
pub fn domains(records: &[Target]) -> Vec<String> {
    let mut seen = Vec::new();
    for record in records {
        if let Some(domain) = record.domain() {
            if !seen.iter().any(|known| known == domain) {
                seen.push(domain.to_string());
            }
        }
    }
    seen
}

/// Tests whether any record lists `needle` as a literal target string
pub fn contains(records: &[Target], needle: &str) -> bool {
    records
        .iter()
        .any(|record| record.targets.iter().any(|target| target == needle))
}

/// Tests whether any target points at a federation version endpoint
pub fn contains_federation(records: &[Target]) -> bool {
    contains_suffix(records, FEDERATION_SUFFIX)
}

/// Tests whether any target points at a well-known delegation document
pub fn contains_delegation(records: &[Target]) -> bool {
    contains_suffix(records, DELEGATION_SUFFIX)
}

/// Tests whether any target points at a well-known support (MSC1929) document
pub fn contains_msc1929(records: &[Target]) -> bool {
    contains_suffix(records, MSC1929_SUFFIX)
}

fn contains_suffix(records: &[Target], suffix: &str) -> bool {
    records
        .iter()
        .any(|record| record.targets.iter().any(|target| target.ends_with(suffix)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(targets: &[&str], domain: Option<&str>) -> Target {
        let mut labels = HashMap::new();
        if let Some(domain) = domain {
            labels.insert(DOMAIN_LABEL.to_string(), domain.to_string());
        }
        Target {
            targets: targets.iter().map(|t| t.to_string()).collect(),
            labels,
        }
    }

    #[test]
    fn test_domain_returns_label_when_present() {
        let target = record(&["target1"], Some("example.com"));
        assert_eq!(target.domain(), Some("example.com"));
    }

    #[test]
    fn test_domain_returns_none_when_missing() {
        let mut target = record(&["target1"], None);
        target.labels.insert("other".to_string(), "value".to_string());
        assert_eq!(target.domain(), None);
    }

    #[test]
    fn test_domains_deduplicates_across_records() {
        let records = vec![
            record(&[], Some("example.com")),
            record(&[], Some("example.org")),
            record(&[], Some("example.com")),
        ];
        assert_eq!(domains(&records), vec!["example.com", "example.org"]);
    }

    #[test]
    fn test_domains_empty_for_no_records() {
        assert!(domains(&[]).is_empty());
    }

    #[test]
    fn test_domains_skips_records_without_domain_label() {
        let mut unlabeled = record(&[], None);
        unlabeled.labels.insert("other".to_string(), "value".to_string());
        assert!(domains(&[unlabeled]).is_empty());
    }

    #[test]
    fn test_contains_finds_literal_target() {
        let records = vec![record(&["target1", "target2"], None)];
        assert!(contains(&records, "target1"));
        assert!(!contains(&records, "target3"));
    }

    #[test]
    fn test_contains_empty_records() {
        assert!(!contains(&[], "target1"));
    }

    #[test]
    fn test_contains_federation() {
        let present = vec![record(
            &["https://example.com/_matrix/federation/v1/version"],
            None,
        )];
        let absent = vec![record(&["https://example.com/some/other/endpoint"], None)];

        assert!(contains_federation(&present));
        assert!(!contains_federation(&absent));
        assert!(!contains_federation(&[]));
    }

    #[test]
    fn test_contains_delegation() {
        let present = vec![record(&["https://example.com/.well-known/matrix/server"], None)];
        let absent = vec![record(&["https://example.com/some/other/endpoint"], None)];

        assert!(contains_delegation(&present));
        assert!(!contains_delegation(&absent));
        assert!(!contains_delegation(&[]));
    }

    #[test]
    fn test_contains_msc1929() {
        let present = vec![record(&["https://example.com/.well-known/matrix/support"], None)];
        let absent = vec![record(&["https://example.com/some/other/endpoint"], None)];

        assert!(contains_msc1929(&present));
        assert!(!contains_msc1929(&absent));
        assert!(!contains_msc1929(&[]));
    }

    #[test]
    fn test_target_serialization_roundtrip() {
        let original = record(&["target1"], Some("example.com"));

        let json = serde_json::to_string(&original).expect("Failed to serialize Target");
        let decoded: Target = serde_json::from_str(&json).expect("Failed to deserialize Target");

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_target_decodes_with_missing_fields() {
        // Origins may omit either field; both default to empty
        let decoded: Target = serde_json::from_str("{}").expect("Failed to deserialize Target");
        assert!(decoded.targets.is_empty());
        assert!(decoded.labels.is_empty());
    }
}
