//! Command-line interface for the discovery client
//!
//! This module handles parsing of CLI arguments using clap and formatting
//! of resolved record sets for terminal output.

use clap::Parser;

use crate::client::DEFAULT_CATEGORY;
use crate::data::{self, Target};

/// Resolve identifiers against a discovery endpoint
#[derive(Parser, Debug)]
#[command(name = "promsd")]
#[command(about = "Resolve identifiers against a Prometheus-style HTTP service discovery endpoint")]
#[command(version)]
pub struct Cli {
    /// Base URL of the discovery endpoint
    #[arg(long, value_name = "URL")]
    pub url: String,

    /// Basic-auth login
    #[arg(long)]
    pub login: String,

    /// Basic-auth password
    #[arg(long)]
    pub password: String,

    /// Category path prefix to query
    #[arg(long, default_value = DEFAULT_CATEGORY)]
    pub category: String,

    /// Print raw JSON records instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Identifiers to resolve
    #[arg(required = true, value_name = "IDENTIFIER")]
    pub identifiers: Vec<String>,
}

/// Formats a resolved record set as a short human-readable summary
///
/// One line with record and target counts, then the distinct domains and
/// the recognized well-known capabilities, each on its own indented line
/// when present.
pub fn summarize(identifier: &str, records: &[Target]) -> String {
    let target_count: usize = records.iter().map(|record| record.targets.len()).sum();
    let mut out = format!(
        "{identifier}: {} record(s), {target_count} target(s)",
        records.len()
    );

    let domains = data::domains(records);
    if !domains.is_empty() {
        out.push_str(&format!("\n  domains: {}", domains.join(", ")));
    }

    let mut capabilities = Vec::new();
    if data::contains_federation(records) {
        capabilities.push("federation");
    }
    if data::contains_delegation(records) {
        capabilities.push("delegation");
    }
    if data::contains_msc1929(records) {
        capabilities.push("msc1929");
    }
    if !capabilities.is_empty() {
        out.push_str(&format!("\n  capabilities: {}", capabilities.join(", ")));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn record(targets: &[&str], domain: &str) -> Target {
        Target {
            targets: targets.iter().map(|t| t.to_string()).collect(),
            labels: HashMap::from([("domain".to_string(), domain.to_string())]),
        }
    }

    #[test]
    fn test_cli_parse_minimal() {
        let cli = Cli::parse_from([
            "promsd",
            "--url",
            "http://example.com",
            "--login",
            "user",
            "--password",
            "secret",
            "example.com",
        ]);
        assert_eq!(cli.url, "http://example.com");
        assert_eq!(cli.category, DEFAULT_CATEGORY);
        assert!(!cli.json);
        assert_eq!(cli.identifiers, vec!["example.com"]);
    }

    #[test]
    fn test_cli_parse_category_and_multiple_identifiers() {
        let cli = Cli::parse_from([
            "promsd",
            "--url",
            "http://example.com",
            "--login",
            "user",
            "--password",
            "secret",
            "--category",
            "challenge",
            "--json",
            "a.example",
            "b.example",
        ]);
        assert_eq!(cli.category, "challenge");
        assert!(cli.json);
        assert_eq!(cli.identifiers, vec!["a.example", "b.example"]);
    }

    #[test]
    fn test_cli_requires_identifier() {
        let result = Cli::try_parse_from([
            "promsd",
            "--url",
            "http://example.com",
            "--login",
            "user",
            "--password",
            "secret",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_summarize_empty_records() {
        assert_eq!(summarize("example.com", &[]), "example.com: 0 record(s), 0 target(s)");
    }

    #[test]
    fn test_summarize_lists_domains_and_capabilities() {
        let records = vec![
            record(&["https://a.example/_matrix/federation/v1/version"], "a.example"),
            record(&["https://b.example/.well-known/matrix/server"], "b.example"),
        ];

        let summary = summarize("example.com", &records);
        assert!(summary.starts_with("example.com: 2 record(s), 2 target(s)"));
        assert!(summary.contains("domains: a.example, b.example"));
        assert!(summary.contains("capabilities: federation, delegation"));
        assert!(!summary.contains("msc1929"));
    }
}
