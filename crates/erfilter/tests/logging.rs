//! Tests for logging initialization
//!
//! Only one global subscriber can be installed per process, so most of
//! these only check that repeated initialization fails gracefully.

use erfilter::core::logging::{init_logging, LogFormat};
use erfilter::{filter_with_orphans, ExclusionSet};
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("Pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_init_logging_with_levels() {
    for level in ["trace", "debug", "info", "warn", "error", "off"] {
        let _ = init_logging(Some(level), Some("compact"));
    }
}

#[test]
fn test_init_logging_with_formats() {
    for format in LogFormat::variants() {
        let _ = init_logging(Some("info"), Some(format));
    }
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_filtering_with_trace_logging() {
    let _ = init_logging(Some("trace"), Some("json"));
    let out = filter_with_orphans(
        "erDiagram\nA {\n}\nB {\n}\nA ||--|| B : r",
        &ExclusionSet::from_csv("B"),
    );
    assert_eq!(out, "erDiagram");
}
