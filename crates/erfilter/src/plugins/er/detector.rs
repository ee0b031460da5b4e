//! ER diagram detector
//!
//! Identifies ER diagram syntax from input text.

use super::line::RELATIONSHIP_MARKERS;
use crate::core::{Detector, ER_HEADER};

/// Detector for ER diagram syntax
pub struct ErDetector;

impl ErDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ErDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for ErDetector {
    fn detect(&self, input: &str) -> bool {
        self.confidence(input) > 0.5
    }

    fn confidence(&self, input: &str) -> f64 {
        // First line that is neither blank nor a `%%` comment
        let first = input
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with("%%"));

        if first == Some(ER_HEADER) {
            return 1.0;
        }

        let has_marker = RELATIONSHIP_MARKERS.iter().any(|m| input.contains(m));
        let has_block = input.contains('{') && input.contains('}');

        if has_marker && has_block {
            return 0.6;
        }

        0.0
    }

    fn diagram_type(&self) -> &'static str {
        "er"
    }

    fn patterns(&self) -> Vec<&'static str> {
        let mut patterns = vec![ER_HEADER];
        patterns.extend(RELATIONSHIP_MARKERS);
        patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_header() {
        let detector = ErDetector::new();
        assert!(detector.detect("erDiagram\n    A ||--o{ B : has"));
        assert!(detector.detect("%% generated\n\n  erDiagram\n"));
        assert_eq!(detector.confidence("erDiagram"), 1.0);
    }

    #[test]
    fn test_headerless_fragment() {
        let detector = ErDetector::new();
        let fragment = "A {\n  int id\n}\nA ||--|{ B : has";
        assert_eq!(detector.confidence(fragment), 0.6);
        assert!(detector.detect(fragment));
    }

    #[test]
    fn test_rejects_other_diagrams() {
        let detector = ErDetector::new();
        assert!(!detector.detect("graph TD; A-->B"));
        assert!(!detector.detect("sequenceDiagram\n    Alice->>Bob: Hello"));
        assert_eq!(detector.confidence(""), 0.0);
    }

    #[test]
    fn test_metadata() {
        let detector = ErDetector::default();
        assert_eq!(detector.diagram_type(), "er");
        assert_eq!(detector.patterns(), vec!["erDiagram", "||", "--|", "--o", "o--"]);
    }
}
