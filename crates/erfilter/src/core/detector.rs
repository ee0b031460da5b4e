//! Diagram type detection
//!
//! Detection is advisory: the pipeline logs when input does not look like
//! the expected diagram type but never refuses to filter it.

/// Core trait for diagram type detectors
pub trait Detector: Send + Sync {
    /// Detect if the input matches this diagram type
    fn detect(&self, input: &str) -> bool;

    /// Get the confidence level of the detection (0.0 to 1.0)
    fn confidence(&self, input: &str) -> f64;

    /// Get the diagram type name
    fn diagram_type(&self) -> &'static str;

    /// Get key patterns that this detector looks for
    fn patterns(&self) -> Vec<&'static str>;
}
