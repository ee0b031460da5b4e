//! Rendering collaborator trait
//!
//! A renderer turns filtered diagram text into markup. The filter never
//! depends on it; the pipeline hands the filtered text over once per run.

use super::{FilterError, RenderConfig};

/// Turns diagram text into rendered output
pub trait DiagramRenderer: Send + Sync {
    /// Render the diagram text with the given options
    fn render(&self, diagram: &str, config: &RenderConfig) -> Result<String, FilterError>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the output format produced (e.g. `mmd`, `html`)
    fn format(&self) -> &'static str;
}
