//! erfilter - Remove entities from Mermaid ER diagrams before rendering
//!
//! The filter works line by line: it drops the blocks of excluded
//! entities, every relationship naming one, and optionally every entity
//! left without a relationship. Kept lines are passed through verbatim.
//!
//! # Quick Start
//!
//! ```rust
//! use erfilter::{filter_with_orphans, ExclusionSet};
//!
//! let diagram = "erDiagram
//! CUSTOMER {
//!     string name
//! }
//! ORDER {
//!     int id
//! }
//! AUDIT {
//!     string event
//! }
//! CUSTOMER ||--o{ ORDER : places
//! ORDER ||--|| AUDIT : logs";
//!
//! let filtered = filter_with_orphans(diagram, &ExclusionSet::from_csv("AUDIT"));
//! assert!(!filtered.contains("AUDIT"));
//! assert!(filtered.contains("CUSTOMER ||--o{ ORDER : places"));
//! ```
//!
//! # Full pipeline
//!
//! ```rust,no_run
//! use erfilter::prelude::*;
//!
//! let pipeline = Pipeline::new(
//!     Box::new(FileSystemLoader::with_root("docs")),
//!     Box::new(HtmlRenderer::new()),
//! )
//! .with_filter(DiagramFilter::exclusion_only());
//!
//! let selection = Selection::new(
//!     vec!["diagrams/database.mmd".into()],
//!     ExclusionSet::from_csv("Session,Token"),
//! );
//! let page = pipeline.run(&selection).unwrap();
//! ```

pub mod core;
pub mod plugins;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use crate::core::*;
pub use plugins::er::{filter_exclusions, filter_with_orphans, inspect};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Detector, DiagramRenderer, ExclusionSet, FileSystemLoader, FilterError, FilterMode,
        RenderConfig, SecurityLevel, Selection, SourceLoader,
    };
    pub use crate::plugins::er::{
        DiagramFilter, ErDetector, ErSummary, FilterStats, Filtered, HtmlRenderer,
        MermaidSourceRenderer,
    };
    pub use crate::plugins::pipeline::{Pipeline, PipelineOutput};
}

/// Filter diagram text with the given mode
///
/// # Example
/// ```rust
/// use erfilter::{filter, ExclusionSet, FilterMode};
///
/// let text = "erDiagram\nA ||--|| B : rel\nC ||--|| D : rel2";
/// let out = filter(text, &ExclusionSet::from_csv("A"), FilterMode::ExclusionOnly);
/// assert_eq!(out, "erDiagram\nC ||--|| D : rel2");
/// ```
pub fn filter(text: &str, excluded: &ExclusionSet, mode: FilterMode) -> String {
    plugins::er::DiagramFilter::new(mode).filter(text, excluded)
}
