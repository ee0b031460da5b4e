//! Entity-relationship diagram plugin
//!
//! Line-level filtering of Mermaid ER diagrams.
//!
//! Syntax handled:
//! ```text
//! erDiagram
//!     CUSTOMER {
//!         string name
//!     }
//!     CUSTOMER ||--o{ ORDER : places
//! ```

mod detector;
mod filter;
mod inspect;
mod line;
mod renderer;

pub use detector::ErDetector;
pub use filter::{filter_exclusions, filter_with_orphans, DiagramFilter, FilterStats, Filtered};
pub use inspect::{inspect, ErSummary, RelationshipRef};
pub use line::{BlockScanner, LineKind, RELATIONSHIP_MARKERS};
pub use renderer::{HtmlRenderer, MermaidSourceRenderer, MERMAID_MODULE_URL};
