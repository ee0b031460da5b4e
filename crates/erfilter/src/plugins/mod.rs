//! Diagram plugins and the pipeline that drives them
//!
//! Only the Mermaid ER dialect is handled.

pub mod er;
pub mod pipeline;

pub use er::*;
pub use pipeline::*;
