//! Core abstractions for the filter pipeline
//!
//! Shared types, errors, logging and the collaborator traits (source
//! loading, detection, rendering) the ER plugin is wired through.

mod detector;
mod error;
pub mod logging;
mod renderer;
mod source;
mod types;

pub use detector::*;
pub use error::*;
pub use logging::*;
pub use renderer::*;
pub use source::*;
pub use types::*;
