//! Core error types for the diagram pipeline
//!
//! The filter itself is total and never produces these. They cover the
//! glue around it: loading sources, rendering and configuration.

use thiserror::Error;

/// Errors raised while loading, configuring or rendering a diagram
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Error loading {file}: {source}")]
    SourceLoad {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error rendering diagram: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl FilterError {
    /// Create a new source load error for the given file
    pub fn source_load(file: impl Into<String>, source: std::io::Error) -> Self {
        Self::SourceLoad {
            file: file.into(),
            source,
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The file that failed to load, if this is a load error
    pub fn failed_file(&self) -> Option<&str> {
        match self {
            Self::SourceLoad { file, .. } => Some(file),
            _ => None,
        }
    }
}
