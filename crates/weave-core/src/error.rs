//! Unified error types for weave.

use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur while loading, expanding, or binding templates.
#[derive(Error, Debug)]
pub enum WeaveError {
    // --- Template lookup ---

    /// No candidate file or entry exists for the template name.
    ///
    /// Recovered per reference by the resolver: the reference is left in place
    /// and a warning is recorded.
    #[error("template '{name}' not found in {searched}")]
    TemplateNotFound { name: String, searched: String },

    /// A candidate file exists but could not be read.
    #[error("failed to read template at {path}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // --- Expansion ---

    /// A template was referenced while it was already being expanded on the
    /// active path.
    #[error("circular template reference detected: {name} ({chain})")]
    CircularReference { name: String, chain: String },

    /// Nesting went deeper than the configured limit.
    #[error("maximum template nesting depth ({max_depth}) exceeded")]
    DepthExceeded { max_depth: usize },

    // --- Configuration ---

    /// The configuration file (`weave.config.json`) was not found.
    #[error("config file not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file exists but contains invalid JSON.
    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A variables file could not be parsed, or its top level is not a mapping.
    #[error("failed to load variables from {path}: {message}")]
    VariablesParse { path: PathBuf, message: String },

    // --- General ---

    /// A filesystem I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WeaveError {
    /// Whether the resolver may recover from this error locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::TemplateNotFound { .. })
    }
}

/// Alias for `Result<T, WeaveError>`.
pub type Result<T> = std::result::Result<T, WeaveError>;
