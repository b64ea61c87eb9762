//! Result and usage statistics of one interpolation run.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// A recoverable problem recorded during expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionWarning {
    /// The referenced template does not exist; the reference was left as is.
    MissingTemplate {
        name: String,
        /// Literal reference text, e.g. `@include(footer)`.
        reference: String,
        /// Nesting depth at which the reference was found (0 = top level).
        depth: usize,
    },
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTemplate { name, depth, .. } if *depth > 0 => write!(
                f,
                "template '{name}' not found (depth {depth}), leaving reference unchanged"
            ),
            Self::MissingTemplate { name, .. } => {
                write!(f, "template '{name}' not found, leaving reference unchanged")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpolationStats {
    /// Input length in characters.
    pub original_length: usize,
    /// Output length in characters.
    pub final_length: usize,
    /// Distinct templates expanded, transitively.
    pub templates_used: usize,
    /// Top-level variable bindings supplied by the caller.
    pub variables_provided: usize,
    /// Variable references substituted.
    pub variables_resolved: usize,
}

/// Output of [`Interpolator::interpolate`](crate::resolver::Interpolator::interpolate).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpansionResult {
    pub content: String,
    /// Never contains a name whose lookup failed.
    pub used_templates: BTreeSet<String>,
    pub warnings: Vec<ResolutionWarning>,
    /// Variable references left literal, in source order.
    pub unresolved_variables: Vec<String>,
    pub stats: InterpolationStats,
}
