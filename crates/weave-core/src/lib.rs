//! Core library for weave.
//!
//! Expands template references inside text documents (prompts, configs,
//! boilerplate) by pulling in named fragments, recursively, then binds
//! variables once over the fully expanded result.
//!
//! The pipeline, leaf-first:
//! - [`scanner`] finds template and variable references in five and three
//!   surface syntaxes respectively
//! - [`store::TemplateStore`] resolves a name to raw text; [`store::DirectoryStore`]
//!   searches a directory and caches, [`store::MemoryStore`] serves a map
//! - [`resolver::Interpolator`] expands references depth-first, rejecting
//!   cycles and runaway nesting
//! - [`binder`] substitutes variables, including dotted paths into nested values
//!
//! [`check::check_references`] reuses the scanner to report missing templates
//! without expanding anything.

pub mod binder;
pub mod check;
pub mod config;
pub mod error;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod store;

pub use binder::VariableBindings;
pub use error::{Result, WeaveError};
pub use report::ExpansionResult;
pub use resolver::{Interpolator, DEFAULT_MAX_DEPTH};
