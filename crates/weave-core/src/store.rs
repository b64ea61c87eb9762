//! Template lookup by name.
//!
//! A [`TemplateStore`] turns a template name into raw text. It performs no
//! expansion and no variable substitution; that is the resolver's job.
//!
//! [`DirectoryStore`] searches one base directory and caches content for the
//! lifetime of the instance. [`MemoryStore`] serves a fixed map, which is what
//! tests and embedding callers usually want.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Result, WeaveError};

/// File name suffixes tried for a template name, in order. The first existing
/// candidate wins; candidates are never merged.
pub const CANDIDATE_SUFFIXES: &[&str] = &["", ".txt", ".tmpl", ".template", ".yaml", ".yml"];

/// Resolves a template name to its raw content.
pub trait TemplateStore: Send + Sync {
    /// Load the raw content of `name`.
    ///
    /// Returns [`WeaveError::TemplateNotFound`] when no candidate exists.
    fn load(&self, name: &str) -> Result<Arc<str>>;

    /// Whether `name` can be resolved, without reading its content.
    fn exists(&self, name: &str) -> bool;

    /// Human-readable location, used in diagnostics.
    fn describe(&self) -> String;
}

/// Templates stored as files under one base directory.
#[derive(Debug)]
pub struct DirectoryStore {
    base_dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<str>>>,
}

impl DirectoryStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Candidate paths for `name`, in lookup order.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        CANDIDATE_SUFFIXES
            .iter()
            .map(|suffix| self.base_dir.join(format!("{name}{suffix}")))
            .collect()
    }

    /// First candidate that is a regular file.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        self.candidates(name).into_iter().find(|p| p.is_file())
    }

    fn cached(&self, name: &str) -> Option<Arc<str>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl TemplateStore for DirectoryStore {
    fn load(&self, name: &str) -> Result<Arc<str>> {
        if let Some(content) = self.cached(name) {
            tracing::trace!("template cache hit: {name}");
            return Ok(content);
        }

        let path = self.locate(name).ok_or_else(|| WeaveError::TemplateNotFound {
            name: name.to_string(),
            searched: self.describe(),
        })?;

        tracing::debug!("loading template '{name}' from {}", path.display());
        let content: Arc<str> = std::fs::read_to_string(&path)
            .map_err(|e| WeaveError::TemplateRead {
                path: path.clone(),
                source: e,
            })?
            .into();

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_insert_with(|| content.clone());
        Ok(content)
    }

    fn exists(&self, name: &str) -> bool {
        self.cached(name).is_some() || self.locate(name).is_some()
    }

    fn describe(&self) -> String {
        self.base_dir.display().to_string()
    }
}

/// Templates held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    templates: HashMap<String, Arc<str>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Arc<str>>) -> &mut Self {
        self.templates.insert(name.into(), content.into());
        self
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl<N, C> FromIterator<(N, C)> for MemoryStore
where
    N: Into<String>,
    C: Into<Arc<str>>,
{
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        Self {
            templates: iter
                .into_iter()
                .map(|(n, c)| (n.into(), c.into()))
                .collect(),
        }
    }
}

impl TemplateStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Arc<str>> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| WeaveError::TemplateNotFound {
                name: name.to_string(),
                searched: self.describe(),
            })
    }

    fn exists(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}
