//! Recursive template expansion with cycle and depth checks.
//!
//! Expansion is depth-first. Before a referenced template is loaded its name
//! is pushed onto the in-flight path of the [`ResolutionContext`]; after its
//! content has been expanded the name is popped again. A reference to a name
//! already on the path is a cycle. A name reached twice through independent
//! branches (a diamond) is fine, because the path only holds the ancestors of
//! the current expansion point.
//!
//! ```ignore
//! use weave_core::resolver::Interpolator;
//! use weave_core::store::DirectoryStore;
//!
//! let interpolator = Interpolator::new(DirectoryStore::new("prompts/templates"));
//! let result = interpolator.interpolate(&source, &bindings)?;
//! println!("{}", result.content);
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::binder::{bind_tracked, VariableBindings};
use crate::error::{Result, WeaveError};
use crate::report::{ExpansionResult, InterpolationStats, ResolutionWarning};
use crate::scanner::scan_templates;
use crate::store::TemplateStore;

/// Nesting limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// State threaded through one top-level expansion.
///
/// Owned by a single call and discarded afterwards, so markers from a failed
/// run can never leak into the next one.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    /// Nesting depth of the text currently being expanded.
    pub depth: usize,
    /// Templates on the active path, root first.
    in_flight: Vec<String>,
    /// Content already loaded in this run.
    loaded: HashMap<String, Arc<str>>,
    warnings: Vec<ResolutionWarning>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a template is on the active path (cycle detection)
    pub fn is_resolving(&self, name: &str) -> bool {
        self.in_flight.iter().any(|n| n == name)
    }

    /// Mark a template as being resolved
    pub fn start_resolving(&mut self, name: &str) {
        self.in_flight.push(name.to_string());
    }

    /// Mark a template as done resolving
    pub fn done_resolving(&mut self, name: &str) {
        if let Some(pos) = self.in_flight.iter().rposition(|n| n == name) {
            self.in_flight.remove(pos);
        }
    }

    /// Active path rendered as `a -> b -> c`.
    pub fn chain(&self) -> String {
        self.in_flight.join(" -> ")
    }

    pub fn into_warnings(self) -> Vec<ResolutionWarning> {
        self.warnings
    }
}

/// Template-expanded text for one level plus everything it used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    pub used: BTreeSet<String>,
}

/// Expands template references and binds variables.
///
/// Each call creates its own [`ResolutionContext`]; only the store is shared,
/// so an `Interpolator` may serve several calls at once.
#[derive(Debug)]
pub struct Interpolator<S> {
    store: S,
    max_depth: usize,
}

impl<S: TemplateStore> Interpolator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Expand templates, then bind variables once over the whole result.
    pub fn interpolate(&self, content: &str, bindings: &VariableBindings) -> Result<ExpansionResult> {
        let (expansion, warnings) = self.expand_templates(content)?;
        let bound = bind_tracked(&expansion.text, bindings);

        let stats = InterpolationStats {
            original_length: content.chars().count(),
            final_length: bound.text.chars().count(),
            templates_used: expansion.used.len(),
            variables_provided: bindings.len(),
            variables_resolved: bound.resolved,
        };

        Ok(ExpansionResult {
            content: bound.text,
            used_templates: expansion.used,
            warnings,
            unresolved_variables: bound.unresolved,
            stats,
        })
    }

    /// Expand template references only, with a fresh context.
    pub fn expand_templates(&self, content: &str) -> Result<(Expansion, Vec<ResolutionWarning>)> {
        let mut ctx = ResolutionContext::new();
        let expansion = self.expand(content, &mut ctx)?;
        Ok((expansion, ctx.into_warnings()))
    }

    /// Expand every template reference in `text` at `ctx.depth`.
    ///
    /// Cycles and depth overruns abort the whole expansion. Missing templates
    /// are left in place and recorded as warnings on `ctx`.
    pub fn expand(&self, text: &str, ctx: &mut ResolutionContext) -> Result<Expansion> {
        if ctx.depth >= self.max_depth {
            return Err(WeaveError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }

        let mut out = String::with_capacity(text.len());
        let mut used = BTreeSet::new();
        let mut cursor = 0;

        for reference in scan_templates(text) {
            let name = reference.name.as_str();

            if ctx.is_resolving(name) {
                return Err(WeaveError::CircularReference {
                    name: name.to_string(),
                    chain: format!("{} -> {}", ctx.chain(), name),
                });
            }

            ctx.start_resolving(name);
            let fragment = self.expand_named(name, ctx);
            ctx.done_resolving(name);

            out.push_str(&text[cursor..reference.span.start]);
            match fragment? {
                Some(fragment) => {
                    out.push_str(&fragment.text);
                    used.insert(name.to_string());
                    used.extend(fragment.used);
                }
                None => {
                    tracing::debug!("template '{name}' not found at depth {}", ctx.depth);
                    ctx.warnings.push(ResolutionWarning::MissingTemplate {
                        name: name.to_string(),
                        reference: reference.literal(text).to_string(),
                        depth: ctx.depth,
                    });
                    out.push_str(reference.literal(text));
                }
            }
            cursor = reference.span.end;
        }
        out.push_str(&text[cursor..]);

        Ok(Expansion { text: out, used })
    }

    /// Load `name` and expand it one level deeper. `Ok(None)` when missing.
    fn expand_named(&self, name: &str, ctx: &mut ResolutionContext) -> Result<Option<Expansion>> {
        let content = match ctx.loaded.get(name) {
            Some(content) => content.clone(),
            None => match self.store.load(name) {
                Ok(content) => {
                    ctx.loaded.insert(name.to_string(), content.clone());
                    content
                }
                Err(e) if e.is_recoverable() => return Ok(None),
                Err(e) => return Err(e),
            },
        };

        ctx.depth += 1;
        let expansion = self.expand(&content, ctx);
        ctx.depth -= 1;
        expansion.map(Some)
    }
}
