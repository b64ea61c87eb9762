//! Reference checking without expansion.
//!
//! Uses the same scanner as the resolver, so a document that passes the check
//! has no reference the resolver would leave unresolved at the top level.
//! Nested fragments are not opened.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::scanner::{line_of, scan_templates, scan_variables};
use crate::store::TemplateStore;

/// A template reference that the store cannot resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingReference {
    pub name: String,
    /// 1-based line of the first occurrence.
    pub line: usize,
    pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceReport {
    /// Distinct template names referenced.
    pub templates: BTreeSet<String>,
    /// Distinct missing templates, in order of first occurrence.
    pub missing: Vec<MissingReference>,
    /// Distinct variable names referenced.
    pub variables: BTreeSet<String>,
}

impl ReferenceReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check every top-level template reference in `content` against `store`.
pub fn check_references<S: TemplateStore>(store: &S, content: &str) -> ReferenceReport {
    let mut report = ReferenceReport::default();
    let mut reported = HashSet::new();

    for reference in scan_templates(content) {
        report.templates.insert(reference.name.clone());
        if reported.contains(&reference.name) || store.exists(&reference.name) {
            continue;
        }
        reported.insert(reference.name.clone());
        report.missing.push(MissingReference {
            line: line_of(content, reference.span.start),
            reference: reference.literal(content).to_string(),
            name: reference.name,
        });
    }

    report.variables = scan_variables(content).into_iter().map(|v| v.name).collect();
    report
}
