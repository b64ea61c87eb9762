//! Reference scanning for template and variable markers.
//!
//! Every surface syntax is a `(pattern, tag)` pair evaluated in a fixed
//! priority order. All patterns run over the whole text, then the matches are
//! ordered by source position. When two matches start at the same byte the
//! higher-priority pattern wins, and any match overlapping an accepted one is
//! dropped, so replacement order is reproducible.
//!
//! ## Template syntaxes (priority order)
//!
//! | Syntax | Example |
//! |---|---|
//! | [`TemplateSyntax::DoubleBrace`] | `{{header}}` |
//! | [`TemplateSyntax::DollarBrace`] | `${header}` |
//! | [`TemplateSyntax::Tag`] | `<template:header/>` |
//! | [`TemplateSyntax::Include`] | `@include(header)` |
//! | [`TemplateSyntax::DoubleBracket`] | `[[header]]` |
//!
//! ## Variable syntaxes (priority order)
//!
//! | Syntax | Example |
//! |---|---|
//! | [`VariableSyntax::Dotted`] | `{{user.name}}` |
//! | [`VariableSyntax::Dollar`] | `$price` |
//! | [`VariableSyntax::PercentBrace`] | `%{price}` |

use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// Surface syntax of a template reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateSyntax {
    DoubleBrace,
    DollarBrace,
    Tag,
    Include,
    DoubleBracket,
}

impl TemplateSyntax {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DoubleBrace => "double_braces",
            Self::DollarBrace => "dollar_braces",
            Self::Tag => "tag",
            Self::Include => "include",
            Self::DoubleBracket => "double_brackets",
        }
    }
}

impl fmt::Display for TemplateSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Surface syntax of a variable reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableSyntax {
    Dotted,
    Dollar,
    PercentBrace,
}

impl VariableSyntax {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dotted => "dot_notation",
            Self::Dollar => "dollar_sign",
            Self::PercentBrace => "percent_braces",
        }
    }
}

impl fmt::Display for VariableSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A located reference inside scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMatch<K> {
    /// Byte range of the whole marker, e.g. `{{header}}`.
    pub span: Range<usize>,
    /// Referenced name. Dotted variables keep their dots (`user.name`).
    pub name: String,
    pub syntax: K,
}

impl<K> ReferenceMatch<K> {
    /// The literal marker text as it appears in `source`.
    pub fn literal<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }

    /// Path segments of the name (a single segment unless dotted).
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.name.split('.')
    }
}

// `name` is ASCII word characters only; `\w` in the regex crate is Unicode-aware.
static TEMPLATE_PATTERNS: Lazy<Vec<(Regex, TemplateSyntax)>> = Lazy::new(|| {
    compile(&[
        (r"\{\{([A-Za-z0-9_]+)\}\}", TemplateSyntax::DoubleBrace),
        (r"\$\{([A-Za-z0-9_]+)\}", TemplateSyntax::DollarBrace),
        (r"<template:([A-Za-z0-9_]+)/>", TemplateSyntax::Tag),
        (r"@include\(([A-Za-z0-9_]+)\)", TemplateSyntax::Include),
        (r"\[\[([A-Za-z0-9_]+)\]\]", TemplateSyntax::DoubleBracket),
    ])
});

static VARIABLE_PATTERNS: Lazy<Vec<(Regex, VariableSyntax)>> = Lazy::new(|| {
    compile(&[
        (
            r"\{\{([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)+)\}\}",
            VariableSyntax::Dotted,
        ),
        // The name class excludes `{`, so `${name}` never matches here.
        (r"\$([A-Za-z0-9_]+)", VariableSyntax::Dollar),
        (r"%\{([A-Za-z0-9_]+)\}", VariableSyntax::PercentBrace),
    ])
});

fn compile<K: Copy>(table: &[(&str, K)]) -> Vec<(Regex, K)> {
    table
        .iter()
        .map(|(pattern, tag)| (Regex::new(pattern).unwrap(), *tag))
        .collect()
}

fn scan<K: Copy>(text: &str, patterns: &[(Regex, K)]) -> Vec<ReferenceMatch<K>> {
    let mut found: Vec<(usize, ReferenceMatch<K>)> = Vec::new();
    for (priority, (re, tag)) in patterns.iter().enumerate() {
        for caps in re.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            found.push((
                priority,
                ReferenceMatch {
                    span: whole.range(),
                    name: name.as_str().to_string(),
                    syntax: *tag,
                },
            ));
        }
    }

    found.sort_by_key(|(priority, m)| (m.span.start, *priority));

    let mut accepted: Vec<ReferenceMatch<K>> = Vec::with_capacity(found.len());
    let mut end = 0;
    for (_, m) in found {
        if m.span.start < end {
            continue;
        }
        end = m.span.end;
        accepted.push(m);
    }
    accepted
}

/// Find every template reference in `text`, in source order.
///
/// Duplicate names are kept; callers cache by name, not by match.
pub fn scan_templates(text: &str) -> Vec<ReferenceMatch<TemplateSyntax>> {
    scan(text, &TEMPLATE_PATTERNS)
}

/// Find every variable reference in `text`, in source order.
pub fn scan_variables(text: &str) -> Vec<ReferenceMatch<VariableSyntax>> {
    scan(text, &VARIABLE_PATTERNS)
}

/// 1-based line number of a byte offset.
pub fn line_of(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<K>(matches: &[ReferenceMatch<K>]) -> Vec<&str> {
        matches.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_all_template_syntaxes() {
        let text = "{{a}} ${b} <template:c/> @include(d) [[e]]";
        let refs = scan_templates(text);
        assert_eq!(names(&refs), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(
            refs.iter().map(|m| m.syntax).collect::<Vec<_>>(),
            vec![
                TemplateSyntax::DoubleBrace,
                TemplateSyntax::DollarBrace,
                TemplateSyntax::Tag,
                TemplateSyntax::Include,
                TemplateSyntax::DoubleBracket,
            ]
        );
    }

    #[test]
    fn test_templates_in_source_order_across_syntaxes() {
        let text = "[[last_kind_first]] then {{first_kind_second}}";
        let refs = scan_templates(text);
        assert_eq!(names(&refs), vec!["last_kind_first", "first_kind_second"]);
    }

    #[test]
    fn test_spans_cover_marker() {
        let text = "x @include(footer) y";
        let refs = scan_templates(text);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].literal(text), "@include(footer)");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let refs = scan_templates("{{a}}{{a}}${a}");
        assert_eq!(names(&refs), vec!["a", "a", "a"]);
    }

    #[test]
    fn test_dotted_is_not_a_template() {
        assert!(scan_templates("{{user.name}}").is_empty());
        let vars = scan_variables("{{user.name}}");
        assert_eq!(names(&vars), vec!["user.name"]);
        assert_eq!(vars[0].syntax, VariableSyntax::Dotted);
    }

    #[test]
    fn test_plain_double_brace_is_not_a_variable() {
        assert!(scan_variables("{{header}}").is_empty());
    }

    #[test]
    fn test_deep_dotted_path() {
        let vars = scan_variables("{{a.b.c}}");
        assert_eq!(names(&vars), vec!["a.b.c"]);
        assert_eq!(vars[0].segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dollar_brace_is_not_a_dollar_variable() {
        assert!(scan_variables("${header}").is_empty());
        let vars = scan_variables("$price and %{qty}");
        assert_eq!(names(&vars), vec!["price", "qty"]);
        assert_eq!(vars[1].syntax, VariableSyntax::PercentBrace);
    }

    #[test]
    fn test_non_ascii_names_do_not_match() {
        assert!(scan_templates("{{naïve}}").is_empty());
    }

    #[test]
    fn test_no_references() {
        assert!(scan_templates("plain text { } $ {{ }}").is_empty());
        assert!(scan_variables("plain text").is_empty());
    }

    #[test]
    fn test_line_of() {
        let text = "one\ntwo\n{{x}}";
        let refs = scan_templates(text);
        assert_eq!(line_of(text, refs[0].span.start), 3);
        assert_eq!(line_of(text, 0), 1);
    }
}
