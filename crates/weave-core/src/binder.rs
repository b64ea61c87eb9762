//! Variable binding over fully expanded text.
//!
//! Binding runs exactly once, after all template expansion is complete, so
//! variables inside fragments see the caller's top-level bindings. Unresolved
//! references are left as their literal text; binding never fails.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Result, WeaveError};
use crate::scanner::{scan_variables, VariableSyntax};

/// Caller-supplied variable values, keyed by top-level name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableBindings {
    values: Map<String, Value>,
}

impl VariableBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Parse `key=value` assignments.
    ///
    /// The value is parsed as JSON when possible (`n=10`, `flags=[1,2]`) and
    /// kept as a plain string otherwise. Entries without `=` are skipped.
    pub fn parse_assignments<S: AsRef<str>>(assignments: &[S]) -> Self {
        let mut values = Map::new();
        for raw in assignments {
            let raw = raw.as_ref();
            let Some((key, value)) = raw.split_once('=') else {
                tracing::warn!("invalid variable format '{raw}', expected 'key=value'");
                continue;
            };
            let parsed = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
            values.insert(key.to_string(), parsed);
        }
        Self { values }
    }

    /// Load bindings from a JSON or YAML file, chosen by extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let parse_failed = |message: String| WeaveError::VariablesParse {
            path: path.to_path_buf(),
            message,
        };

        let value: Value = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&contents).map_err(|e| parse_failed(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&contents).map_err(|e| parse_failed(e.to_string()))?,
            other => {
                tracing::warn!(
                    "unknown variables file type {}, trying JSON",
                    other.unwrap_or("(none)")
                );
                serde_json::from_str(&contents).map_err(|e| parse_failed(e.to_string()))?
            }
        };

        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::new()),
            _ => Err(parse_failed("top level must be a mapping".to_string())),
        }
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: VariableBindings) {
        self.values.extend(other.values);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Number of top-level bindings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Walk a dotted path. Stops at the first missing segment or non-mapping
    /// value.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.values.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl From<Map<String, Value>> for VariableBindings {
    fn from(values: Map<String, Value>) -> Self {
        Self::from_map(values)
    }
}

/// Result of a binding pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BindOutcome {
    pub text: String,
    /// Number of references substituted.
    pub resolved: usize,
    /// Names left literal, in source order (duplicates kept).
    pub unresolved: Vec<String>,
}

/// Text form of a bound value. `null` counts as unresolved.
fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Substitute every resolvable variable reference in `text`.
pub fn bind(text: &str, bindings: &VariableBindings) -> String {
    bind_tracked(text, bindings).text
}

/// Like [`bind`], also reporting what was and wasn't resolved.
pub fn bind_tracked(text: &str, bindings: &VariableBindings) -> BindOutcome {
    let mut out = String::with_capacity(text.len());
    let mut resolved = 0;
    let mut unresolved = Vec::new();
    let mut cursor = 0;

    for var in scan_variables(text) {
        let value = match var.syntax {
            VariableSyntax::Dotted => bindings.lookup(&var.name),
            VariableSyntax::Dollar | VariableSyntax::PercentBrace => bindings.values.get(&var.name),
        };

        out.push_str(&text[cursor..var.span.start]);
        match value.and_then(render_value) {
            Some(rendered) => {
                out.push_str(&rendered);
                resolved += 1;
            }
            None => {
                out.push_str(var.literal(text));
                unresolved.push(var.name);
            }
        }
        cursor = var.span.end;
    }
    out.push_str(&text[cursor..]);

    BindOutcome {
        text: out,
        resolved,
        unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bindings(value: Value) -> VariableBindings {
        match value {
            Value::Object(map) => VariableBindings::from_map(map),
            _ => panic!("test bindings must be an object"),
        }
    }

    #[test]
    fn test_dotted_lookup() {
        let vars = bindings(json!({ "user": { "name": "Ada" } }));
        assert_eq!(bind("Hi {{user.name}}!", &vars), "Hi Ada!");
    }

    #[test]
    fn test_dotted_missing_segment_left_literal() {
        let vars = bindings(json!({ "user": { "name": "Ada" } }));
        let out = bind_tracked("{{user.missing}}", &vars);
        assert_eq!(out.text, "{{user.missing}}");
        assert_eq!(out.unresolved, vec!["user.missing"]);
        assert_eq!(out.resolved, 0);
    }

    #[test]
    fn test_dotted_through_scalar_is_unresolved() {
        let vars = bindings(json!({ "user": "Ada" }));
        assert_eq!(bind("{{user.name}}", &vars), "{{user.name}}");
    }

    #[test]
    fn test_deep_dotted_path() {
        let vars = bindings(json!({ "a": { "b": { "c": 3 } } }));
        assert_eq!(bind("{{a.b.c}}", &vars), "3");
    }

    #[test]
    fn test_dollar_number() {
        let vars = bindings(json!({ "price": 10 }));
        assert_eq!(bind("cost: $price", &vars), "cost: 10");
    }

    #[test]
    fn test_dollar_brace_untouched() {
        let vars = bindings(json!({ "price": 10 }));
        assert_eq!(bind("${price}", &vars), "${price}");
    }

    #[test]
    fn test_percent_brace() {
        let vars = bindings(json!({ "env": "prod", "on": true }));
        assert_eq!(bind("%{env}/%{on}", &vars), "prod/true");
    }

    #[test]
    fn test_null_is_unresolved() {
        let vars = bindings(json!({ "x": null }));
        assert_eq!(bind("$x", &vars), "$x");
    }

    #[test]
    fn test_compound_values_render_as_json() {
        let vars = bindings(json!({ "tags": ["a", "b"] }));
        assert_eq!(bind("$tags", &vars), r#"["a","b"]"#);
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let vars = bindings(json!({ "a": "$b", "b": "nope" }));
        assert_eq!(bind("$a", &vars), "$b");
    }

    #[test]
    fn test_plain_template_marker_untouched() {
        let vars = bindings(json!({ "header": "x" }));
        assert_eq!(bind("{{header}}", &vars), "{{header}}");
    }

    #[test]
    fn test_parse_assignments() {
        let vars = VariableBindings::parse_assignments(&[
            "name=John",
            "age=30",
            "expr=a=b",
            "bogus",
            "list=[1,2]",
        ]);
        assert_eq!(vars.len(), 4);
        assert_eq!(vars.lookup("name"), Some(&json!("John")));
        assert_eq!(vars.lookup("age"), Some(&json!(30)));
        assert_eq!(vars.lookup("expr"), Some(&json!("a=b")));
        assert_eq!(vars.lookup("list"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_merge_overrides() {
        let mut vars = VariableBindings::parse_assignments(&["a=1", "b=2"]);
        vars.merge(VariableBindings::parse_assignments(&["b=3"]));
        assert_eq!(vars.lookup("a"), Some(&json!(1)));
        assert_eq!(vars.lookup("b"), Some(&json!(3)));
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.yaml");
        std::fs::write(&path, "user:\n  name: Ada\nprice: 10\n").unwrap();

        let vars = VariableBindings::from_file(&path).unwrap();
        assert_eq!(bind("{{user.name}} $price", &vars), "Ada 10");
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.json");
        std::fs::write(&path, r#"{"mode": "fast"}"#).unwrap();

        let vars = VariableBindings::from_file(&path).unwrap();
        assert_eq!(vars.lookup("mode"), Some(&json!("fast")));
    }

    #[test]
    fn test_from_file_rejects_non_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let err = VariableBindings::from_file(&path).unwrap_err();
        assert!(matches!(err, WeaveError::VariablesParse { .. }));
    }

    #[test]
    fn test_unknown_extension_parsed_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.conf");
        std::fs::write(&path, r#"{"level": 2}"#).unwrap();

        let vars = VariableBindings::from_file(&path).unwrap();
        assert_eq!(vars.lookup("level"), Some(&json!(2)));
    }

    #[test]
    fn test_unknown_extension_rejects_yaml_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.conf");
        std::fs::write(&path, "level: 2\n").unwrap();

        assert!(matches!(
            VariableBindings::from_file(&path),
            Err(WeaveError::VariablesParse { .. })
        ));
    }

    #[test]
    fn test_empty_yaml_file_gives_no_bindings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.yml");
        std::fs::write(&path, "~\n").unwrap();

        let vars = VariableBindings::from_file(&path).unwrap();
        assert!(vars.is_empty());
    }
}
