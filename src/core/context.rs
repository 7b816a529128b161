//! Session context: free-form key/value facts passed to specialists.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Key/value context attached to a chat session.
///
/// Keys are kept sorted so the serialized view handed to the model is
/// stable from one turn to the next.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Context {
    entries: BTreeMap<String, Value>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts or replaces a value.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Looks up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the context has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Pretty-printed JSON object (two-space indent).
    #[must_use]
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.entries).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Parses a `KEY=VALUE` pair.
///
/// The value is read as JSON when it parses (`budget=40`, `tags=["red"]`),
/// otherwise it is kept as a plain string.
#[must_use]
pub fn parse_assignment(input: &str) -> Option<(String, Value)> {
    let (key, raw) = input.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let raw = raw.trim();
    let value =
        serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Some((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_and_clear() {
        let mut ctx = Context::new();
        ctx.add("k", "v");
        assert_eq!(ctx.get("k"), Some(&json!("v")));
        assert_eq!(ctx.len(), 1);

        ctx.clear();
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_add_replaces_existing_key() {
        let mut ctx = Context::new();
        ctx.add("budget", 20);
        ctx.add("budget", 40);
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.get("budget"), Some(&json!(40)));
    }

    #[test]
    fn test_pretty_json_is_sorted_and_indented() {
        let mut ctx = Context::new();
        ctx.add("zeta", "last");
        ctx.add("alpha", json!(["red", "white"]));
        let rendered = ctx.to_pretty_json();
        assert!(rendered.starts_with("{\n  \"alpha\""));
        assert!(rendered.find("alpha") < rendered.find("zeta"));
    }

    #[test]
    fn test_empty_renders_as_empty_object() {
        assert_eq!(Context::new().to_pretty_json(), "{}");
    }

    #[test]
    fn test_parse_assignment_json_and_string() {
        assert_eq!(parse_assignment("budget=40"), Some(("budget".to_string(), json!(40))));
        assert_eq!(
            parse_assignment("likes = dry whites"),
            Some(("likes".to_string(), json!("dry whites")))
        );
        assert_eq!(
            parse_assignment("url=a=b"),
            Some(("url".to_string(), json!("a=b")))
        );
    }

    #[test]
    fn test_parse_assignment_rejects_missing_key() {
        assert_eq!(parse_assignment("=v"), None);
        assert_eq!(parse_assignment("novalue"), None);
    }
}
