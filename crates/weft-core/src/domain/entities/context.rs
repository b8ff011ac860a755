//! Template context produced by data shapers.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::naming::{to_camel_case, to_kebab_case, to_pascal_case, to_snake_case};

/// Key/value record handed to the template renderer.
///
/// A plain JSON object so any renderer can consume it. Shapers build one per
/// `(current, previous)` pair; the executor later merges per-output data
/// (resolved `methods`, `language`) on top.
///
/// ## Name Variables
///
/// [`RenderContext::named`] derives casing variants once:
///
/// | Key | "BookmarkTag" |
/// |-----|---------------|
/// | `name` | BookmarkTag |
/// | `name_snake` | bookmark_tag |
/// | `name_kebab` | bookmark-tag |
/// | `name_pascal` | BookmarkTag |
/// | `name_camel` | bookmarkTag |
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderContext {
    values: Map<String, Value>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context seeded with the casing variants of `name`.
    pub fn named(name: &str) -> Self {
        Self::new()
            .with("name", name)
            .with("name_snake", to_snake_case(name))
            .with("name_kebab", to_kebab_case(name))
            .with("name_pascal", to_pascal_case(name))
            .with("name_camel", to_camel_case(name))
    }

    /// Add a value, consuming self.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Overlay `other` on top of this context; its keys win.
    pub fn merge(&mut self, other: RenderContext) {
        self.values.extend(other.values);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.values.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

impl From<Map<String, Value>> for RenderContext {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn named_derives_casings() {
        let ctx = RenderContext::named("BookmarkTag");
        assert_eq!(ctx.get_str("name_snake"), Some("bookmark_tag"));
        assert_eq!(ctx.get_str("name_kebab"), Some("bookmark-tag"));
        assert_eq!(ctx.get_str("name_camel"), Some("bookmarkTag"));
    }

    #[test]
    fn merge_overrides() {
        let mut base = RenderContext::new().with("a", 1).with("b", 2);
        base.merge(RenderContext::new().with("b", 3));
        assert_eq!(base.into_value(), json!({"a": 1, "b": 3}));
    }
}
