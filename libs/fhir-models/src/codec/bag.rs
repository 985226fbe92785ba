use serde_json::{Map, Value};
use std::collections::HashSet;

/// JSON properties an object does not model, kept verbatim.
///
/// Anything a typed structure does not recognize (a newer version's field, a
/// `value[x]` type outside the modeled set, a vendor key) is data, not an
/// error. It is captured on decode and emitted again on encode so a
/// decode/encode round trip never loses content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionBag(Map<String, Value>);

impl ExtensionBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep every entry of `raw` whose key is not in `known`.
    ///
    /// `known` holds the exact keys a type consumed, including the `_field`
    /// siblings of its primitives and every key of its choice groups, so an
    /// unexpected `_field` next to a complex element is still preserved.
    pub fn capture(raw: Map<String, Value>, known: &HashSet<String>) -> Self {
        Self(
            raw.into_iter()
                .filter(|(key, _)| !known.contains(key))
                .collect(),
        )
    }

    /// Merge the captured entries into `target`. Keys already present in
    /// `target` win.
    pub fn reemit(&self, target: &mut Map<String, Value>) {
        for (key, value) in &self.0 {
            if !target.contains_key(key) {
                target.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for ExtensionBag {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
