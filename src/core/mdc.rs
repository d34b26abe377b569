//! Mapped Diagnostic Context
//!
//! `Mdc` holds the string key/value pairs attached to every record a logger
//! emits. It carries no lock of its own: the owning [`Logger`] serializes all
//! access through its state mutex, so a snapshot taken for encoding can never
//! observe a half-applied mutation.
//!
//! [`Logger`]: crate::core::Logger

use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mdc {
    entries: HashMap<String, String>,
}

impl Mdc {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert a key, overwriting any previous value
    pub fn add<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove a key; absent keys are ignored
    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Replace the value of a key in a single step.
    ///
    /// Unlike a remove followed by an add, there is no point at which a
    /// reader holding the logger lock can see the key missing.
    pub fn update<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entries.insert(key.into(), value.into());
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries = HashMap::new();
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.entries.iter()
    }

    /// Owned copy of all entries
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.clone()
    }
}

impl<K, V> FromIterator<(K, V)> for Mdc
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for Mdc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = self
            .entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{}", pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get() {
        let mut mdc = Mdc::new();
        mdc.add("foo", "bar");
        assert_eq!(mdc.get("foo"), Some("bar"));
        assert_eq!(mdc.len(), 1);
    }

    #[test]
    fn test_add_overwrites() {
        let mut mdc = Mdc::new();
        mdc.add("foo", "bar");
        mdc.add("foo", "baz");
        assert_eq!(mdc.get("foo"), Some("baz"));
        assert_eq!(mdc.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut mdc = Mdc::new();
        mdc.add("foo", "bar");
        mdc.remove("foo");
        assert_eq!(mdc.get("foo"), None);
        assert!(mdc.is_empty());
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let mut mdc = Mdc::new();
        mdc.remove("missing");
        assert!(mdc.is_empty());
    }

    #[test]
    fn test_update_inserts_or_replaces() {
        let mut mdc = Mdc::new();
        mdc.update("HOST_NAME", "a");
        assert_eq!(mdc.get("HOST_NAME"), Some("a"));
        mdc.update("HOST_NAME", "b");
        assert_eq!(mdc.get("HOST_NAME"), Some("b"));
    }

    #[test]
    fn test_clear() {
        let mut mdc: Mdc = [("foo1", "bar"), ("foo2", "bar"), ("foo3", "bar")]
            .into_iter()
            .collect();
        assert_eq!(mdc.len(), 3);

        mdc.clear();
        assert!(!mdc.contains_key("foo1"));
        assert!(!mdc.contains_key("foo2"));
        assert!(!mdc.contains_key("foo3"));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mdc: Mdc = [("foo", "bar")].into_iter().collect();
        assert_eq!(serde_json::to_string(&mdc).unwrap(), r#"{"foo":"bar"}"#);
        assert_eq!(serde_json::to_string(&Mdc::new()).unwrap(), "{}");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut mdc = Mdc::new();
        mdc.add("k", "v");
        let snapshot = mdc.snapshot();
        mdc.add("k", "changed");
        assert_eq!(snapshot.get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_display() {
        let mdc: Mdc = [("key1", "value1")].into_iter().collect();
        assert_eq!(mdc.to_string(), "key1=value1");
    }
}
