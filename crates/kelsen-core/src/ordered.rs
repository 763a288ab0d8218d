//! Insertion-ordered string-keyed map for JSON objects.
//!
//! Source tables, norm tables, and role tables are walked in document order
//! when generating code, so the order of keys in the input file is part of
//! the output. `OrderedMap` keeps entries in a `Vec` and deserialises a JSON
//! object without reordering it.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use crate::text::eq_fold;

#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact key lookup.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Case-insensitive key lookup; first match in document order wins.
    pub fn get_ignore_case(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| eq_fold(k, key))
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

// ── Deserialisation ──

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            // Duplicate keys: last value wins, first position is kept.
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_document_order() {
        let map: OrderedMap<u32> =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"], "keys must not be sorted");
        assert_eq!(map.get("alpha"), Some(&2));
    }

    #[test]
    fn duplicate_key_keeps_first_position() {
        let map: OrderedMap<u32> = serde_json::from_str(r#"{"a": 1, "b": 2, "a": 9}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&9));
        assert_eq!(map.keys().next(), Some("a"));
    }

    #[test]
    fn case_insensitive_lookup() {
        let map: OrderedMap<&str> = [("CompraVenta".to_string(), "x")].into_iter().collect();
        assert_eq!(map.get("compraventa"), None);
        assert_eq!(map.get_ignore_case("compraventa"), Some(&"x"));
    }

    #[test]
    fn rejects_non_objects() {
        let result: Result<OrderedMap<u32>, _> = serde_json::from_str("[1, 2]");
        assert!(result.is_err());
    }
}
