// kiz-core - Insertion-ordered attribute map
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Insertion-ordered `name → Object` map.
//!
//! Backs object attributes, frame locals, the builtins table and the
//! module cache. Iteration order is insertion order; re-inserting an
//! existing key replaces the value in place without moving the entry.
//! These maps are small in practice, so lookup is a linear scan.

use crate::object::Object;

/// An insertion-ordered map from names to objects.
#[derive(Debug, Clone, Default)]
pub struct AttrMap {
    entries: Vec<(String, Object)>,
}

impl AttrMap {
    /// Create an empty map.
    pub fn new() -> Self {
        AttrMap::default()
    }

    /// Look up a name, returning a handle to the bound object.
    pub fn get(&self, name: &str) -> Option<Object> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    /// True if the name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Bind a name, replacing any existing binding in place.
    pub fn insert(&mut self, name: impl Into<String>, value: Object) {
        let name = name.into();
        for (key, slot) in &mut self.entries {
            if *key == name {
                *slot = value;
                return;
            }
        }
        self.entries.push((name, value));
    }

    /// Remove a binding, returning the object it held.
    pub fn remove(&mut self, name: &str) -> Option<Object> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no names are bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Object)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Snapshot of the bindings in insertion order.
    ///
    /// Used where the caller mutates the map (or calls back into the VM)
    /// while walking the entries, e.g. the module export copy.
    pub fn to_vec(&self) -> Vec<(String, Object)> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut map = AttrMap::new();
        map.insert("a", Object::int_from(1));
        map.insert("b", Object::int_from(2));
        assert_eq!(map.get("a").unwrap().int_value().unwrap(), 1.into());
        assert_eq!(map.get("b").unwrap().int_value().unwrap(), 2.into());
        assert!(map.get("c").is_none());
    }

    #[test]
    fn reinsert_keeps_position() {
        let mut map = AttrMap::new();
        map.insert("a", Object::int_from(1));
        map.insert("b", Object::int_from(2));
        map.insert("a", Object::int_from(3));
        let order: Vec<String> = map.to_vec().into_iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(map.get("a").unwrap().int_value().unwrap(), 3.into());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn remove_unbinds() {
        let mut map = AttrMap::new();
        map.insert("a", Object::int_from(1));
        assert!(map.remove("a").is_some());
        assert!(map.get("a").is_none());
        assert!(map.remove("a").is_none());
    }

    #[test]
    fn iteration_is_insertion_ordered() {
        let mut map = AttrMap::new();
        for name in ["z", "y", "x"] {
            map.insert(name, Object::nil());
        }
        let order: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["z", "y", "x"]);
    }
}
