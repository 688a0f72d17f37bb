//! Insertion-ordered, name-keyed storage.
//!
//! Collections, shards and replicas are all kept in creation order and looked
//! up by name. Entries live in a `Vec` with a side index from name to position.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

/// A value that carries its own name key.
pub trait Named {
    /// The key this value is stored under.
    fn name(&self) -> &str;
}

/// An ordered name → value mapping.
///
/// Inserting a name that is already present replaces the value in its
/// original position, so iteration order is first-insertion order and the
/// last write wins.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMap<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for NamedMap<T> {
    fn default() -> Self {
        Self { entries: Vec::new(), index: HashMap::new() }
    }
}

impl<T: Named> NamedMap<T> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under its own name.
    ///
    /// Returns the value previously stored under that name, if any.
    pub fn insert(&mut self, value: T) -> Option<T> {
        match self.index.get(value.name()) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos], value)),
            None => {
                self.index.insert(value.name().to_string(), self.entries.len());
                self.entries.push(value);
                None
            }
        }
    }

    /// Look up a value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    /// Position of a name in insertion order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Value at a position in insertion order.
    #[must_use]
    pub fn get_index(&self, pos: usize) -> Option<&T> {
        self.entries.get(pos)
    }

    /// Returns true if a value is stored under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate values in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Iterate names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Named::name)
    }
}

impl<T: Named> FromIterator<T> for NamedMap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut map = Self::new();
        for value in iter {
            map.insert(value);
        }
        map
    }
}

impl<'a, T> IntoIterator for &'a NamedMap<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T: Serialize> Serialize for NamedMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        name: String,
        value: u32,
    }

    impl Named for Entry {
        fn name(&self) -> &str {
            &self.name
        }
    }

    fn entry(name: &str, value: u32) -> Entry {
        Entry { name: name.to_string(), value }
    }

    #[test]
    fn test_insertion_order() {
        let map: NamedMap<Entry> =
            [entry("c", 1), entry("a", 2), entry("b", 3)].into_iter().collect();

        assert_eq!(map.names().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(map.position("a"), Some(1));
        assert_eq!(map.get_index(2).unwrap().value, 3);
    }

    #[test]
    fn test_last_write_wins_keeps_position() {
        let mut map = NamedMap::new();
        map.insert(entry("first", 1));
        map.insert(entry("second", 2));

        let previous = map.insert(entry("first", 10));

        assert_eq!(previous.unwrap().value, 1);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("first").unwrap().value, 10);
        assert_eq!(map.names().collect::<Vec<_>>(), vec!["first", "second"]);
    }

    #[test]
    fn test_missing_name() {
        let map: NamedMap<Entry> = NamedMap::new();
        assert!(map.is_empty());
        assert!(map.get("nope").is_none());
        assert!(!map.contains("nope"));
    }
}
