use serde::{Serialize, Serializer, ser::SerializeMap};
use std::{collections::HashMap, hash::Hash};

///
/// Groups
///
/// Items grouped by key. Iteration follows the order in which each key was
/// first seen, not key order.
///

#[derive(Clone, Debug)]
pub struct Groups<K, T> {
    entries: Vec<(K, Vec<T>)>,
    index: HashMap<K, usize>,
}

impl<K: Clone + Eq + Hash, T> Groups<K, T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn push(&mut self, key: K, item: T) {
        if let Some(&slot) = self.index.get(&key) {
            self.entries[slot].1.push(item);
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, vec![item]));
        }
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&[T]> {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[T])> {
        self.entries
            .iter()
            .map(|(key, items)| (key, items.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Group sizes, in group order.
    #[must_use]
    pub fn counts(&self) -> Vec<(K, usize)> {
        self.entries
            .iter()
            .map(|(key, items)| (key.clone(), items.len()))
            .collect()
    }
}

impl<K: PartialEq, T: PartialEq> PartialEq for Groups<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Clone + Eq + Hash, T> Default for Groups<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Serialize, T: Serialize> Serialize for Groups<K, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, items) in &self.entries {
            map.serialize_entry(key, items)?;
        }

        map.end()
    }
}
