//! Insertion-ordered identity map backing the node, link and triple collections

use super::ids::{LinkId, NodeId, TripleId};
use super::link::Link;
use super::node::Node;
use super::triple::Triple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// An entity that carries its own id
pub trait Keyed {
    type Key: Clone + Eq + Hash + std::fmt::Debug;

    fn key(&self) -> &Self::Key;
}

impl Keyed for Node {
    type Key = NodeId;

    fn key(&self) -> &NodeId {
        &self.id
    }
}

impl Keyed for Link {
    type Key = LinkId;

    fn key(&self) -> &LinkId {
        &self.id
    }
}

impl Keyed for Triple {
    type Key = TripleId;

    fn key(&self) -> &TripleId {
        &self.id
    }
}

/// O(1) lookup by id with a stable exposed ordering.
///
/// Insertions at either end and at an explicit slot are supported so that a
/// removal can be reverted into the exact position it came from.
#[derive(Debug, Clone)]
pub struct Store<V: Keyed> {
    entries: HashMap<V::Key, V>,
    order: VecDeque<V::Key>,
}

impl<V: Keyed> Default for Store<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }
}

impl<V: Keyed> Store<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains_key(&self, key: &V::Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &V::Key) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &V::Key) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Append; returns false (and stores nothing) if the id is taken
    pub fn push_back(&mut self, value: V) -> bool {
        self.insert_at(self.order.len(), value)
    }

    /// Prepend; returns false (and stores nothing) if the id is taken
    pub fn push_front(&mut self, value: V) -> bool {
        self.insert_at(0, value)
    }

    /// Insert at `index` (clamped to the length); returns false if the id is taken
    pub fn insert_at(&mut self, index: usize, value: V) -> bool {
        let key = value.key().clone();
        if self.entries.contains_key(&key) {
            return false;
        }
        let index = index.min(self.order.len());
        self.order.insert(index, key.clone());
        self.entries.insert(key, value);
        true
    }

    /// Remove by id, returning the slot it occupied and the value
    pub fn remove(&mut self, key: &V::Key) -> Option<(usize, V)> {
        let value = self.entries.remove(key)?;
        let index = self.order.iter().position(|k| k == key)?;
        self.order.remove(index);
        Some((index, value))
    }

    /// Values in exposed order
    pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        self.order.iter().filter_map(move |k| self.entries.get(k))
    }

    /// Ids in exposed order
    pub fn keys(&self) -> impl Iterator<Item = &V::Key> + '_ {
        self.order.iter()
    }

    /// Mutable access to every value (unordered)
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.entries.values_mut()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl<V: Keyed + PartialEq> PartialEq for Store<V> {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.entries == other.entries
    }
}

impl<V: Keyed> FromIterator<V> for Store<V> {
    /// Later duplicates of an id are dropped
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut store = Store::new();
        for value in iter {
            store.push_back(value);
        }
        store
    }
}

impl<V: Keyed + Serialize> Serialize for Store<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, V: Keyed + Deserialize<'de>> Deserialize<'de> for Store<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<V>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}
