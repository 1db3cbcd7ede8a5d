//! # COPY-ON-WRITE ENTRY MAP
//!
//! **ORDERING**: Insertion order, kept across overwrites.
//! **KEYS**: Case-insensitive; the spelling of the first insert is kept.
//! **SHARING**: A branched map shares its parent's snapshot until the first
//! write, which copies the whole map once. Later writes are local.

use crate::model_state::types::ModelStateEntry;
use crate::prefix::matcher::fold_key;
use std::collections::HashMap;
use std::slice;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
struct OrderedEntries {
    slots: Vec<(String, ModelStateEntry)>,
    /// folded key -> position in `slots`
    index: HashMap<String, usize>,
}

impl OrderedEntries {
    fn position(&self, key: &str) -> Option<usize> {
        self.index.get(&fold_key(key)).copied()
    }

    fn reindex_from(&mut self, start: usize) {
        for (position, (key, _)) in self.slots.iter().enumerate().skip(start) {
            self.index.insert(fold_key(key), position);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CopyOnWriteEntries {
    shared: Arc<OrderedEntries>,
}

impl CopyOnWriteEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// **BRANCH** - O(1) child view over the same snapshot
    pub fn branch(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }

    /// `true` while this map still reads through a snapshot it shares
    /// with a parent or child.
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.shared) > 1
    }

    fn local(&mut self) -> &mut OrderedEntries {
        Arc::make_mut(&mut self.shared)
    }

    pub fn len(&self) -> usize {
        self.shared.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.slots.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.shared.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&ModelStateEntry> {
        self.get_key_value(key).map(|(_, entry)| entry)
    }

    pub fn get_key_value(&self, key: &str) -> Option<(&str, &ModelStateEntry)> {
        self.shared.position(key).map(|position| {
            let (stored_key, entry) = &self.shared.slots[position];
            (stored_key.as_str(), entry)
        })
    }

    /// Materializes the map when the key exists.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut ModelStateEntry> {
        let position = self.shared.position(key)?;
        Some(&mut self.local().slots[position].1)
    }

    /// Returns the entry for `key`, inserting an unvalidated one if absent.
    pub fn get_or_insert(&mut self, key: &str) -> &mut ModelStateEntry {
        let position = match self.shared.position(key) {
            Some(position) => position,
            None => {
                let local = self.local();
                local.slots.push((key.to_string(), ModelStateEntry::new()));
                let position = local.slots.len() - 1;
                local.index.insert(fold_key(key), position);
                position
            }
        };
        &mut self.local().slots[position].1
    }

    /// Insert-or-replace. Replacing keeps the original position and spelling.
    pub fn insert(&mut self, key: &str, entry: ModelStateEntry) -> Option<ModelStateEntry> {
        let local = self.local();
        match local.position(key) {
            Some(position) => Some(std::mem::replace(&mut local.slots[position].1, entry)),
            None => {
                local.slots.push((key.to_string(), entry));
                local.index.insert(fold_key(key), local.slots.len() - 1);
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<ModelStateEntry> {
        let position = self.shared.position(key)?;
        let local = self.local();
        let (stored_key, entry) = local.slots.remove(position);
        local.index.remove(&fold_key(&stored_key));
        local.reindex_from(position);
        Some(entry)
    }

    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        // Dropping our handle is enough; the shared snapshot stays intact.
        self.shared = Arc::new(OrderedEntries::default());
    }

    pub fn iter(&self) -> Entries<'_> {
        Entries {
            inner: self.shared.slots.iter(),
        }
    }

    /// Mutable pass over every entry. Materializes the map.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut ModelStateEntry),
    {
        for (key, entry) in self.local().slots.iter_mut() {
            f(key.as_str(), entry);
        }
    }
}

/// Insertion-ordered `(key, entry)` pairs.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    inner: slice::Iter<'a, (String, ModelStateEntry)>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, &'a ModelStateEntry);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, entry)| (key.as_str(), entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

impl DoubleEndedIterator for Entries<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, entry)| (key.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_state::types::ModelValidationState;
    use serde_json::json;

    fn keys(map: &CopyOnWriteEntries) -> Vec<&str> {
        map.iter().map(|(key, _)| key).collect()
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut map = CopyOnWriteEntries::new();
        map.insert("b", ModelStateEntry::new());
        map.insert("a", ModelStateEntry::new());
        map.insert("c", ModelStateEntry::new());
        assert_eq!(keys(&map), vec!["b", "a", "c"]);

        map.insert("A", ModelStateEntry::new().with_state(ModelValidationState::Valid));
        assert_eq!(keys(&map), vec!["b", "a", "c"]);
        assert_eq!(
            map.get("a").map(|e| e.validation_state),
            Some(ModelValidationState::Valid)
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut map = CopyOnWriteEntries::new();
        map.insert("Address.City", ModelStateEntry::new());
        assert!(map.contains_key("address.city"));
        assert!(map.contains_key("ADDRESS.CITY"));
        assert_eq!(
            map.get_key_value("address.CITY").map(|(key, _)| key),
            Some("Address.City")
        );
    }

    #[test]
    fn test_remove_keeps_order_and_index() {
        let mut map = CopyOnWriteEntries::new();
        for key in ["a", "b", "c", "d"] {
            map.insert(key, ModelStateEntry::new());
        }
        assert!(map.remove("B").is_some());
        assert!(map.remove("b").is_none());
        assert_eq!(keys(&map), vec!["a", "c", "d"]);
        assert!(map.contains_key("d"));
        map.get_mut("d").unwrap().raw_value = json!("x");
        assert_eq!(map.get("D").unwrap().raw_value, json!("x"));
    }

    #[test]
    fn test_get_or_insert_creates_once() {
        let mut map = CopyOnWriteEntries::new();
        map.get_or_insert("Name").raw_value = json!("first");
        map.get_or_insert("NAME").attempted_value = Some("first".to_string());
        assert_eq!(map.len(), 1);
        let entry = map.get("name").unwrap();
        assert_eq!(entry.raw_value, json!("first"));
        assert_eq!(entry.attempted_value.as_deref(), Some("first"));
    }

    #[test]
    fn test_branch_shares_until_first_write() {
        let mut parent = CopyOnWriteEntries::new();
        parent.insert("X", ModelStateEntry::new());

        let mut child = parent.branch();
        assert!(child.is_shared());
        assert!(child.contains_key("X"));

        child.get_or_insert("X").raw_value = json!("2");
        assert!(!child.is_shared());
        assert_eq!(parent.get("X").unwrap().raw_value, json!(null));
        assert_eq!(child.get("X").unwrap().raw_value, json!("2"));
    }

    #[test]
    fn test_clear_does_not_touch_shared_snapshot() {
        let mut parent = CopyOnWriteEntries::new();
        parent.insert("X", ModelStateEntry::new());
        let mut child = parent.branch();
        child.clear();
        assert!(child.is_empty());
        assert_eq!(parent.len(), 1);
    }
}
