//! In-memory typed collection.
//!
//! The narrow store contract the core consumes: find-by-id, create, update,
//! list-with-filter, and a conditional insert for idempotent side effects.
//! Backed by `DashMap` so the conditional insert is a single atomic entry
//! operation.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

/// A concurrent collection of records keyed by UUID.
///
/// Cheap to clone; clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct Collection<T: Clone> {
    map: Arc<DashMap<Uuid, T>>,
}

impl<T: Clone> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Collection<T> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: Arc::new(DashMap::new()),
        }
    }

    /// Find a record by id.
    #[must_use]
    pub fn find(&self, id: &Uuid) -> Option<T> {
        self.map.get(id).map(|r| r.value().clone())
    }

    /// Insert or replace a record.
    pub fn insert(&self, id: Uuid, value: T) {
        self.map.insert(id, value);
    }

    /// Insert a record only if the key is absent.
    ///
    /// Returns the created record if this call inserted it, `None` if a
    /// record already existed. The existence check and the insert are one
    /// atomic entry operation.
    pub fn insert_if_absent(&self, id: Uuid, make: impl FnOnce() -> T) -> Option<T> {
        match self.map.entry(id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let value = make();
                slot.insert(value.clone());
                Some(value)
            }
        }
    }

    /// Update a record in place, returning the updated copy.
    ///
    /// Returns `None` if the record does not exist.
    pub fn update(&self, id: &Uuid, apply: impl FnOnce(&mut T)) -> Option<T> {
        self.map.get_mut(id).map(|mut r| {
            apply(r.value_mut());
            r.value().clone()
        })
    }

    /// Remove a record, returning it if present.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.map.remove(id).map(|(_, v)| v)
    }

    /// List records matching a predicate.
    #[must_use]
    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.map
            .iter()
            .filter(|r| pred(r.value()))
            .map(|r| r.value().clone())
            .collect()
    }

    /// List all records.
    #[must_use]
    pub fn list(&self) -> Vec<T> {
        self.filter(|_| true)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_find() {
        let coll: Collection<String> = Collection::new();
        let id = Uuid::now_v7();
        coll.insert(id, "hello".to_string());
        assert_eq!(coll.find(&id), Some("hello".to_string()));
        assert_eq!(coll.find(&Uuid::now_v7()), None);
    }

    #[test]
    fn test_insert_if_absent_only_first_wins() {
        let coll: Collection<u32> = Collection::new();
        let id = Uuid::now_v7();

        let first = coll.insert_if_absent(id, || 1);
        let second = coll.insert_if_absent(id, || 2);

        assert_eq!(first, Some(1));
        assert_eq!(second, None);
        assert_eq!(coll.find(&id), Some(1));
    }

    #[test]
    fn test_update_existing() {
        let coll: Collection<u32> = Collection::new();
        let id = Uuid::now_v7();
        coll.insert(id, 10);

        let updated = coll.update(&id, |v| *v += 5);
        assert_eq!(updated, Some(15));
        assert_eq!(coll.find(&id), Some(15));
    }

    #[test]
    fn test_update_missing_is_none() {
        let coll: Collection<u32> = Collection::new();
        assert_eq!(coll.update(&Uuid::now_v7(), |v| *v += 1), None);
    }

    #[test]
    fn test_filter() {
        let coll: Collection<u32> = Collection::new();
        for n in 0..10 {
            coll.insert(Uuid::now_v7(), n);
        }
        let evens = coll.filter(|v| v % 2 == 0);
        assert_eq!(evens.len(), 5);
    }

    #[test]
    fn test_clones_share_state() {
        let coll: Collection<u32> = Collection::new();
        let clone = coll.clone();
        let id = Uuid::now_v7();
        clone.insert(id, 42);
        assert_eq!(coll.find(&id), Some(42));
    }
}
