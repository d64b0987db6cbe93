//! Snapshot-isolated list used for a menu's element collection.
//!
//! Readers take a cheap `Arc` snapshot and iterate it without holding a lock;
//! writers copy, mutate, and swap. A pass that is iterating a snapshot is
//! unaffected by removals made while it runs, and a snapshot taken after a
//! removal never contains the removed entry.

use std::sync::{Arc, PoisonError, RwLock};

/// Copy-on-write list.
#[derive(Debug)]
pub struct SnapshotList<T> {
    current: RwLock<Arc<Vec<T>>>,
}

impl<T> Default for SnapshotList<T> {
    fn default() -> Self {
        Self {
            current: RwLock::new(Arc::new(Vec::new())),
        }
    }
}

impl<T: Clone> SnapshotList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable view of the current contents.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Append an entry.
    pub fn push(&self, value: T) {
        self.update(|items| items.push(value));
    }

    /// Remove every entry matching `predicate`, returning how many were removed.
    pub fn remove_where(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let mut removed = 0;
        self.update(|items| {
            let before = items.len();
            items.retain(|item| !predicate(item));
            removed = before - items.len();
        });
        removed
    }

    /// Empty the list, returning what it held.
    pub fn take(&self) -> Arc<Vec<T>> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(Vec::new()))
    }

    fn update(&self, mutate: impl FnOnce(&mut Vec<T>)) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Vec::clone(&guard);
        mutate(&mut next);
        *guard = Arc::new(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_stable_across_removal() {
        let list = SnapshotList::new();
        for value in 0..5 {
            list.push(value);
        }

        let snapshot = list.snapshot();
        let mut visited = Vec::new();
        for value in snapshot.iter() {
            if *value == 1 {
                assert_eq!(list.remove_where(|v| *v == 3), 1);
            }
            visited.push(*value);
        }

        assert_eq!(visited, vec![0, 1, 2, 3, 4]);
        assert_eq!(*list.snapshot(), vec![0, 1, 2, 4]);
    }

    #[test]
    fn take_empties_list() {
        let list = SnapshotList::new();
        list.push("a");
        list.push("b");
        let taken = list.take();
        assert_eq!(taken.len(), 2);
        assert!(list.is_empty());
    }
}
