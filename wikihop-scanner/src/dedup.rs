use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Grow-only set shared by every parse worker.
///
/// `insert_if_absent` is the only call that makes control decisions; `contains`
/// and `size` are for observers.
#[derive(Debug)]
pub struct DedupSet<K> {
    seen: Mutex<HashSet<K>>,
}

impl<K: Eq + Hash> DedupSet<K> {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// Record `key`, returning `true` if this call is the one that added it.
    pub fn insert_if_absent(&self, key: K) -> bool {
        self.lock().insert(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.lock().contains(key)
    }

    pub fn size(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<K>> {
        // Every critical section is a single set operation, so a poisoned
        // guard still holds a consistent set.
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: Eq + Hash> Default for DedupSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
