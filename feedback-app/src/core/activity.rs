//! Per-row in-flight tracking and optimistic rollback

use std::collections::HashSet;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};

/// Rows with a request in flight.
///
/// A pending row never blocks the others; a second action on the same row is
/// refused until the first one finishes.
#[derive(Debug, Clone)]
pub struct RowActivity<K = i64> {
    pending: HashSet<K>,
}

impl<K: Eq + Hash + Clone> RowActivity<K> {
    pub fn new() -> Self {
        Self {
            pending: HashSet::new(),
        }
    }

    /// Mark `key` busy. Returns `false` if it already was.
    pub fn begin(&mut self, key: &K) -> bool {
        self.pending.insert(key.clone())
    }

    pub fn finish(&mut self, key: &K) {
        self.pending.remove(key);
    }

    /// Start an optimistic action on `key` over `state`.
    ///
    /// Returns `None` if the row is already pending. The guard releases the
    /// row when dropped and restores `state` unless it was committed, so an
    /// abandoned request leaves neither a stuck row nor a stale patch.
    pub fn track<'a, S: Clone>(&'a mut self, key: K, state: &'a mut S) -> Option<RowGuard<'a, K, S>> {
        if !self.pending.insert(key.clone()) {
            return None;
        }
        Some(RowGuard {
            rows: &mut self.pending,
            key,
            rollback: Rollback::new(state),
        })
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains(key)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for RowActivity<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of `state` that is written back on drop unless committed
pub struct Rollback<'a, S: Clone> {
    state: &'a mut S,
    snapshot: Option<S>,
}

impl<'a, S: Clone> Rollback<'a, S> {
    pub fn new(state: &'a mut S) -> Self {
        let snapshot = Some(state.clone());
        Self { state, snapshot }
    }

    /// Keep the patched state
    pub fn commit(mut self) {
        self.snapshot = None;
    }
}

impl<S: Clone> Deref for Rollback<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.state
    }
}

impl<S: Clone> DerefMut for Rollback<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.state
    }
}

impl<S: Clone> Drop for Rollback<'_, S> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.state = snapshot;
            tracing::debug!("Optimistic update not committed, state restored");
        }
    }
}

/// In-flight row plus the rollback of its optimistic patch
pub struct RowGuard<'a, K: Eq + Hash, S: Clone> {
    rows: &'a mut HashSet<K>,
    key: K,
    rollback: Rollback<'a, S>,
}

impl<K: Eq + Hash, S: Clone> RowGuard<'_, K, S> {
    /// Keep the patched state and release the row
    pub fn commit(mut self) {
        self.rollback.snapshot = None;
    }
}

impl<K: Eq + Hash, S: Clone> Deref for RowGuard<'_, K, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.rollback
    }
}

impl<K: Eq + Hash, S: Clone> DerefMut for RowGuard<'_, K, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.rollback
    }
}

impl<K: Eq + Hash, S: Clone> Drop for RowGuard<'_, K, S> {
    fn drop(&mut self) {
        self.rows.remove(&self.key);
    }
}
