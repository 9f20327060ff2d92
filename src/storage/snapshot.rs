use std::sync::{Arc, RwLock};

/// Thread-safe holder of the canonical in-memory collection.
///
/// Readers get an immutable `Arc` snapshot that never changes underneath
/// them; writers swap in a whole new collection built by a pure function.
pub struct SnapshotStore<C> {
    current: RwLock<Arc<C>>,
}

impl<C> SnapshotStore<C> {
    pub fn new(initial: C) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<C> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the collection wholesale and return the new snapshot.
    pub fn replace(&self, next: C) -> Arc<C> {
        let next = Arc::new(next);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Arc::clone(&next);
        next
    }

    /// Build the next collection from the current one and commit it atomically.
    /// `change` returns the new collection plus a value handed back to the caller.
    pub fn apply<R, F>(&self, change: F) -> (Arc<C>, R)
    where
        F: FnOnce(&C) -> (C, R),
    {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let current: &C = &guard;
        let (next, result) = change(current);
        let next = Arc::new(next);
        *guard = Arc::clone(&next);
        (next, result)
    }
}

impl<C: Default> Default for SnapshotStore<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}
