//! Registry: the thread-safe surface over `CounterMap`.
//!
//! Every public method acquires the single lock, performs exactly one
//! map operation and releases the lock before returning. The guard never
//! escapes a method, so callers cannot hold the lock across calls and no
//! method acquires it twice.

use crate::counter_map::CounterMap;
use crate::error::Result;
use std::collections::hash_map::RandomState;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, TryLockError};

/// Concurrent registry mapping identifiers to monotonically increasing
/// counts.
///
/// Share it between threads by reference (e.g. `std::thread::scope`) or
/// behind an `Arc`. All operations are linearizable: each `count` returns
/// the value left by the last `update` ordered before it.
pub struct Registry<S = RandomState> {
    map: Mutex<CounterMap<S>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::from_map(CounterMap::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_map(CounterMap::with_capacity(capacity))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Registry<S>
where
    S: core::hash::BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_map(CounterMap::with_hasher(hasher))
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from_map(CounterMap::with_capacity_and_hasher(capacity, hasher))
    }

    fn from_map(map: CounterMap<S>) -> Self {
        Self {
            map: Mutex::new(map),
        }
    }

    // Critical sections never call user code and each applies a single
    // insert or increment, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, CounterMap<S>> {
        self.map.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("counter registry lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    /// Register `identifier`, or increment its count if already present.
    ///
    /// The first registration stores 0; each later one adds exactly 1.
    /// Never fails.
    pub fn update(&self, identifier: &str) {
        let stored = self.lock().update(identifier);
        if stored == 0 {
            tracing::trace!(identifier, "registered new identifier");
        }
    }

    /// Current count for `identifier`.
    ///
    /// Returns `CountError::NotFound` if it was never registered, which is
    /// distinct from a registered identifier whose count is 0.
    pub fn count(&self, identifier: &str) -> Result<u64> {
        self.lock().count(identifier)
    }

    /// Like `count`, with absence as `None`.
    pub fn get(&self, identifier: &str) -> Option<u64> {
        self.lock().get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.lock().contains(identifier)
    }

    /// Number of distinct registered identifiers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every count, taken under one lock acquisition.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.lock()
            .iter()
            .map(|(id, count)| (id.to_owned(), count))
            .collect()
    }
}

impl<S> core::fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut d = f.debug_struct("Registry");
        match self.map.try_lock() {
            Ok(map) => d.field("len", &map.len()),
            Err(TryLockError::Poisoned(p)) => d.field("len", &p.into_inner().len()),
            Err(TryLockError::WouldBlock) => d.field("len", &format_args!("<locked>")),
        };
        d.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CountError;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn registry_is_send_and_sync() {
        assert_send_sync::<Registry>();
    }

    /// A panic while the lock is held poisons the mutex; operations keep
    /// working on the recovered map and see the pre-panic state.
    #[test]
    fn poisoned_lock_is_recovered() {
        let r = Registry::new();
        r.update("a");
        r.update("a");

        let res = catch_unwind(AssertUnwindSafe(|| {
            let _g = r.map.lock().unwrap();
            panic!("boom while holding the registry lock");
        }));
        assert!(res.is_err());
        assert!(r.map.is_poisoned());

        assert_eq!(r.count("a"), Ok(1));
        r.update("a");
        r.update("b");
        assert_eq!(r.count("a"), Ok(2));
        assert_eq!(r.count("b"), Ok(0));
        assert_eq!(r.len(), 2);
        assert!(format!("{:?}", r).contains("len: 2"));
    }

    /// Debug formatting must not block when the lock is held elsewhere.
    #[test]
    fn debug_does_not_block_while_locked() {
        let r = Registry::new();
        r.update("x");
        assert_eq!(format!("{:?}", r), "Registry { len: 1 }");

        let _g = r.map.lock().unwrap();
        assert_eq!(format!("{:?}", r), "Registry { len: <locked> }");
    }

    #[test]
    fn snapshot_is_sorted_copy() {
        let r = Registry::with_capacity(8);
        for id in ["/stream/2", "/stream/1", "/stream/1"] {
            r.update(id);
        }
        let snap = r.snapshot();
        let keys: Vec<&str> = snap.keys().map(String::as_str).collect();
        assert_eq!(keys, ["/stream/1", "/stream/2"]);
        assert_eq!(snap["/stream/1"], 1);
        assert_eq!(snap["/stream/2"], 0);

        // Later updates do not leak into an existing snapshot.
        r.update("/stream/2");
        assert_eq!(snap["/stream/2"], 0);
        assert_eq!(r.count("/stream/2"), Ok(1));
    }

    #[test]
    fn empty_registry_reports_not_found() {
        let r = Registry::default();
        assert!(r.is_empty());
        assert_eq!(
            r.count("/stream/1"),
            Err(CountError::NotFound {
                identifier: "/stream/1".to_string()
            })
        );
        assert_eq!(r.get("/stream/1"), None);
        assert!(!r.contains("/stream/1"));
    }
}
