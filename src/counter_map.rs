//! CounterMap: single-threaded identifier -> count storage with the
//! register-or-increment rule. `Registry` wraps this behind a lock.

use crate::error::{CountError, Result};
use hashbrown::HashMap;
use std::collections::hash_map::RandomState;

pub struct CounterMap<S = RandomState> {
    counts: HashMap<String, u64, S>,
}

impl CounterMap {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl Default for CounterMap {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CounterMap<S> {
    pub fn len(&self) -> usize {
        self.counts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<S> CounterMap<S>
where
    S: core::hash::BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            counts: HashMap::with_hasher(hasher),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            counts: HashMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    /// Register `identifier` or bump its count; returns the stored count.
    ///
    /// A previously absent identifier starts at 0. The owned key is only
    /// allocated on that first registration.
    pub fn update(&mut self, identifier: &str) -> u64 {
        if let Some(count) = self.counts.get_mut(identifier) {
            *count += 1;
            return *count;
        }
        self.counts.insert(identifier.to_owned(), 0);
        0
    }

    pub fn count(&self, identifier: &str) -> Result<u64> {
        self.get(identifier).ok_or_else(|| CountError::not_found(identifier))
    }

    pub fn get(&self, identifier: &str) -> Option<u64> {
        self.counts.get(identifier).copied()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.counts.contains_key(identifier)
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, c)| (k.as_str(), *c))
    }
}

impl<S> core::fmt::Debug for CounterMap<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CounterMap")
            .field("len", &self.counts.len())
            .finish()
    }
}
