//! counter-registry: a thread-safe registry mapping string identifiers to
//! monotonically incremented counts.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the counting rule and the locking discipline in separate
//!   layers so each can be reasoned about on its own.
//! - Layers:
//!   - CounterMap<S>: single-threaded storage over `hashbrown::HashMap`;
//!     owns the register-or-increment rule and lookups.
//!   - Registry<S>: public concurrent API; one `Mutex` around a
//!     `CounterMap`, held for exactly one map operation per call.
//!
//! Counting rule
//! - The first `update` of an absent identifier stores 0.
//! - Every later `update` of that identifier adds exactly 1.
//! - There is no decrement or removal, so a stored count never shrinks.
//! - N completed updates of one identifier, from any number of threads,
//!   leave a count of exactly N - 1.
//!
//! Absence vs. zero
//! - `count` returns `Err(CountError::NotFound)` for an identifier that was
//!   never registered and `Ok(0)` for one registered once. `get` offers the
//!   same distinction as an `Option`.
//!
//! Constraints
//! - Linearizable: every operation runs entirely under the one lock, so
//!   readers observe either the pre- or post-increment state, never a
//!   partial update.
//! - No reentrancy: lock guards never leave the method that took them, and
//!   no user code runs while the lock is held.
//! - Any UTF-8 string is a valid identifier, including the empty string.
//!
//! Poisoning
//! - A panic while the lock is held cannot leave the map torn (each
//!   critical section is one lookup plus one insert or increment), so a
//!   poisoned lock is recovered transparently and logged at `warn` level.
//!
//! Overflow semantics
//! - Counts are `u64`. Overflow is not checked in release builds; debug
//!   builds panic as for any integer overflow.
//!
//! Notes and non-goals
//! - In-process only: no persistence and no cross-process coordination.
//! - Diagnostics go through `tracing` and are silent unless the
//!   application installs a subscriber. Errors are always returned, never
//!   only logged.

mod counter_map;
mod error;
mod registry;

// Public surface
pub use counter_map::CounterMap;
pub use error::{CountError, Result};
pub use registry::Registry;
