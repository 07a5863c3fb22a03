//! Single-flight memoizing cache.
//!
//! [`SingleFlight`] is a generic key → value store guaranteeing that the value factory
//! runs at most once per key even when many threads miss concurrently. The chain
//! builder's member → interceptor maps are expensive to construct; this cache makes
//! first access for a proxy configuration a one-time cost shared by all callers.
//!
//! # Algorithm
//!
//! Double-checked insertion: the fast path reads a committed value without entering
//! any critical section. The slow path acquires a key-scoped build mutex, re-checks
//! (a concurrent winner may have just finished), and only if the slot is still empty
//! runs the factory and commits. Callers for different keys never contend with each
//! other beyond the sharded map access.
//!
//! # Failure policy
//!
//! If the factory fails, no value is committed and the entry is evicted, so the key
//! stays open for a clean retry. The error propagates only to the caller whose
//! factory execution failed. A caller still queued on the evicted entry's mutex
//! detects that the entry is no longer the map's resident one and re-enters through
//! the map, so every caller for a key observes the single value committed into the
//! resident entry — a failed build can never fork the key into divergent values.
//! Waiter fairness is whatever the mutex provides, and a blocked waiter has no
//! timeout — construction is assumed fast in steady state.

use std::hash::Hash;
use std::sync::{Arc, Mutex, OnceLock};

use dashmap::DashMap;

use crate::{Error, Result};

/// One cache entry: a lazily-computed value and the key-scoped critical section
/// guarding its construction.
#[derive(Debug)]
struct Slot<V> {
    value: OnceLock<V>,
    build: Mutex<()>,
}

impl<V> Slot<V> {
    fn new() -> Self {
        Slot {
            value: OnceLock::new(),
            build: Mutex::new(()),
        }
    }
}

/// Concurrency-safe memoizing store with at-most-once-per-key construction.
///
/// Values are cloned out on every hit; in practice `V` is an `Arc`, making hits a
/// reference-count bump. Entries live for the lifetime of the cache unless the owner
/// calls [`SingleFlight::clear`] — there is no eviction policy.
#[derive(Debug)]
pub struct SingleFlight<K: Eq + Hash, V> {
    entries: DashMap<K, Arc<Slot<V>>>,
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty cache
    #[must_use]
    pub fn new() -> Self {
        SingleFlight {
            entries: DashMap::new(),
        }
    }

    /// Returns the value for `key`, running `factory` to produce it on first access.
    ///
    /// Exactly one caller executes the factory for a given key; concurrent callers
    /// for the same key block until that execution completes and then receive the
    /// same value. Callers for different keys proceed independently.
    ///
    /// # Errors
    /// Propagates the factory's error to the caller whose factory execution failed.
    /// No value is committed in that case and the key remains open for retry (see
    /// the module docs for the full failure policy).
    pub fn get_or_add<F>(&self, key: K, factory: F) -> Result<V>
    where
        F: FnOnce(&K) -> Result<V>,
    {
        let mut factory = Some(factory);
        loop {
            let slot = self
                .entries
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Slot::new()))
                .clone();

            // Fast path: committed value, no critical section
            if let Some(value) = slot.value.get() {
                return Ok(value.clone());
            }

            let guard = slot.build.lock().map_err(|_| Error::LockError)?;
            // A concurrent winner may have committed while we were queued
            if let Some(value) = slot.value.get() {
                return Ok(value.clone());
            }

            // A failed predecessor may have evicted this slot while we were
            // queued on its mutex. Building into the orphaned slot would commit a
            // value no other caller can observe, so re-enter through the map
            let resident = self
                .entries
                .get(&key)
                .is_some_and(|entry| Arc::ptr_eq(entry.value(), &slot));
            if !resident {
                drop(guard);
                continue;
            }

            let build = match factory.take() {
                Some(build) => build,
                // The factory is consumed only on the iteration that returns
                None => unreachable!(),
            };
            return match build(&key) {
                Ok(value) => {
                    // The slot is the map's resident entry and we hold its build
                    // mutex, so nobody can evict it before this commit lands
                    let _ = slot.value.set(value.clone());
                    drop(guard);
                    Ok(value)
                }
                Err(err) => {
                    self.entries
                        .remove_if(&key, |_, existing| Arc::ptr_eq(existing, &slot));
                    drop(guard);
                    Err(err)
                }
            };
        }
    }

    /// Returns the committed value for `key` without running any factory
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries
            .get(key)
            .and_then(|entry| entry.value().value.get().cloned())
    }

    /// Returns true if `key` has a committed value
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries, including those still under construction
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all entries. A construction already in flight when its entry is
    /// dropped still completes for its caller, but its value is not re-published.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl<K, V> Default for SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        SingleFlight::new()
    }
}
