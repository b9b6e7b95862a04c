//! Typed list cache with explicit optimistic transactions.

use std::collections::HashMap;

use content_core::IndustryId;
use tracing::debug;

use crate::kind::EntityKind;

/// One cached list is identified by the industry it belongs to and the
/// entity family it holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub industry: IndustryId,
    pub kind: EntityKind,
}

impl CacheKey {
    pub fn new(industry: IndustryId, kind: EntityKind) -> Self {
        Self { industry, kind }
    }
}

/// Per-key cache of entity lists, the client-side mirror of what the
/// backend last returned plus any optimistic edits in flight.
#[derive(Debug, Default)]
pub struct ListCache<T> {
    entries: HashMap<CacheKey, Vec<T>>,
}

impl<T: Clone> ListCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The cached list for `key`, if one was ever set.
    pub fn get(&self, key: &CacheKey) -> Option<&[T]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Replace the cached list for `key`, e.g. after a fresh fetch.
    pub fn set(&mut self, key: CacheKey, items: Vec<T>) {
        self.entries.insert(key, items);
    }

    /// Drop the cached list for `key`; the next reader must refetch.
    pub fn invalidate(&mut self, key: &CacheKey) {
        debug!(?key.kind, industry = %key.industry, "cache invalidated");
        self.entries.remove(key);
    }

    /// Begin an optimistic transaction on `key`. The current list is
    /// snapshotted; [`Transaction::stage`] mutates the live cache
    /// immediately, and the snapshot is restored on
    /// [`Transaction::roll_back`].
    pub fn transaction(&mut self, key: CacheKey) -> Transaction<'_, T> {
        let snapshot = self.entries.get(&key).cloned();
        Transaction {
            cache: self,
            key,
            snapshot,
        }
    }
}

/// Snapshot-backed optimistic update over one cache entry.
///
/// The caller stages the local mutation, performs the backend write, then
/// either commits (keep the optimistic state) or rolls back (restore the
/// snapshot). Dropping a transaction without deciding keeps the optimistic
/// state, so callers must resolve it on every path.
#[must_use = "resolve the transaction with commit() or roll_back()"]
pub struct Transaction<'a, T: Clone> {
    cache: &'a mut ListCache<T>,
    key: CacheKey,
    snapshot: Option<Vec<T>>,
}

impl<'a, T: Clone> Transaction<'a, T> {
    /// Apply the optimistic mutation to the cached list. An absent entry
    /// starts from an empty list.
    pub fn stage(&mut self, mutate: impl FnOnce(&mut Vec<T>)) {
        let list = self.cache.entries.entry(self.key.clone()).or_default();
        mutate(list);
    }

    /// Keep the optimistic state; the backend accepted the write.
    pub fn commit(self) {}

    /// Restore the pre-transaction snapshot; the backend rejected the write.
    pub fn roll_back(self) {
        let Transaction {
            cache,
            key,
            snapshot,
        } = self;
        debug!(?key.kind, industry = %key.industry, "optimistic update rolled back");
        match snapshot {
            Some(prev) => {
                cache.entries.insert(key, prev);
            }
            None => {
                cache.entries.remove(&key);
            }
        }
    }
}
