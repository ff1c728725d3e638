//! Type cache implementation
//!
//! This module provides the `TypeCache` struct, a registry of values
//! keyed by Rust type identity and populated on first use.

use crate::stats::{CacheSnapshot, CacheStats};
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock};

/// Build-once, read-many registry keyed by type
///
/// The first caller for a key builds the value outside the lock; when two
/// callers race, the first value inserted wins and both receive it. Failed
/// builds are not cached.
pub struct TypeCache<V> {
    entries: RwLock<HashMap<TypeId, Arc<V>>>,
    stats: CacheStats,
}

impl<V> Debug for TypeCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeCache")
            .field("value_type", &type_name::<V>())
            .field("entries", &self.len())
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

impl<V> TypeCache<V> {
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> TypeCache<V>
where
    V: Send + Sync + 'static,
{
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: CacheStats::default(),
        }
    }

    /// Get the cached value for `K`, if built
    pub fn get<K: 'static>(&self) -> Option<Arc<V>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&TypeId::of::<K>()).cloned()
    }

    /// Get the value for `K`, building and storing it on first use
    pub fn get_or_try_insert_with<K, E, F>(&self, build: F) -> Result<Arc<V>, E>
    where
        K: 'static,
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get::<K>() {
            self.stats.record_hit();
            return Ok(value);
        }
        self.stats.record_miss();

        // Build without holding the lock so builders may consult the cache
        let built = match build() {
            Ok(value) => value,
            Err(e) => {
                self.stats.record_failed_build();
                return Err(e);
            }
        };
        self.stats.record_build();

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let stored = entries
            .entry(TypeId::of::<K>())
            .or_insert_with(|| Arc::new(built));
        Ok(Arc::clone(stored))
    }

    /// Whether a value for `K` has been built
    pub fn contains<K: 'static>(&self) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.contains_key(&TypeId::of::<K>())
    }

    /// Drop the value for `K`; returns whether one was present
    pub fn invalidate<K: 'static>(&self) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&TypeId::of::<K>()).is_some()
    }

    /// Drop every cached value
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    /// Current usage counters
    pub fn stats(&self) -> CacheSnapshot {
        self.stats.snapshot()
    }
}

impl<V> Default for TypeCache<V>
where
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
