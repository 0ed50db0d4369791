//! LRU read-through cache over any node store.
//!
//! Trie walks resolve hash handles one node at a time; hot upper levels of
//! the trie are fetched on every operation. Wrapping the backing store in a
//! [`CachedStore`] keeps those nodes in memory and invalidates them as
//! mutations rewrite the path.

use forestry_core::{BatchOp, Store};
use lru::LruCache;
use parking_lot::RwLock;
use std::num::NonZeroUsize;
use tracing::debug;

/// Default number of cached nodes.
const DEFAULT_CAPACITY: usize = 4096;

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate between 0.0 and 1.0
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// A store wrapper holding recently fetched entries in an LRU cache.
pub struct CachedStore<S: Store> {
    inner: S,
    cache: RwLock<LruCache<String, Vec<u8>>>,
    stats: RwLock<CacheStats>,
}

impl<S: Store> CachedStore<S> {
    pub fn new(inner: S) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: S, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: RwLock::new(LruCache::new(capacity)),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Store> Store for CachedStore<S> {
    fn get(&self, key: &str) -> forestry_core::Result<Option<Vec<u8>>> {
        if let Some(value) = self.cache.write().get(key) {
            self.stats.write().hits += 1;
            return Ok(Some(value.clone()));
        }
        self.stats.write().misses += 1;
        let value = self.inner.get(key)?;
        if let Some(value) = &value {
            self.cache.write().put(key.to_string(), value.clone());
        }
        Ok(value)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> forestry_core::Result<()> {
        self.inner.put(key, value.clone())?;
        self.cache.write().put(key.to_string(), value);
        Ok(())
    }

    fn del(&self, key: &str) -> forestry_core::Result<()> {
        self.inner.del(key)?;
        self.cache.write().pop(key);
        Ok(())
    }

    fn batch(&self, ops: Vec<BatchOp>) -> forestry_core::Result<()> {
        self.inner.batch(ops.clone())?;
        let mut cache = self.cache.write();
        for op in ops {
            match op {
                BatchOp::Put(key, value) => {
                    cache.put(key, value);
                }
                BatchOp::Del(key) => {
                    cache.pop(&key);
                }
            }
        }
        debug!("cache synchronized with batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forestry_core::MemoryStore;

    #[test]
    fn test_read_through_counts_hits() {
        let store = CachedStore::new(MemoryStore::new());
        store.put("key", vec![1]).unwrap();

        assert_eq!(store.get("key").unwrap(), Some(vec![1]));
        assert_eq!(store.get("key").unwrap(), Some(vec![1]));

        let stats = store.stats();
        assert_eq!(stats.hits, 2, "puts prime the cache");
        assert!(stats.hit_rate() > 0.99);
    }

    #[test]
    fn test_del_invalidates() {
        let store = CachedStore::new(MemoryStore::new());
        store.put("key", vec![1]).unwrap();
        store.del("key").unwrap();
        assert_eq!(store.get("key").unwrap(), None);
    }

    #[test]
    fn test_batch_keeps_cache_consistent() {
        let store = CachedStore::new(MemoryStore::new());
        store.put("a", vec![1]).unwrap();
        store
            .batch(vec![
                BatchOp::Del("a".into()),
                BatchOp::Put("b".into(), vec![2]),
            ])
            .unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap(), Some(vec![2]));
    }

    #[test]
    fn test_capacity_evicts_old_entries() {
        let store = CachedStore::with_capacity(MemoryStore::new(), 2);
        for i in 0..4u8 {
            store.put(&format!("k{i}"), vec![i]).unwrap();
        }
        // evicted entries still resolve through the backing store
        assert_eq!(store.get("k0").unwrap(), Some(vec![0]));
    }
}
