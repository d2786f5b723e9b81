//! Discount id to display code cache using moka
//!
//! An explicit cache object rather than a process-global map: editors that
//! should share resolved codes are handed clones of the same cache, tests
//! build their own.

use moka::sync::Cache;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Concurrent `discount id → code` cache
///
/// Writes are idempotent: a given id always maps to the code the catalog
/// reported for it, so concurrent writers can only repeat each other.
/// Clones share storage.
#[derive(Debug, Clone)]
pub struct DiscountCodeCache {
    inner: Cache<String, String>,
}

impl DiscountCodeCache {
    /// Create new cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Remember the code for a discount id
    #[inline]
    pub fn insert(&self, id: impl Into<String>, code: impl Into<String>) {
        self.inner.insert(id.into(), code.into());
    }

    /// Code for a discount id, if one was recorded
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<String> {
        self.inner.get(id)
    }

    /// Check if an id has a recorded code
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.inner.contains_key(id)
    }

    /// Forget one id
    #[inline]
    pub fn invalidate(&self, id: &str) {
        self.inner.invalidate(id);
    }

    /// Forget everything
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get cache statistics
    ///
    /// Counts are eventually consistent with recent writes.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks();
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl Default for DiscountCodeCache {
    /// Create cache with default capacity (1,000 entries)
    fn default() -> Self {
        Self::new(1_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let cache = DiscountCodeCache::new(16);
        cache.insert("d1", "SAVE10");
        assert_eq!(cache.get("d1").as_deref(), Some("SAVE10"));
        assert!(cache.get("d2").is_none());
    }

    #[test]
    fn clones_share_entries() {
        let cache = DiscountCodeCache::default();
        let other = cache.clone();
        cache.insert("d1", "SAVE10");
        assert!(other.contains("d1"));

        other.invalidate("d1");
        assert!(!cache.contains("d1"));
    }

    #[test]
    fn repeated_writes_are_idempotent() {
        let cache = DiscountCodeCache::default();
        for _ in 0..3 {
            cache.insert("d1", "SAVE10");
        }
        assert_eq!(cache.stats().entry_count, 1);
    }

    #[test]
    fn separate_caches_are_independent() {
        let a = DiscountCodeCache::default();
        let b = DiscountCodeCache::default();
        a.insert("d1", "SAVE10");
        assert!(!b.contains("d1"));

        a.invalidate_all();
        assert!(!a.contains("d1"));
    }
}
