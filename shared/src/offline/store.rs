//! Versioned cache stores
//!
//! A [`CacheRegistry`] holds one [`MemoryCache`] per version tag, the way
//! the platform's cache storage holds named caches. Invalidation is
//! wholesale: activating a version deletes every other store in full. No
//! per-entry TTL, no selective eviction.

use super::http::Response;
use crate::errors::CacheError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A stored response plus the URL it was stored under
///
/// The URL travels with the entry because fallback lookups may happen
/// under a substituted key; the entry's own URL is what decides whether
/// the stale-marking rewrite applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub url: String,
    pub response: Response,
}

/// Key-value store of cached responses
///
/// Reads take `&self`; concurrent writes to one key are last-writer-wins,
/// which is acceptable because writes are idempotent copies of a
/// successful response.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;
    fn put(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError>;
}

/// In-process cache store backing one version
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::Unavailable)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Unavailable)?;
        entries.insert(key.to_string(), entry);
        Ok(())
    }
}

/// Named cache stores, one per deployed version
#[derive(Debug, Default)]
pub struct CacheRegistry {
    caches: Mutex<HashMap<String, Arc<MemoryCache>>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (creating if needed) the store with the given name
    pub fn open(&self, name: &str) -> Result<Arc<MemoryCache>, CacheError> {
        let mut caches = self.caches.lock().map_err(|_| CacheError::Unavailable)?;
        Ok(caches
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryCache::new()))
            .clone())
    }

    /// Names of all stores currently registered
    pub fn names(&self) -> Result<Vec<String>, CacheError> {
        let caches = self.caches.lock().map_err(|_| CacheError::Unavailable)?;
        Ok(caches.keys().cloned().collect())
    }

    /// Delete one store in full; returns whether it existed
    pub fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let mut caches = self.caches.lock().map_err(|_| CacheError::Unavailable)?;
        Ok(caches.remove(name).is_some())
    }

    /// Activate a version: every store not named `keep` is deleted
    pub fn activate(&self, keep: &str) -> Result<(), CacheError> {
        let mut caches = self.caches.lock().map_err(|_| CacheError::Unavailable)?;
        caches.retain(|name, _| name == keep);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str, body: &[u8]) -> CacheEntry {
        CacheEntry {
            url: url.to_string(),
            response: Response::new(200, vec![], body.to_vec()),
        }
    }

    #[test]
    fn test_put_then_get() {
        let cache = MemoryCache::new();
        cache.put("/", entry("/", b"shell")).unwrap();
        let hit = cache.get("/").unwrap().unwrap();
        assert_eq!(hit.response.body, b"shell");
        assert!(cache.get("/missing").unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let cache = MemoryCache::new();
        cache.put("/", entry("/", b"old")).unwrap();
        cache.put("/", entry("/", b"new")).unwrap();
        assert_eq!(cache.get("/").unwrap().unwrap().response.body, b"new");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_registry_open_is_idempotent() {
        let registry = CacheRegistry::new();
        let first = registry.open("babynap-v1").unwrap();
        first.put("/", entry("/", b"shell")).unwrap();
        let second = registry.open("babynap-v1").unwrap();
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_activate_purges_other_versions() {
        let registry = CacheRegistry::new();
        registry.open("babynap-v1").unwrap();
        registry.open("babynap-v2").unwrap();
        registry.open("babynap-v3").unwrap();

        registry.activate("babynap-v3").unwrap();

        let mut names = registry.names().unwrap();
        names.sort();
        assert_eq!(names, vec!["babynap-v3".to_string()]);
    }

    #[test]
    fn test_delete_reports_existence() {
        let registry = CacheRegistry::new();
        registry.open("babynap-v1").unwrap();
        assert!(registry.delete("babynap-v1").unwrap());
        assert!(!registry.delete("babynap-v1").unwrap());
    }
}
