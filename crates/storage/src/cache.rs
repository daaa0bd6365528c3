//! Key → blob cache region.

use crate::db::{Region, Result, Storage};

/// A stored value. `None` is a real value, distinct from "no entry".
pub type CacheValue = Option<Vec<u8>>;

/// Fallible operations on the cache region.
pub struct CacheRegion<'a> {
    storage: &'a Storage,
}

impl<'a> CacheRegion<'a> {
    /// Create a new CacheRegion wrapping the given storage.
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Check whether an entry exists for `key`.
    pub fn contains(&self, key: &str) -> Result<bool> {
        self.storage.contains(Region::Cache, Storage::cache_key(key))
    }

    /// Look up an entry.
    ///
    /// The outer `Option` is "entry exists", the inner one is the stored value.
    pub fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        self.storage.get(Region::Cache, Storage::cache_key(key))
    }

    /// Insert or replace the entry for `key`.
    pub fn put(&self, key: &str, value: Option<&[u8]>) -> Result<()> {
        self.storage.put(Region::Cache, Storage::cache_key(key), &value)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.storage.len(Region::Cache)
    }

    /// Whether the region holds no entries.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty(Region::Cache)
    }
}
