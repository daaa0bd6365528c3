//! Infallible storage engine boundary.
//!
//! Every operation catches faults from the layers below, reports them to a
//! [`FaultLogger`] and degrades to a caller-supplied default or an empty
//! result. The cache is an optimization; its failure never reaches callers.
//!
//! The sled connection is opened lazily on first use and reused until
//! [`StorageEngine::invalidate`]. The next call after that reopens it.

use crate::cache::{CacheRegion, CacheValue};
use crate::chunked::{Chunk, ChunkRegion};
use crate::config::StorageConfig;
use crate::db::{Result, Storage};
use crate::logger::{FaultLogger, TracingLogger};
use parking_lot::Mutex;
use std::sync::Arc;

/// Snapshot of store contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Entries in the cache region.
    pub cache_entries: usize,
    /// Chunks in the chunk region.
    pub chunks: usize,
    /// Schema version of the open store (0 when it could not be opened).
    pub version: u32,
}

/// Embedded blob cache and chunk store.
pub struct StorageEngine {
    config: StorageConfig,
    connection: Mutex<Option<Storage>>,
    /// Serializes chunk-region access so a replacement is never observed
    /// or raced halfway.
    chunk_lock: Mutex<()>,
    logger: Arc<dyn FaultLogger>,
}

impl StorageEngine {
    /// Create an engine that reports faults through `tracing`.
    ///
    /// Nothing is opened until the first operation.
    pub fn new(config: StorageConfig) -> Self {
        Self::with_logger(config, Arc::new(TracingLogger))
    }

    /// Create an engine with a custom fault logger.
    pub fn with_logger(config: StorageConfig, logger: Arc<dyn FaultLogger>) -> Self {
        Self {
            config,
            connection: Mutex::new(None),
            chunk_lock: Mutex::new(()),
            logger,
        }
    }

    /// The configuration this engine opens the store with.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn connection(&self) -> Result<Storage> {
        let mut slot = self.connection.lock();
        if let Some(storage) = slot.as_ref() {
            return Ok(storage.clone());
        }

        tracing::debug!(path = %self.config.path.display(), "opening storage");
        let storage = Storage::open(&self.config)?;
        *slot = Some(storage.clone());
        Ok(storage)
    }

    fn degrade<T>(&self, operation: &'static str, result: Result<T>, fallback: T) -> T {
        match result {
            Ok(value) => value,
            Err(fault) => {
                self.logger.log_error(operation, &fault);
                fallback
            }
        }
    }

    // =========================================================================
    // Cache Region
    // =========================================================================

    /// Whether an entry exists for `key`. Returns `default` on fault.
    pub fn has_data(&self, key: &str, default: bool) -> bool {
        let result = self
            .connection()
            .and_then(|storage| CacheRegion::new(&storage).contains(key));
        self.degrade("has_data", result, default)
    }

    /// Stored value for `key`.
    ///
    /// Returns `default` when there is no entry or on fault. An entry saved
    /// with an absent value returns `None`, not `default`.
    pub fn get_data(&self, key: &str, default: CacheValue) -> CacheValue {
        let result = self
            .connection()
            .and_then(|storage| CacheRegion::new(&storage).get(key));
        match self.degrade("get_data", result, None) {
            Some(value) => value,
            None => default,
        }
    }

    /// Insert or replace the entry for `key`. Returns whether it was written.
    pub fn save_data(&self, key: &str, value: Option<&[u8]>) -> bool {
        let len = key.chars().count();
        if len > self.config.key_soft_limit {
            tracing::warn!(
                len,
                limit = self.config.key_soft_limit,
                "cache key exceeds soft limit"
            );
        }

        let result = self
            .connection()
            .and_then(|storage| CacheRegion::new(&storage).put(key, value))
            .map(|()| true);
        self.degrade("save_data", result, false)
    }

    // =========================================================================
    // Chunk Region
    // =========================================================================

    /// Replace the stored chunk set. Returns whether it was written.
    pub fn save_chunked_data(&self, chunks: &[Chunk]) -> bool {
        let _guard = self.chunk_lock.lock();
        let result = self
            .connection()
            .and_then(|storage| ChunkRegion::new(&storage).replace(chunks))
            .map(|()| true);
        self.degrade("save_chunked_data", result, false)
    }

    /// All chunks in insertion order; empty when none are stored or on fault.
    pub fn get_chunked_data(&self) -> Vec<Chunk> {
        let _guard = self.chunk_lock.lock();
        let result = self
            .connection()
            .and_then(|storage| ChunkRegion::new(&storage).read_all());
        self.degrade("get_chunked_data", result, Vec::new())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Force pending writes to disk. Returns whether the flush succeeded.
    pub fn flush(&self) -> bool {
        let result = self
            .connection()
            .and_then(|storage| storage.flush())
            .map(|()| true);
        self.degrade("flush", result, false)
    }

    /// Current contents summary. All zeros on fault.
    pub fn stats(&self) -> StorageStats {
        let result = self.connection().map(|storage| StorageStats {
            cache_entries: CacheRegion::new(&storage).len(),
            chunks: ChunkRegion::new(&storage).len(),
            version: storage.version(),
        });
        self.degrade("stats", result, StorageStats::default())
    }

    /// Release the connection. Safe to call any number of times.
    ///
    /// Pending writes are flushed first; a failed flush is logged. A temporary
    /// store loses its contents here.
    pub fn invalidate(&self) {
        let storage = self.connection.lock().take();
        if let Some(storage) = storage {
            let result = storage.flush();
            self.degrade("invalidate", result, ());
            tracing::debug!(path = %self.config.path.display(), "storage closed");
        }
    }
}

impl Drop for StorageEngine {
    fn drop(&mut self) {
        self.invalidate();
    }
}
