//! sled database wrapper with serialization helpers.

use crate::config::StorageConfig;
use crate::schema::{self, Migration};
use sled::{Db, Tree};
use thiserror::Error;

/// Tree backing the cache region.
pub const TABLE_CACHE: &str = "table_cache";

/// Tree backing the chunk region.
pub const TABLE_CHUNKED: &str = "table_chunked";

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// The two independent regions of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Cache,
    Chunked,
}

impl Region {
    /// Name of the sled tree holding this region.
    pub fn table_name(self) -> &'static str {
        match self {
            Region::Cache => TABLE_CACHE,
            Region::Chunked => TABLE_CHUNKED,
        }
    }
}

/// Wrapper around a sled database and its region trees.
///
/// Cloning is cheap: sled handles are reference counted, and all clones
/// share the same underlying database.
#[derive(Clone)]
pub struct Storage {
    db: Db,
    cache: Tree,
    chunked: Tree,
    version: u32,
}

impl Storage {
    /// Open (or create) the database described by `config`.
    ///
    /// The recorded schema version is compared with `config.version` and the
    /// regions are reset when they differ.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let db = if config.temporary {
            sled::Config::new().temporary(true).open()?
        } else {
            sled::Config::new().path(&config.path).open()?
        };
        Self::from_db(db, config.version)
    }

    /// Open an in-memory database (for testing).
    pub fn open_temporary(version: u32) -> Result<Self> {
        Self::open(&StorageConfig::temporary(version))
    }

    fn from_db(db: Db, version: u32) -> Result<Self> {
        match schema::apply(&db, version)? {
            Migration::Create => tracing::info!(version, "created storage schema"),
            Migration::Reset { from, to } => {
                tracing::info!(from, to, "schema version changed, storage reset")
            }
            Migration::Keep => tracing::debug!(version, "storage schema up to date"),
        }

        let cache = db.open_tree(Region::Cache.table_name())?;
        let chunked = db.open_tree(Region::Chunked.table_name())?;
        Ok(Self {
            db,
            cache,
            chunked,
            version,
        })
    }

    /// Schema version this handle was opened with.
    pub fn version(&self) -> u32 {
        self.version
    }

    fn tree(&self, region: Region) -> &Tree {
        match region {
            Region::Cache => &self.cache,
            Region::Chunked => &self.chunked,
        }
    }

    /// Store a serializable value in a region.
    pub fn put<K, V>(&self, region: Region, key: K, value: &V) -> Result<()>
    where
        K: AsRef<[u8]>,
        V: serde::Serialize + ?Sized,
    {
        let encoded = bincode::serialize(value)?;
        self.tree(region).insert(key, encoded)?;
        Ok(())
    }

    /// Retrieve and deserialize a value from a region.
    pub fn get<K, V>(&self, region: Region, key: K) -> Result<Option<V>>
    where
        K: AsRef<[u8]>,
        V: serde::de::DeserializeOwned,
    {
        match self.tree(region).get(key)? {
            Some(bytes) => {
                let value = bincode::deserialize(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Check if a key exists in a region.
    pub fn contains<K: AsRef<[u8]>>(&self, region: Region, key: K) -> Result<bool> {
        Ok(self.tree(region).contains_key(key)?)
    }

    /// Deserialize every value of a region in key order.
    pub fn values<V>(&self, region: Region) -> Result<Vec<V>>
    where
        V: serde::de::DeserializeOwned,
    {
        let mut values = Vec::new();
        for entry in self.tree(region).iter() {
            let (_, bytes) = entry?;
            values.push(bincode::deserialize(&bytes)?);
        }
        Ok(values)
    }

    /// Raw keys of a region in key order.
    pub fn keys(&self, region: Region) -> Result<Vec<Vec<u8>>> {
        let mut keys = Vec::new();
        for key in self.tree(region).iter().keys() {
            keys.push(key?.to_vec());
        }
        Ok(keys)
    }

    /// Number of entries in a region.
    pub fn len(&self, region: Region) -> usize {
        self.tree(region).len()
    }

    /// Whether a region holds no entries.
    pub fn is_empty(&self, region: Region) -> bool {
        self.tree(region).is_empty()
    }

    /// Apply multiple operations to one region atomically.
    ///
    /// Atomicity is provided by sled's `apply_batch`: readers observe either
    /// none or all of the operations.
    pub fn batch(&self, region: Region, operations: Vec<BatchOp>) -> Result<()> {
        let mut batch = sled::Batch::default();
        for op in operations {
            match op {
                BatchOp::Insert { key, value } => batch.insert(key, value),
                BatchOp::Remove { key } => batch.remove(key),
            }
        }
        self.tree(region).apply_batch(batch)?;
        Ok(())
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn insert_raw(&self, region: Region, key: &[u8], value: &[u8]) -> Result<()> {
        self.tree(region).insert(key, value)?;
        Ok(())
    }

    // =========================================================================
    // Key Construction Helpers
    // =========================================================================

    /// Key for a cache entry: the UTF-8 bytes of the consumer's key.
    pub fn cache_key(key: &str) -> &[u8] {
        key.as_bytes()
    }

    /// Key for a chunk: its insertion index, big-endian so that sled's
    /// lexicographic order matches insertion order.
    pub fn chunk_key(index: u64) -> [u8; 8] {
        index.to_be_bytes()
    }
}

/// Batch operation for atomic updates.
pub enum BatchOp {
    Insert { key: Vec<u8>, value: Vec<u8> },
    Remove { key: Vec<u8> },
}
