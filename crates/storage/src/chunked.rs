//! Ordered, wholesale-replaced chunk region.

use crate::db::{BatchOp, Region, Result, Storage};

/// A single chunk. `None` is stored and read back as-is.
pub type Chunk = Option<Vec<u8>>;

/// Fallible operations on the chunk region.
pub struct ChunkRegion<'a> {
    storage: &'a Storage,
}

impl<'a> ChunkRegion<'a> {
    /// Create a new ChunkRegion wrapping the given storage.
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Replace the stored chunk set with `chunks`.
    ///
    /// Old keys are removed and new ones inserted in a single batch, so the
    /// region never holds a mix of the old and new sets. Callers writing
    /// from several threads must still serialize calls: the set of keys to
    /// remove is read before the batch is applied.
    pub fn replace(&self, chunks: &[Chunk]) -> Result<()> {
        let new_len = chunks.len() as u64;
        let mut ops = Vec::with_capacity(chunks.len());

        for key in self.storage.keys(Region::Chunked)? {
            // Keys below the new length are overwritten below.
            if chunk_index(&key).map_or(true, |index| index >= new_len) {
                ops.push(BatchOp::Remove { key });
            }
        }

        for (index, chunk) in chunks.iter().enumerate() {
            ops.push(BatchOp::Insert {
                key: Storage::chunk_key(index as u64).to_vec(),
                value: bincode::serialize(chunk)?,
            });
        }

        self.storage.batch(Region::Chunked, ops)
    }

    /// All chunks in insertion order.
    pub fn read_all(&self) -> Result<Vec<Chunk>> {
        self.storage.values(Region::Chunked)
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.storage.len(Region::Chunked)
    }

    /// Whether the region holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty(Region::Chunked)
    }
}

fn chunk_index(key: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = key.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}
