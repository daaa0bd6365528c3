//! Embedded persistence layer for navcache.
//!
//! Two independent regions live in one sled database:
//! - **Cache region**: string key → opaque blob (or an explicit absent value),
//!   insert-or-replace, one entry per key
//! - **Chunk region**: one ordered list of blobs, replaced wholesale on write
//!
//! The store is opened with a schema version. Opening with a version that
//! differs from the recorded one drops both regions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Consuming Layer                       │
//! │         (route checkpoints, tile bundles, CLI)           │
//! └────────────────────────┬────────────────────────────────┘
//!                          │  bool / Option / Vec, never errors
//! ┌────────────────────────▼────────────────────────────────┐
//! │                   StorageEngine                          │
//! │   lazy connection · chunk lock · FaultLogger side channel│
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────┐  │
//! │  │ CacheRegion │  │ ChunkRegion │  │ Storage (DB)    │  │
//! │  │  - contains │  │  - replace  │  │  - sled wrapper │  │
//! │  │  - get/put  │  │  - read_all │  │  - schema reset │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────┘  │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │                    sled Database                         │
//! │     table_cache · table_chunked · schema:version         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use navcache_storage::{StorageConfig, StorageEngine};
//!
//! let engine = StorageEngine::new(StorageConfig::new("./navcache.db", 1));
//!
//! engine.save_data("route:last", Some(&[1, 2, 3, 4][..]));
//! assert_eq!(engine.get_data("route:last", None), Some(vec![1, 2, 3, 4]));
//!
//! engine.save_chunked_data(&[Some(b"part-1".to_vec()), Some(b"part-2".to_vec())]);
//! assert_eq!(engine.get_chunked_data().len(), 2);
//!
//! engine.invalidate();
//! ```

pub mod cache;
pub mod chunked;
pub mod config;
pub mod db;
pub mod engine;
pub mod logger;
pub mod schema;

// Re-export commonly used types
pub use cache::{CacheRegion, CacheValue};
pub use chunked::{Chunk, ChunkRegion};
pub use config::StorageConfig;
pub use db::{BatchOp, Region, Result, Storage, StorageError};
pub use engine::{StorageEngine, StorageStats};
pub use logger::{FaultLogger, TracingLogger};
pub use schema::{Migration, SchemaState};
