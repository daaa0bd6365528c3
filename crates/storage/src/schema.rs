//! Schema versioning.
//!
//! The store records a single schema version. Opening with a different
//! version is not a migration: both regions are dropped and recreated empty.
//!
//! ```text
//!   Absent ──create──▶ Present(v) ──reopen(v)──▶ Present(v)
//!                          │
//!                          └──reopen(w != v)──▶ reset ──▶ Present(w)
//! ```

use crate::db::{Region, Result};
use sled::Db;

/// Key of the recorded version in sled's default tree.
pub const SCHEMA_VERSION_KEY: &[u8] = b"schema:version";

/// What is on disk before the store is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    Absent,
    Present(u32),
}

/// Action taken when opening with a requested version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Migration {
    /// Fresh store: create both regions.
    Create,
    /// Same version: nothing to do.
    Keep,
    /// Version changed: drop both regions and recreate them empty.
    Reset { from: u32, to: u32 },
}

impl SchemaState {
    /// Pure transition for opening this state with `requested`.
    pub fn transition(self, requested: u32) -> Migration {
        match self {
            SchemaState::Absent => Migration::Create,
            SchemaState::Present(current) if current == requested => Migration::Keep,
            SchemaState::Present(current) => Migration::Reset {
                from: current,
                to: requested,
            },
        }
    }
}

/// Read the recorded schema state.
pub fn recorded_state(db: &Db) -> Result<SchemaState> {
    match db.get(SCHEMA_VERSION_KEY)? {
        Some(bytes) => Ok(SchemaState::Present(bincode::deserialize(&bytes)?)),
        None => Ok(SchemaState::Absent),
    }
}

/// Bring the on-disk structures to `requested` and return what was done.
///
/// The version is recorded after the trees are dropped, so a crash in
/// between replays the reset on the next open.
pub fn apply(db: &Db, requested: u32) -> Result<Migration> {
    let migration = recorded_state(db)?.transition(requested);

    let regions = [Region::Cache, Region::Chunked];

    match migration {
        Migration::Keep => return Ok(migration),
        Migration::Reset { .. } => {
            for region in regions {
                db.drop_tree(region.table_name())?;
            }
        }
        Migration::Create => {}
    }

    for region in regions {
        db.open_tree(region.table_name())?;
    }
    db.insert(SCHEMA_VERSION_KEY, bincode::serialize(&requested)?)?;
    db.flush()?;
    Ok(migration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{TABLE_CACHE, TABLE_CHUNKED};

    fn temporary_db() -> Db {
        sled::Config::new().temporary(true).open().unwrap()
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(SchemaState::Absent.transition(1), Migration::Create);
        assert_eq!(SchemaState::Present(1).transition(1), Migration::Keep);
        assert_eq!(
            SchemaState::Present(1).transition(2),
            Migration::Reset { from: 1, to: 2 }
        );
        // Downgrades reset too
        assert_eq!(
            SchemaState::Present(5).transition(3),
            Migration::Reset { from: 5, to: 3 }
        );
    }

    #[test]
    fn test_apply_records_version() {
        let db = temporary_db();
        assert_eq!(recorded_state(&db).unwrap(), SchemaState::Absent);

        assert_eq!(apply(&db, 4).unwrap(), Migration::Create);
        assert_eq!(recorded_state(&db).unwrap(), SchemaState::Present(4));

        assert_eq!(apply(&db, 4).unwrap(), Migration::Keep);
        assert_eq!(recorded_state(&db).unwrap(), SchemaState::Present(4));
    }

    #[test]
    fn test_reset_drops_both_regions() {
        let db = temporary_db();
        apply(&db, 1).unwrap();

        db.open_tree(TABLE_CACHE).unwrap().insert("k", "v").unwrap();
        db.open_tree(TABLE_CHUNKED).unwrap().insert([0u8; 8], "c").unwrap();

        assert_eq!(apply(&db, 2).unwrap(), Migration::Reset { from: 1, to: 2 });
        assert!(db.open_tree(TABLE_CACHE).unwrap().is_empty());
        assert!(db.open_tree(TABLE_CHUNKED).unwrap().is_empty());
        assert_eq!(recorded_state(&db).unwrap(), SchemaState::Present(2));
    }

    #[test]
    fn test_keep_preserves_data() {
        let db = temporary_db();
        apply(&db, 1).unwrap();
        db.open_tree(TABLE_CACHE).unwrap().insert("k", "v").unwrap();

        apply(&db, 1).unwrap();
        assert!(db.open_tree(TABLE_CACHE).unwrap().contains_key("k").unwrap());
    }
}
