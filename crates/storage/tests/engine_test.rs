use navcache_storage::{StorageConfig, StorageEngine};
use std::path::Path;

fn open(dir: &Path, version: u32) -> StorageEngine {
    StorageEngine::new(StorageConfig::new(dir.join("navcache.db"), version))
}

#[test]
fn test_saved_value_is_returned_not_default() {
    let engine = StorageEngine::new(StorageConfig::temporary(1));
    let default = Some(b"default".to_vec());

    for (key, value) in [
        ("bytes", Some(vec![1u8, 2, 3])),
        ("empty", Some(vec![])),
        ("absent", None),
    ] {
        assert!(engine.save_data(key, value.as_deref()));
        assert_eq!(engine.get_data(key, default.clone()), value);
    }
}

#[test]
fn test_has_data_before_and_after_save() {
    let engine = StorageEngine::new(StorageConfig::temporary(1));

    assert!(!engine.has_data("tile:12:2048:1361", false));
    assert!(engine.save_data("tile:12:2048:1361", None));
    assert!(engine.has_data("tile:12:2048:1361", false));
}

#[test]
fn test_last_write_wins() {
    let engine = StorageEngine::new(StorageConfig::temporary(1));

    assert!(engine.save_data("k", Some(&b"first"[..])));
    assert!(engine.save_data("k", Some(&b"second"[..])));

    assert_eq!(engine.get_data("k", None), Some(b"second".to_vec()));
    assert_eq!(engine.stats().cache_entries, 1);
}

#[test]
fn test_chunk_set_order_and_replacement() {
    let engine = StorageEngine::new(StorageConfig::temporary(1));
    let a = Some(b"a".to_vec());
    let b = Some(b"b".to_vec());
    let c = Some(b"c".to_vec());
    let x = Some(b"x".to_vec());

    assert_eq!(engine.get_chunked_data(), Vec::<Option<Vec<u8>>>::new());

    assert!(engine.save_chunked_data(&[a.clone(), b.clone(), c.clone()]));
    assert_eq!(engine.get_chunked_data(), vec![a, b, c]);

    assert!(engine.save_chunked_data(&[x.clone()]));
    assert_eq!(engine.get_chunked_data(), vec![x]);
}

#[test]
fn test_same_version_reopen_preserves_data() {
    let dir = tempfile::tempdir().unwrap();

    let engine = open(dir.path(), 1);
    assert!(engine.save_data("k", Some(&b"v"[..])));
    assert!(engine.save_data("nothing", None));
    assert!(engine.save_chunked_data(&[Some(b"a".to_vec()), None]));
    drop(engine);

    let engine = open(dir.path(), 1);
    assert_eq!(engine.get_data("k", None), Some(b"v".to_vec()));
    assert!(engine.has_data("nothing", false));
    assert_eq!(
        engine.get_chunked_data(),
        vec![Some(b"a".to_vec()), None]
    );
}

#[test]
fn test_version_change_resets_both_regions() {
    let dir = tempfile::tempdir().unwrap();

    let engine = open(dir.path(), 1);
    assert!(engine.save_data("k1", Some(&b"v"[..])));
    assert!(engine.save_data("k2", None));
    assert!(engine.save_chunked_data(&[Some(b"a".to_vec())]));
    drop(engine);

    let engine = open(dir.path(), 2);
    assert!(!engine.has_data("k1", false));
    assert!(!engine.has_data("k2", false));
    assert!(engine.get_chunked_data().is_empty());
    assert_eq!(engine.stats().version, 2);
    drop(engine);

    // Going back is also a change.
    let engine = open(dir.path(), 1);
    assert!(engine.save_data("k1", Some(&b"again"[..])));
    drop(engine);
    let engine = open(dir.path(), 2);
    assert!(!engine.has_data("k1", false));
}

#[test]
fn test_route_checkpoint_across_restarts() {
    let dir = tempfile::tempdir().unwrap();

    let engine = open(dir.path(), 1);
    assert!(engine.save_data("route:last", Some(&[1, 2, 3, 4][..])));
    drop(engine);

    let engine = open(dir.path(), 1);
    assert_eq!(engine.get_data("route:last", None), Some(vec![1, 2, 3, 4]));
    drop(engine);

    let engine = open(dir.path(), 2);
    assert_eq!(engine.get_data("route:last", None), None);
}

#[test]
fn test_invalidate_then_continue() {
    let dir = tempfile::tempdir().unwrap();
    let engine = open(dir.path(), 1);

    assert!(engine.save_chunked_data(&[Some(vec![1]), Some(vec![2])]));
    engine.invalidate();
    engine.invalidate();

    assert_eq!(engine.get_chunked_data(), vec![Some(vec![1]), Some(vec![2])]);
    assert!(engine.save_data("after", Some(&b"reopen"[..])));
    assert!(engine.flush());
}

#[test]
fn test_temporary_store_is_discarded_on_invalidate() {
    let engine = StorageEngine::new(StorageConfig::temporary(1));

    assert!(engine.save_data("k", Some(&b"v"[..])));
    engine.invalidate();
    assert!(!engine.has_data("k", false));
}
