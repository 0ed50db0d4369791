// Disk-backed storage suites: RocksDB round-trips, the reserved root entry,
// and the LRU cache layer.

use forestry_core::{Commitment, Forestry, Store, ROOT_KEY};
use forestry_crypto::NULL_HASH;
use forestry_storage::{CachedStore, NodeDb};
use forestry_tests::{fruits, FRUITS_ROOT};
use std::sync::Arc;

#[test]
fn test_rocksdb_trie_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(NodeDb::open(dir.path()).unwrap());

    let mut trie = Forestry::load(Arc::clone(&db)).unwrap();
    for (key, value) in fruits() {
        trie.insert(&key, &value).unwrap();
    }
    assert_eq!(hex::encode(trie.root()), FRUITS_ROOT);
    drop(trie);

    let trie = Forestry::load(Arc::clone(&db)).unwrap();
    assert_eq!(hex::encode(trie.root()), FRUITS_ROOT);
    assert_eq!(trie.len().unwrap(), 30);
    assert_eq!(
        trie.get("mango[uid: 0]".as_bytes()).unwrap(),
        Some("🥭".as_bytes().to_vec())
    );

    let commitment = Commitment::from_root(&trie.root()).unwrap();
    let proof = trie.prove("kiwi[uid: 0]".as_bytes(), false).unwrap();
    assert!(commitment.has("kiwi[uid: 0]".as_bytes(), "🥝".as_bytes(), &proof));
}

#[test]
fn test_reserved_root_entry_layout() {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(NodeDb::open(dir.path()).unwrap());

    // a freshly initialized store carries the null root
    let trie = Forestry::load(Arc::clone(&db)).unwrap();
    assert_eq!(
        db.get(ROOT_KEY).unwrap(),
        Some(hex::encode(NULL_HASH).into_bytes())
    );
    drop(trie);

    let mut trie = Forestry::load(Arc::clone(&db)).unwrap();
    for (key, value) in fruits() {
        trie.insert(&key, &value).unwrap();
    }

    // the root entry tracks the current root, and the root node itself is
    // stored under its 64-hex-character hash
    assert_eq!(db.get(ROOT_KEY).unwrap(), Some(FRUITS_ROOT.as_bytes().to_vec()));
    assert!(db.get(FRUITS_ROOT).unwrap().is_some());

    // emptying the trie writes the null root back
    for (key, _) in fruits() {
        trie.delete(&key).unwrap();
    }
    assert_eq!(
        db.get(ROOT_KEY).unwrap(),
        Some(hex::encode(NULL_HASH).into_bytes())
    );
}

#[test]
fn test_mutations_are_atomic_batches() {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(NodeDb::open(dir.path()).unwrap());
    let mut trie = Forestry::load(Arc::clone(&db)).unwrap();

    for (key, value) in fruits() {
        trie.insert(&key, &value).unwrap();
    }
    let root = trie.root();

    // a failed mutation leaves both the store and the handle untouched
    assert!(trie.delete(b"not-a-fruit").is_err());
    assert_eq!(trie.root(), root);
    assert_eq!(db.get(ROOT_KEY).unwrap(), Some(FRUITS_ROOT.as_bytes().to_vec()));

    let reloaded = Forestry::load(Arc::clone(&db)).unwrap();
    assert_eq!(reloaded.root(), root);
}

#[test]
fn test_cached_store_serves_hot_nodes() {
    let dir = tempfile::tempdir().unwrap();
    let cached = Arc::new(CachedStore::new(NodeDb::open(dir.path()).unwrap()));

    let mut trie = Forestry::load(Arc::clone(&cached)).unwrap();
    for (key, value) in fruits() {
        trie.insert(&key, &value).unwrap();
    }
    assert_eq!(hex::encode(trie.root()), FRUITS_ROOT);

    // repeated walks hit the cache on the shared upper levels
    for (key, _) in fruits() {
        trie.prove(&key, false).unwrap();
    }
    let stats = cached.stats();
    assert!(stats.hits > 0, "expected cache hits, got {stats:?}");

    let commitment = Commitment::from_root(&trie.root()).unwrap();
    for (key, value) in fruits() {
        let proof = trie.prove(&key, false).unwrap();
        assert!(commitment.has(&key, &value, &proof));
    }
}
