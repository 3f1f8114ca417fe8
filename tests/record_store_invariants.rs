//! Record store invariant tests
//!
//! Covers id allocation, merge semantics, not-found handling, name search
//! and deletion, atomic saves and concurrent writers against a real file.

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;

use crudstore::record::{Fields, Record};
use crudstore::storage::{JsonFileStorage, Storage, StorageErrorKind};
use crudstore::store::{NameFilter, RecordStore, StoreError};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn fields(value: Value) -> Fields {
    value.as_object().cloned().expect("object literal")
}

fn person(name: &str, address: &str) -> Fields {
    fields(json!({"nama": name, "alamat": address}))
}

fn file_store(tmp: &TempDir) -> RecordStore<JsonFileStorage> {
    RecordStore::open(tmp.path().join("data.json"))
}

fn ids(records: &[Record]) -> Vec<u64> {
    records.iter().map(Record::id).collect()
}

// =============================================================================
// Id allocation
// =============================================================================

#[test]
fn test_sequential_creates_yield_consecutive_ids() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    for expected in 1..=10 {
        let record = store.create(person(&format!("p{}", expected), "x")).unwrap();
        assert_eq!(record.id(), expected);
    }
    assert_eq!(ids(&store.list_all().unwrap()), (1..=10).collect::<Vec<_>>());
}

#[test]
fn test_ids_never_reused_after_delete() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    for i in 0..3 {
        store.create(person(&format!("p{}", i), "x")).unwrap();
    }
    let mut issued: Vec<u64> = vec![1, 2, 3];

    for victim in [2, 3, 4] {
        store.delete(victim).unwrap();
        let fresh = store.create(person("new", "y")).unwrap().id();
        assert!(
            issued.iter().all(|&old| fresh > old),
            "id {} reissued or not above {:?}",
            fresh,
            issued
        );
        issued.push(fresh);
    }
}

#[test]
fn test_supplied_id_is_ignored_on_create() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    let record = store
        .create(fields(json!({"id": 500, "nama": "Ana", "alamat": "Jl. A"})))
        .unwrap();
    assert_eq!(record.id(), 1);
    assert_eq!(store.get_by_id(1).unwrap(), record);
    assert!(store.get_by_id(500).unwrap_err().is_not_found());
}

// =============================================================================
// Update / delete semantics
// =============================================================================

#[test]
fn test_update_merges_partially() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);
    let created = store
        .create(fields(json!({"nama": "Ana", "alamat": "Jl. A", "umur": 20})))
        .unwrap();

    let updated = store
        .update(created.id(), fields(json!({"nama": "X", "id": 77})))
        .unwrap();

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.name(), Some("X"));
    assert_eq!(updated.address(), Some("Jl. A"));
    assert_eq!(updated.get("umur"), Some(&json!(20)));
    assert_eq!(store.get_by_id(created.id()).unwrap(), updated);
}

#[test]
fn test_missing_id_is_not_found_and_leaves_collection_unchanged() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);
    store.create(person("Ana", "Jl. A")).unwrap();
    store.create(person("Budi", "Jl. B")).unwrap();
    let before = store.list_all().unwrap();
    let raw_before = fs::read(tmp.path().join("data.json")).unwrap();

    assert!(matches!(store.update(9, person("Z", "Z")), Err(StoreError::NotFound(9))));
    assert!(matches!(store.delete(9), Err(StoreError::NotFound(9))));
    assert!(matches!(store.get_by_id(9), Err(StoreError::NotFound(9))));

    assert_eq!(store.list_all().unwrap(), before);
    assert_eq!(fs::read(tmp.path().join("data.json")).unwrap(), raw_before);
}

#[test]
fn test_scenario_search_and_delete_by_name() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);

    assert_eq!(store.create(person("Ana", "Jl. A")).unwrap().id(), 1);
    assert_eq!(store.create(person("Budi", "Jl. B")).unwrap().id(), 2);

    let hits = store
        .search(|r| NameFilter::containing("an").matches(r))
        .unwrap();
    assert_eq!(ids(&hits), vec![1]);

    let removed = store
        .delete_where(|r| NameFilter::exact("Ana").matches(r))
        .unwrap();
    assert_eq!(removed, 1);

    let remaining = store.list_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name(), Some("Budi"));
    assert_eq!(remaining[0].address(), Some("Jl. B"));
}

#[test]
fn test_search_without_matches_is_empty() {
    let tmp = TempDir::new().unwrap();
    let store = file_store(&tmp);
    assert!(store.search(|_| true).unwrap().is_empty());

    store.create(person("Ana", "Jl. A")).unwrap();
    assert!(store
        .search(|r| NameFilter::containing("zzz").matches(r))
        .unwrap()
        .is_empty());
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_save_of_load_preserves_content() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("data.json");
    let original = r#"[
    {"nama": "Ana", "alamat": "Jl. A", "id": 1, "hobi": ["baca", "lari"]},
    {"id": 2, "nama": "Budi", "alamat": "Jl. B", "catatan": null}
]"#;
    fs::write(&path, original).unwrap();

    let storage = JsonFileStorage::new(&path);
    let loaded = storage.load().unwrap();
    storage.save(&loaded).unwrap();

    let before: Value = serde_json::from_str(original).unwrap();
    let after: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(before, after);

    let keys: Vec<String> = after[0].as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["nama", "alamat", "id", "hobi"]);
}

#[test]
fn test_failed_save_keeps_previous_document() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("data.json");
    let store = RecordStore::open(&path);
    store.create(person("Ana", "Jl. A")).unwrap();
    let before = fs::read(&path).unwrap();

    // A directory squatting on the temp path makes the write step fail.
    fs::create_dir(tmp.path().join("data.json.tmp")).unwrap();

    match store.create(person("Budi", "Jl. B")) {
        Err(StoreError::Unavailable(err)) => assert_eq!(err.kind(), StorageErrorKind::Write),
        other => panic!("expected Unavailable, got {:?}", other),
    }
    assert_eq!(fs::read(&path).unwrap(), before);
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn test_stale_temp_file_is_ignored_and_replaced() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("data.json");
    let store = RecordStore::open(&path);
    store.create(person("Ana", "Jl. A")).unwrap();

    // Leftover from a crash in the middle of a write.
    fs::write(tmp.path().join("data.json.tmp"), "[{\"id\": 1, \"na").unwrap();

    assert_eq!(store.list_all().unwrap().len(), 1);
    store.create(person("Budi", "Jl. B")).unwrap();
    assert_eq!(ids(&store.list_all().unwrap()), vec![1, 2]);
    assert!(!tmp.path().join("data.json.tmp").exists());
}

#[test]
fn test_malformed_document_makes_store_unavailable() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("data.json");
    fs::write(&path, r#"[{"id": "satu", "nama": "Ana"}]"#).unwrap();
    let store = RecordStore::open(&path);

    match store.list_all() {
        Err(StoreError::Unavailable(err)) => assert_eq!(err.kind(), StorageErrorKind::Read),
        other => panic!("expected Unavailable, got {:?}", other),
    }
    assert!(store.create(person("Budi", "Jl. B")).is_err());
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        r#"[{"id": "satu", "nama": "Ana"}]"#
    );
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_creates_allocate_dense_unique_ids() {
    const WRITERS: u64 = 32;

    let tmp = TempDir::new().unwrap();
    let store = Arc::new(file_store(&tmp));

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.create(person(&format!("p{}", i), "x")).unwrap().id())
        })
        .collect();
    let returned: HashSet<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let expected: HashSet<u64> = (1..=WRITERS).collect();
    assert_eq!(returned, expected);

    let persisted: HashSet<u64> = ids(&store.list_all().unwrap()).into_iter().collect();
    assert_eq!(persisted, expected);
}

#[test]
fn test_concurrent_updates_are_not_lost() {
    const WRITERS: usize = 16;

    let tmp = TempDir::new().unwrap();
    let store = Arc::new(file_store(&tmp));
    let target = store.create(person("Ana", "Jl. A")).unwrap().id();

    thread::scope(|scope| {
        for i in 0..WRITERS {
            let store = Arc::clone(&store);
            scope.spawn(move || {
                let mut field = Fields::new();
                field.insert(format!("f{}", i), json!(i));
                store.update(target, field).unwrap();
            });
        }
        for _ in 0..WRITERS {
            let store = Arc::clone(&store);
            scope.spawn(move || {
                store.list_all().unwrap();
            });
        }
    });

    let record = store.get_by_id(target).unwrap();
    for i in 0..WRITERS {
        assert_eq!(record.get(&format!("f{}", i)), Some(&json!(i)), "lost update f{}", i);
    }
    assert_eq!(record.name(), Some("Ana"));
}
