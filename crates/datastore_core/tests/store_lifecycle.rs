use datastore_core::{DataStore, LocalFileBackend, StoreOptions, StoreRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct SaveGame {
    field: i64,
    player: String,
    unlocked: Vec<String>,
}

impl StoreRecord for SaveGame {
    const STORE_KEY: &'static str = "tests.SaveGame";
}

type SaveStore = DataStore<SaveGame, LocalFileBackend<SaveGame>>;

fn open_store(root: &Path, load_on_initialize: bool) -> SaveStore {
    let backend = LocalFileBackend::for_record(root).unwrap();
    DataStore::with_options(backend, StoreOptions { load_on_initialize })
}

fn sample() -> SaveGame {
    SaveGame {
        field: 42,
        player: "ada".to_string(),
        unlocked: vec!["forest".to_string(), "cave".to_string()],
    }
}

#[test]
fn empty_backend_starts_from_default() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path(), true);

    assert_eq!(store.data(), &SaveGame::default());
    assert!(!store.load());
    assert!(store.last_error().is_none());
    assert!(!store.backend().path().exists());
}

#[test]
fn saved_record_is_loaded_by_a_new_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path(), true);
    *store.data_mut() = sample();
    assert!(store.save());

    let reopened = open_store(dir.path(), true);
    assert_eq!(reopened.data(), &sample());
    assert_eq!(reopened.data().field, 42);
}

#[test]
fn skipping_initial_load_ignores_existing_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path(), true);
    store.data_mut().field = 42;
    assert!(store.save());

    let mut fresh = open_store(dir.path(), false);
    assert_eq!(fresh.data(), &SaveGame::default());
    assert!(fresh.load());
    assert_eq!(fresh.data().field, 42);
}

#[test]
fn delete_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path(), true);

    assert!(store.delete());
    assert!(store.delete());

    assert!(store.save());
    assert!(store.backend().path().exists());
    assert!(store.delete());
    assert!(!store.backend().path().exists());
    assert!(store.delete());
}

#[test]
fn clear_without_persist_keeps_durable_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path(), true);
    *store.data_mut() = sample();
    assert!(store.save());

    store.clear(false);
    assert_eq!(store.data(), &SaveGame::default());

    assert!(store.load());
    assert_eq!(store.data(), &sample());
}

#[test]
fn clear_with_persist_overwrites_durable_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path(), true);
    *store.data_mut() = sample();
    assert!(store.save());

    store.clear(true);
    assert_eq!(store.data(), &SaveGame::default());

    let reopened = open_store(dir.path(), true);
    assert_eq!(reopened.data(), &SaveGame::default());
    assert!(reopened.backend().path().exists());
}

#[test]
fn corrupt_record_fails_load_without_touching_memory() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_store(dir.path(), true);
    *store.data_mut() = sample();

    std::fs::write(store.backend().path(), b"{\"field\": \"not a number\"").unwrap();

    assert!(!store.load());
    assert_eq!(store.data(), &sample());
    let err = store.last_error().expect("decode failure should be recorded");
    assert_eq!(err.code(), "decode_failed");
    assert!(err.to_string().contains("tests.SaveGame"));
}

#[test]
fn corrupt_record_on_initialize_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tests.SaveGame"), b"garbage").unwrap();

    let store = open_store(dir.path(), true);

    assert_eq!(store.data(), &SaveGame::default());
    assert!(store.last_error().is_some());
}

#[test]
fn stores_with_different_keys_do_not_collide() {
    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Settings {
        volume: u8,
    }

    impl StoreRecord for Settings {
        const STORE_KEY: &'static str = "tests.Settings";
    }

    let dir = tempfile::tempdir().unwrap();
    let mut game = open_store(dir.path(), true);
    game.data_mut().field = 1;
    assert!(game.save());

    let mut settings =
        DataStore::new(LocalFileBackend::<Settings>::for_record(dir.path()).unwrap());
    assert_eq!(settings.data(), &Settings::default());
    settings.data_mut().volume = 3;
    assert!(settings.save());

    assert_eq!(open_store(dir.path(), true).data().field, 1);
    assert_ne!(game.backend().path(), settings.backend().path());
}
