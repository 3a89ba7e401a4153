use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

static FILE_SEQ: AtomicUsize = AtomicUsize::new(0);

fn temp_path(label: &str) -> PathBuf {
    let seq = FILE_SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir()
        .join(format!("petatwork-test-{}-{label}-{seq}", std::process::id()))
        .join("store.json")
}

// =============================================================================
// MemoryPersistence
// =============================================================================

#[test]
fn memory_set_then_get() {
    let store = MemoryPersistence::new();
    store.set(TOKEN_KEY, "t1");
    assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("t1"));
    assert_eq!(store.len(), 1);
}

#[test]
fn memory_remove_only_drops_named_key() {
    let store = MemoryPersistence::new();
    store.set(TOKEN_KEY, "t1");
    store.set(USER_KEY, "{}");
    store.remove(TOKEN_KEY);
    assert!(store.get(TOKEN_KEY).is_none());
    assert_eq!(store.get(USER_KEY).as_deref(), Some("{}"));
}

#[test]
fn memory_clear_empties_store() {
    let store = MemoryPersistence::new();
    store.set(TOKEN_KEY, "t1");
    store.set(LOCALE_KEY, "fr");
    store.clear();
    assert!(store.is_empty());
}

// =============================================================================
// load_json / save_json
// =============================================================================

#[test]
fn save_json_then_load_json() {
    let store = MemoryPersistence::new();
    save_json(&store, "numbers", &vec![1, 2, 3]);
    let loaded: Option<Vec<i32>> = load_json(&store, "numbers");
    assert_eq!(loaded, Some(vec![1, 2, 3]));
}

#[test]
fn load_json_returns_none_for_garbage() {
    let store = MemoryPersistence::new();
    store.set(USER_KEY, "{not json");
    let loaded: Option<serde_json::Value> = load_json(&store, USER_KEY);
    assert!(loaded.is_none());
}

#[test]
fn load_json_returns_none_for_missing_key() {
    let store = MemoryPersistence::new();
    let loaded: Option<serde_json::Value> = load_json(&store, USER_KEY);
    assert!(loaded.is_none());
}

// =============================================================================
// FilePersistence
// =============================================================================

#[test]
fn file_open_missing_path_starts_empty() {
    let store = FilePersistence::open(temp_path("missing"));
    assert!(store.get(TOKEN_KEY).is_none());
}

#[test]
fn file_values_survive_reopen() {
    let path = temp_path("reopen");
    {
        let store = FilePersistence::open(&path);
        store.set(TOKEN_KEY, "abc");
        store.set(LOCALE_KEY, "fr");
    }
    let reopened = FilePersistence::open(&path);
    assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("abc"));
    assert_eq!(reopened.get(LOCALE_KEY).as_deref(), Some("fr"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn file_clear_is_persisted() {
    let path = temp_path("clear");
    let store = FilePersistence::open(&path);
    store.set(TOKEN_KEY, "abc");
    store.clear();
    let reopened = FilePersistence::open(&path);
    assert!(reopened.get(TOKEN_KEY).is_none());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn file_corrupt_contents_start_empty() {
    let path = temp_path("corrupt");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "][").unwrap();
    let store = FilePersistence::open(&path);
    assert!(store.get(TOKEN_KEY).is_none());
    store.set(TOKEN_KEY, "fresh");
    assert_eq!(FilePersistence::open(&path).get(TOKEN_KEY).as_deref(), Some("fresh"));
    let _ = std::fs::remove_file(&path);
}
