use super::*;
use crate::kernel::services::ports::preferences::{single_patch, SIDEBAR_WIDTH_KEY};
use serde_json::json;
use tempfile::tempdir;

#[test]
fn test_missing_file_loads_empty() {
    let dir = tempdir().unwrap();
    let store = JsonPreferenceStore::new(dir.path().join("preferences.json"));
    assert!(store.load().is_empty());
}

#[test]
fn test_merge_keeps_existing_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app").join("preferences.json");
    let store = JsonPreferenceStore::new(path.clone());

    store.merge(&single_patch("theme", json!("dark"))).unwrap();
    let merged = store
        .merge(&single_patch(SIDEBAR_WIDTH_KEY, json!(320)))
        .unwrap();

    assert_eq!(merged.get("theme"), Some(&json!("dark")));
    assert_eq!(merged.get(SIDEBAR_WIDTH_KEY), Some(&json!(320)));

    let reloaded = JsonPreferenceStore::new(path).load();
    assert_eq!(reloaded, merged);
}

#[test]
fn test_merge_overwrites_same_key() {
    let dir = tempdir().unwrap();
    let store = JsonPreferenceStore::new(dir.path().join("preferences.json"));

    store.merge(&single_patch("viewMode", json!("source"))).unwrap();
    store.merge(&single_patch("viewMode", json!("split"))).unwrap();

    assert_eq!(store.load().get("viewMode"), Some(&json!("split")));
}

#[test]
fn test_corrupt_file_is_replaced_on_merge() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, "[1, 2").unwrap();
    let store = JsonPreferenceStore::new(path);

    assert!(store.load().is_empty());
    let merged = store.merge(&single_patch("theme", json!("light"))).unwrap();
    assert_eq!(merged.len(), 1);
}
