use super::*;
use crate::kernel::services::ports::ViewMode;
use tempfile::tempdir;

#[test]
fn test_settings_path_layout() {
    let path = get_settings_path().unwrap();
    assert!(path.ends_with(Path::new(SETTINGS_DIR).join(SETTINGS_FILE)));
}

#[test]
fn test_ensure_writes_defaults_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join(SETTINGS_FILE);

    ensure_settings_file_at(&path).unwrap();
    assert_eq!(load_settings_from(&path), Some(Settings::default()));

    std::fs::write(&path, r#"{"default_view_mode":"split"}"#).unwrap();
    ensure_settings_file_at(&path).unwrap();

    let settings = load_settings_from(&path).unwrap();
    assert_eq!(settings.default_view_mode, ViewMode::Split);
    assert_eq!(settings.watcher_poll_ms, 250);
}

#[test]
fn test_malformed_settings_are_ignored() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE);
    std::fs::write(&path, "{ not json").unwrap();

    assert_eq!(load_settings_from(&path), None);
    assert_eq!(load_settings_from(&dir.path().join("missing.json")), None);
}
