use super::*;
use crate::kernel::services::adapters::file::LocalFileSystem;
use crate::kernel::services::adapters::preferences::JsonPreferenceStore;
use crate::kernel::services::ports::preferences::single_patch;
use crate::kernel::tabs::ReloadCause;
use serde_json::json;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tempfile::tempdir;

const TIMEOUT: Duration = Duration::from_secs(5);

fn runtime() -> (AsyncRuntime, mpsc::Receiver<AppMessage>) {
    let (tx, rx) = mpsc::channel();
    let runtime = AsyncRuntime::new(tx, Arc::new(LocalFileSystem::default()), None).unwrap();
    (runtime, rx)
}

#[test]
fn load_file_reports_content_with_generation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.md");
    std::fs::write(&path, "# A").unwrap();

    let (runtime, rx) = runtime();
    runtime.load_file(path.clone(), 7);

    match rx.recv_timeout(TIMEOUT).unwrap() {
        AppMessage::FileLoaded {
            path: loaded,
            generation,
            result,
        } => {
            assert_eq!(loaded, path);
            assert_eq!(generation, 7);
            assert_eq!(result.unwrap(), "# A");
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn reload_of_missing_file_reports_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gone.md");
    let request = ReloadRequest {
        tab_id: TabId::new(1),
        path: path.clone(),
        generation: 1,
        cause: ReloadCause::ExternalChange,
        request_id: 3,
    };

    let (runtime, rx) = runtime();
    runtime.reload_file(request.clone());

    match rx.recv_timeout(TIMEOUT).unwrap() {
        AppMessage::FileReloaded {
            request: echoed,
            result,
        } => {
            assert_eq!(echoed, request);
            assert_eq!(result, Err(FileError::NotFound(path)));
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn write_file_echoes_save_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.md");

    let (runtime, rx) = runtime();
    runtime.write_file(TabId::new(4), path.clone(), Arc::from("saved"), 2, 9);

    match rx.recv_timeout(TIMEOUT).unwrap() {
        AppMessage::FileSaved {
            tab_id,
            generation,
            edit_version,
            result,
            ..
        } => {
            assert_eq!(tab_id, TabId::new(4));
            assert_eq!((generation, edit_version), (2, 9));
            assert!(result.is_ok());
        }
        other => panic!("unexpected message: {other:?}"),
    }
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "saved");
}

#[test]
fn load_dir_lists_entries() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("a.md"), "").unwrap();

    let (runtime, rx) = runtime();
    runtime.load_dir(dir.path().to_path_buf(), 1, 7);

    match rx.recv_timeout(TIMEOUT).unwrap() {
        AppMessage::DirLoaded {
            request_id, result, ..
        } => {
            assert_eq!(request_id, 7);
            let names: Vec<String> = result.unwrap().into_iter().map(|e| e.name).collect();
            assert_eq!(names, vec!["sub".to_string(), "a.md".to_string()]);
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn index_markdown_files_walks_the_tree() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("sub").join("deep.md"), "").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "").unwrap();

    let (runtime, rx) = runtime();
    runtime.index_markdown_files(dir.path().to_path_buf(), 3, 2);

    match rx.recv_timeout(TIMEOUT).unwrap() {
        AppMessage::MarkdownFilesListed {
            generation,
            request_id,
            result,
        } => {
            assert_eq!((generation, request_id), (3, 2));
            let names: Vec<String> = result.unwrap().into_iter().map(|e| e.name).collect();
            assert_eq!(names, vec!["deep.md".to_string()]);
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn inspect_path_reports_kind() {
    let dir = tempdir().unwrap();

    let (runtime, rx) = runtime();
    runtime.inspect_path(dir.path().to_path_buf(), 4);

    match rx.recv_timeout(TIMEOUT).unwrap() {
        AppMessage::PathInspected {
            path,
            generation,
            result,
        } => {
            assert_eq!(path, dir.path());
            assert_eq!(generation, 4);
            assert!(result.unwrap().is_dir);
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn persist_preferences_merges_into_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let store = Arc::new(JsonPreferenceStore::new(path.clone()));
    let (tx, _rx) = mpsc::channel();
    let runtime = AsyncRuntime::new(tx, Arc::new(LocalFileSystem::default()), Some(store.clone()))
        .unwrap();

    runtime.persist_preferences(single_patch("sidebarWidth", json!(300)));

    let deadline = Instant::now() + TIMEOUT;
    while store.load().get("sidebarWidth").is_none() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(store.load().get("sidebarWidth"), Some(&json!(300)));
}
