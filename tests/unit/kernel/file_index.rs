use super::*;
use std::path::PathBuf;

fn file(path: &str) -> DirEntry {
    let path = PathBuf::from(path);
    DirEntry {
        name: path.file_name().unwrap().to_string_lossy().to_string(),
        path,
        is_dir: false,
        is_markdown: true,
    }
}

#[test]
fn only_latest_request_fills_the_index() {
    let mut index = MarkdownIndex::new();
    let first = index.request();
    let second = index.request();

    assert!(!index.apply(first, vec![file("/w/old.md")]));
    assert!(index.is_indexing());
    assert!(index.apply(second, vec![file("/w/new.md")]));
    assert!(!index.is_indexing());
    assert!(!index.apply(second, Vec::new()));

    assert_eq!(index.files().len(), 1);
    assert_eq!(index.files()[0].name, "new.md");
}

#[test]
fn matching_is_case_insensitive_on_names() {
    let mut index = MarkdownIndex::new();
    let request = index.request();
    index.apply(
        request,
        vec![file("/w/README.md"), file("/w/notes/readme-old.md"), file("/w/todo.md")],
    );

    let names: Vec<&str> = index
        .matching("ReadMe")
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["README.md", "readme-old.md"]);
    assert_eq!(index.matching("  ").len(), 3);
    assert!(index.matching("zzz").is_empty());
}

#[test]
fn clear_drops_files_and_pending_request() {
    let mut index = MarkdownIndex::new();
    let request = index.request();
    assert!(index.clear());
    assert!(!index.apply(request, vec![file("/w/a.md")]));
    assert!(index.files().is_empty());
    assert!(!index.clear());
}
