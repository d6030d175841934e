use super::*;
use crate::kernel::services::ports::{Preferences, WorkspaceConfig};
use crate::kernel::tabs::display_name_for;

fn workspace() -> AppState {
    let mut state = AppState::new(WorkspaceConfig::default(), Preferences::default());
    state.workspace.set(Some(PathBuf::from("/w")));
    state
}

fn open(state: &mut AppState, path: &str, content: &str) -> TabId {
    let path = PathBuf::from(path);
    let name = display_name_for(&path);
    state.tabs.open_tab(path, name, content).0
}

fn reload_request(result: &DispatchResult) -> ReloadRequest {
    result
        .effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ReloadFile(request) => Some(request.clone()),
            _ => None,
        })
        .expect("reload requested")
}

fn content(state: &AppState, id: TabId) -> &str {
    state.tabs.get(id).unwrap().content()
}

#[test]
fn clean_tab_reloads_and_dirty_tab_is_flagged() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "old");
    let b = open(&mut state, "/w/b.md", "old b");
    state.tabs.update_content(b, "local edit");

    let result = on_file_changed(&mut state, &FileChange::modified("/w/a.md"));
    let request = reload_request(&result);
    assert_eq!(request.tab_id, a);
    assert_eq!(request.cause, ReloadCause::ExternalChange);

    let applied = on_file_reloaded(&mut state, request, Ok("new".to_string()));
    assert!(applied.state_changed);
    assert_eq!(content(&state, a), "new");
    assert!(!state.tabs.get(a).unwrap().is_dirty());

    let result = on_file_changed(&mut state, &FileChange::modified("/w/b.md"));
    assert!(!result
        .effects
        .iter()
        .any(|effect| matches!(effect, Effect::ReloadFile(_))));
    assert_eq!(
        result.signals,
        vec![Signal::ConflictDetected {
            tab_id: b,
            path: PathBuf::from("/w/b.md"),
        }]
    );
    assert_eq!(content(&state, b), "local edit");
    assert!(state.tabs.get(b).unwrap().is_dirty());
    assert_eq!(state.tabs.get(b).unwrap().disk_state(), DiskState::Conflict);
}

#[test]
fn every_change_relists_root_and_expanded_dirs() {
    let mut state = workspace();
    state.dir_cache.expand(Path::new("/w/notes"));

    let result = on_file_changed(&mut state, &FileChange::modified("/w/untracked.md"));
    let cache = &state.dir_cache;
    assert_eq!(
        result.effects,
        vec![
            Effect::LoadDir {
                path: PathBuf::from("/w"),
                generation: state.workspace.generation(),
                request_id: cache.pending_request(Path::new("/w")).unwrap(),
            },
            Effect::LoadDir {
                path: PathBuf::from("/w/notes"),
                generation: state.workspace.generation(),
                request_id: cache.pending_request(Path::new("/w/notes")).unwrap(),
            },
        ]
    );
    assert!(result.signals.is_empty());
}

#[test]
fn older_read_never_overwrites_newer_one() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "v0");

    let first = reload_request(&on_file_changed(&mut state, &FileChange::modified("/w/a.md")));
    let second = reload_request(&on_file_changed(&mut state, &FileChange::modified("/w/a.md")));
    assert!(second.request_id > first.request_id);

    on_file_reloaded(&mut state, second, Ok("v2".to_string()));
    let late = on_file_reloaded(&mut state, first, Ok("v1".to_string()));

    assert!(!late.state_changed);
    assert_eq!(content(&state, a), "v2");
}

#[test]
fn reload_from_previous_workspace_is_discarded() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "old");
    let request = reload_request(&on_file_changed(&mut state, &FileChange::modified("/w/a.md")));

    state.workspace.set(Some(PathBuf::from("/elsewhere")));
    let result = on_file_reloaded(&mut state, request, Ok("new".to_string()));

    assert!(!result.state_changed);
    assert_eq!(content(&state, a), "old");
}

#[test]
fn edit_during_read_wins_and_flags_conflict() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "old");
    let request = reload_request(&on_file_changed(&mut state, &FileChange::modified("/w/a.md")));

    state.tabs.update_content(a, "typed meanwhile");
    let result = on_file_reloaded(&mut state, request, Ok("disk".to_string()));

    assert!(result.state_changed);
    assert_eq!(content(&state, a), "typed meanwhile");
    assert_eq!(state.tabs.get(a).unwrap().disk_state(), DiskState::Conflict);
    assert!(matches!(
        result.signals.as_slice(),
        [Signal::ConflictDetected { tab_id, .. }] if *tab_id == a
    ));
}

#[test]
fn duplicate_notification_with_same_content_is_idempotent() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "same");
    let request = reload_request(&on_file_changed(&mut state, &FileChange::modified("/w/a.md")));

    let result = on_file_reloaded(&mut state, request, Ok("same".to_string()));
    assert!(!result.state_changed);
    assert_eq!(content(&state, a), "same");
}

#[test]
fn removed_clean_file_is_marked_missing_after_failed_read() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "kept");
    let change = FileChange::new(PathBuf::from("/w/a.md"), ChangeKind::Removed);
    let request = reload_request(&on_file_changed(&mut state, &change));

    let error = FileError::NotFound(PathBuf::from("/w/a.md"));
    let result = on_file_reloaded(&mut state, request, Err(error));

    assert!(result.state_changed);
    let tab = state.tabs.get(a).unwrap();
    assert_eq!(tab.disk_state(), DiskState::MissingOnDisk);
    assert_eq!(tab.content(), "kept");
    assert!(!tab.is_dirty());
    assert!(matches!(
        result.signals.as_slice(),
        [Signal::DiskFileMissing { .. }]
    ));
}

#[test]
fn other_read_failures_leave_tab_untouched() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "kept");
    let request = reload_request(&on_file_changed(&mut state, &FileChange::modified("/w/a.md")));

    let error = FileError::PermissionDenied(PathBuf::from("/w/a.md"));
    let result = on_file_reloaded(&mut state, request, Err(error));

    assert!(!result.state_changed);
    assert_eq!(state.tabs.get(a).unwrap().disk_state(), DiskState::InSync);
}

#[test]
fn removed_dirty_file_is_marked_missing_without_reading() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "old");
    state.tabs.update_content(a, "unsaved");

    let change = FileChange::new(PathBuf::from("/w/a.md"), ChangeKind::Removed);
    let result = on_file_changed(&mut state, &change);

    assert!(!result
        .effects
        .iter()
        .any(|effect| matches!(effect, Effect::ReloadFile(_))));
    let tab = state.tabs.get(a).unwrap();
    assert_eq!(tab.disk_state(), DiskState::MissingOnDisk);
    assert_eq!(tab.content(), "unsaved");
}

#[test]
fn accepting_disk_version_overwrites_dirty_content() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "old");
    state.tabs.update_content(a, "unsaved");
    on_file_changed(&mut state, &FileChange::modified("/w/a.md"));

    let request = reload_request(&accept_disk_version(&mut state, a));
    assert_eq!(request.cause, ReloadCause::AcceptDiskVersion);
    on_file_reloaded(&mut state, request, Ok("from disk".to_string()));

    let tab = state.tabs.get(a).unwrap();
    assert_eq!(tab.content(), "from disk");
    assert!(!tab.is_dirty());
    assert_eq!(tab.disk_state(), DiskState::InSync);
}

#[test]
fn keeping_memory_version_clears_flag_only() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "old");
    state.tabs.update_content(a, "unsaved");
    on_file_changed(&mut state, &FileChange::modified("/w/a.md"));

    assert!(keep_memory_version(&mut state, a).state_changed);
    assert!(!keep_memory_version(&mut state, a).state_changed);

    let tab = state.tabs.get(a).unwrap();
    assert_eq!(tab.disk_state(), DiskState::InSync);
    assert!(tab.is_dirty());
    assert_eq!(tab.content(), "unsaved");
}

#[test]
fn reload_for_closed_tab_is_ignored() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "old");
    let request = reload_request(&on_file_changed(&mut state, &FileChange::modified("/w/a.md")));
    state.tabs.close_tab(a);

    let result = on_file_reloaded(&mut state, request, Ok("new".to_string()));
    assert!(!result.state_changed);
    assert!(state.tabs.is_empty());
}

#[test]
fn late_failure_of_older_read_does_not_undo_newer_reload() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "original");

    let removed = FileChange::new(PathBuf::from("/w/a.md"), ChangeKind::Removed);
    let created = FileChange::new(PathBuf::from("/w/a.md"), ChangeKind::Created);
    let older = reload_request(&on_file_changed(&mut state, &removed));
    let newer = reload_request(&on_file_changed(&mut state, &created));

    on_file_reloaded(&mut state, newer, Ok("recreated".to_string()));
    let late = on_file_reloaded(
        &mut state,
        older,
        Err(FileError::NotFound(PathBuf::from("/w/a.md"))),
    );

    assert!(!late.state_changed);
    assert!(late.signals.is_empty());
    let tab = state.tabs.get(a).unwrap();
    assert_eq!(tab.disk_state(), DiskState::InSync);
    assert_eq!(tab.content(), "recreated");
}

#[test]
fn early_failure_of_older_read_is_ignored_too() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "original");

    let removed = FileChange::new(PathBuf::from("/w/a.md"), ChangeKind::Removed);
    let created = FileChange::new(PathBuf::from("/w/a.md"), ChangeKind::Created);
    let older = reload_request(&on_file_changed(&mut state, &removed));
    let newer = reload_request(&on_file_changed(&mut state, &created));

    let early = on_file_reloaded(
        &mut state,
        older,
        Err(FileError::NotFound(PathBuf::from("/w/a.md"))),
    );
    assert!(!early.state_changed);

    on_file_reloaded(&mut state, newer, Ok("recreated".to_string()));
    assert_eq!(state.tabs.get(a).unwrap().disk_state(), DiskState::InSync);
    assert_eq!(content(&state, a), "recreated");
}

#[test]
fn change_during_save_is_treated_as_echo() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "old");
    state.tabs.update_content(a, "edited");
    state.tabs.begin_write(a);

    let result = on_file_changed(&mut state, &FileChange::modified("/w/a.md"));

    assert!(result.signals.is_empty());
    assert!(!result
        .effects
        .iter()
        .any(|effect| matches!(effect, Effect::ReloadFile(_))));
    assert_eq!(state.tabs.get(a).unwrap().disk_state(), DiskState::InSync);
}

#[test]
fn removal_during_save_is_still_reported() {
    let mut state = workspace();
    let a = open(&mut state, "/w/a.md", "old");
    state.tabs.update_content(a, "edited");
    state.tabs.begin_write(a);

    let change = FileChange::new(PathBuf::from("/w/a.md"), ChangeKind::Removed);
    let result = on_file_changed(&mut state, &change);

    assert!(matches!(
        result.signals.as_slice(),
        [Signal::DiskFileMissing { .. }]
    ));
    assert_eq!(
        state.tabs.get(a).unwrap().disk_state(),
        DiskState::MissingOnDisk
    );
}

#[test]
fn created_or_removed_files_refresh_markdown_index() {
    let mut state = workspace();
    let is_index = |effect: &Effect| matches!(effect, Effect::IndexMarkdownFiles { .. });

    let edited = on_file_changed(&mut state, &FileChange::modified("/w/a.md"));
    assert!(!edited.effects.iter().any(is_index));

    let created = FileChange::new(PathBuf::from("/w/new.md"), ChangeKind::Created);
    let result = on_file_changed(&mut state, &created);
    assert!(result.effects.iter().any(is_index));
    assert!(state.markdown_index.is_indexing());

    let removed = FileChange::new(PathBuf::from("/w/new.md"), ChangeKind::Removed);
    assert!(on_file_changed(&mut state, &removed).effects.iter().any(is_index));
}
