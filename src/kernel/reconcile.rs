//! Reconciliation of external filesystem changes with open tabs.
//!
//! Policy per changed path:
//! - no open tab: only the navigation panel cares;
//! - clean tab: re-read and silently reload;
//! - dirty tab: keep the unsaved edits, flag the tab as conflicted;
//! - tab with a save in flight: the change is our own write, nothing to do.
//!
//! Reads are asynchronous. A reload is applied only if, on completion, the
//! workspace generation is unchanged, the tab still holds the same path, the
//! request is the newest issued for that tab and the tab is still clean.

use std::path::{Path, PathBuf};

use crate::kernel::services::ports::FileError;

use super::effect::Effect;
use super::state::{AppState, Signal};
use super::store::DispatchResult;
use super::tabs::{DiskState, ReloadCause, ReloadRequest, ReloadVerdict, TabId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn new(path: PathBuf, kind: ChangeKind) -> Self {
        Self { path, kind }
    }

    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), ChangeKind::Modified)
    }
}

/// Drops every cached listing and asks for the root and expanded directories
/// again. Cheaper to over-invalidate than to reason about ancestry.
pub fn refresh_dir_cache(state: &mut AppState) -> DispatchResult {
    let Some(root) = state.workspace.root().map(Path::to_path_buf) else {
        return DispatchResult::unchanged();
    };
    let generation = state.workspace.generation();
    let mut result = DispatchResult::changed(true);
    for (path, request_id) in state.dir_cache.invalidate(&root) {
        result.effects.push(Effect::LoadDir {
            path,
            generation,
            request_id,
        });
    }
    result
}

/// Asks for a fresh recursive markdown listing; `None` without a workspace.
pub fn refresh_markdown_index(state: &mut AppState) -> Option<Effect> {
    let root = state.workspace.root()?.to_path_buf();
    Some(Effect::IndexMarkdownFiles {
        root,
        generation: state.workspace.generation(),
        request_id: state.markdown_index.request(),
    })
}

pub fn on_file_changed(state: &mut AppState, change: &FileChange) -> DispatchResult {
    let mut result = refresh_dir_cache(state);
    if change.kind != ChangeKind::Modified {
        result.effects.extend(refresh_markdown_index(state));
    }

    let Some((tab_id, dirty, saving)) = state
        .tabs
        .find_by_path(&change.path)
        .map(|tab| (tab.id(), tab.is_dirty(), tab.is_saving()))
    else {
        return result;
    };

    if saving && change.kind != ChangeKind::Removed {
        tracing::debug!(path = %change.path.display(), "change during save treated as its echo");
        return result;
    }

    if dirty {
        let (disk_state, signal) = match change.kind {
            ChangeKind::Removed => (
                DiskState::MissingOnDisk,
                Signal::DiskFileMissing {
                    tab_id,
                    path: change.path.clone(),
                },
            ),
            ChangeKind::Created | ChangeKind::Modified => (
                DiskState::Conflict,
                Signal::ConflictDetected {
                    tab_id,
                    path: change.path.clone(),
                },
            ),
        };
        tracing::info!(
            path = %change.path.display(),
            ?disk_state,
            "external change on dirty tab left unresolved"
        );
        if state.tabs.set_disk_state(tab_id, disk_state) {
            result.state_changed = true;
            result.signals.push(signal);
        }
        return result;
    }

    let generation = state.workspace.generation();
    if let Some(request) = state
        .tabs
        .issue_reload(tab_id, generation, ReloadCause::ExternalChange)
    {
        tracing::debug!(
            path = %request.path.display(),
            request_id = request.request_id,
            "reload requested"
        );
        result.effects.push(Effect::ReloadFile(request));
    }
    result
}

pub fn on_file_reloaded(
    state: &mut AppState,
    request: ReloadRequest,
    result: Result<String, FileError>,
) -> DispatchResult {
    if !state.workspace.is_current(request.generation) {
        tracing::debug!(path = %request.path.display(), "discarding reload from previous workspace");
        return DispatchResult::unchanged();
    }

    let content = match result {
        Ok(content) => content,
        Err(err) => return on_reload_failed(state, &request, err),
    };

    let tab_id = request.tab_id;
    match state.tabs.judge_reload(&request) {
        None => {
            tracing::debug!(path = %request.path.display(), "reload target closed");
            DispatchResult::unchanged()
        }
        Some(ReloadVerdict::Superseded) => {
            tracing::debug!(
                path = %request.path.display(),
                request_id = request.request_id,
                "discarding superseded reload"
            );
            DispatchResult::unchanged()
        }
        Some(ReloadVerdict::BecameDirty) => {
            let mut result = DispatchResult::changed(
                state.tabs.set_disk_state(tab_id, DiskState::Conflict),
            );
            if result.state_changed {
                result.signals.push(Signal::ConflictDetected {
                    tab_id,
                    path: request.path,
                });
            }
            result
        }
        Some(ReloadVerdict::Apply) => {
            DispatchResult::changed(state.tabs.reload_content(tab_id, &content))
        }
    }
}

fn on_reload_failed(state: &mut AppState, request: &ReloadRequest, err: FileError) -> DispatchResult {
    match state.tabs.judge_failed_reload(request) {
        Some(ReloadVerdict::Apply) => {}
        Some(_) => {
            tracing::debug!(
                path = %request.path.display(),
                request_id = request.request_id,
                error = %err,
                "discarding superseded reload failure"
            );
            return DispatchResult::unchanged();
        }
        None => return DispatchResult::unchanged(),
    }

    tracing::warn!(path = %request.path.display(), error = %err, "background reload failed");
    let tab_id = request.tab_id;
    if !err.is_not_found() || !state.tabs.set_disk_state(tab_id, DiskState::MissingOnDisk) {
        return DispatchResult::unchanged();
    }
    DispatchResult::changed(true).with_signal(Signal::DiskFileMissing {
        tab_id,
        path: request.path.clone(),
    })
}

/// User chose the disk version: re-read even though the tab is dirty.
pub fn accept_disk_version(state: &mut AppState, tab_id: TabId) -> DispatchResult {
    let generation = state.workspace.generation();
    match state
        .tabs
        .issue_reload(tab_id, generation, ReloadCause::AcceptDiskVersion)
    {
        Some(request) => DispatchResult::unchanged().with_effect(Effect::ReloadFile(request)),
        None => DispatchResult::unchanged(),
    }
}

/// User chose the in-memory version: drop the conflict flag and keep the tab
/// dirty so the next save overwrites the disk.
pub fn keep_memory_version(state: &mut AppState, tab_id: TabId) -> DispatchResult {
    let conflicted = state
        .tabs
        .get(tab_id)
        .is_some_and(|tab| tab.disk_state() == DiskState::Conflict);
    if !conflicted {
        return DispatchResult::unchanged();
    }
    DispatchResult::changed(state.tabs.set_disk_state(tab_id, DiskState::InSync))
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/reconcile.rs"]
mod tests;
