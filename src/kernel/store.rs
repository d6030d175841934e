use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::core::Command;
use crate::kernel::services::ports::preferences::{
    clamp_sidebar_width, single_patch, SIDEBAR_WIDTH_KEY, VIEW_MODE_KEY,
};
use crate::kernel::services::ports::{DirEntry, FileError, FileFilter, PreferenceMap, ViewMode};

use super::focus::FocusZone;
use super::palette;
use super::reconcile;
use super::state::{Notification, Signal};
use super::tabs::{display_name_for, TabId};
use super::{Action, AppState, Effect};

mod observers;

pub use observers::SubscriptionId;
use observers::Observers;

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub signals: Vec<Signal>,
    pub state_changed: bool,
}

impl DispatchResult {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn changed(state_changed: bool) -> Self {
        Self {
            state_changed,
            ..Self::default()
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }

    pub fn absorb(&mut self, other: DispatchResult) {
        self.state_changed |= other.state_changed;
        self.effects.extend(other.effects);
        self.signals.extend(other.signals);
    }
}

/// Single writer for [`AppState`]. Every mutation goes through
/// [`Store::dispatch`], which notifies each observer exactly once.
#[derive(Debug)]
pub struct Store {
    state: AppState,
    observers: Observers,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            observers: Observers::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        let searched = self.searched_document();
        let mut result = self.reduce(action);
        result.state_changed |= self.sync_search(searched);

        if !self.observers.is_empty() {
            let notification = Notification {
                snapshot: self.state.snapshot(),
                signals: result.signals.clone(),
            };
            self.observers.notify(&notification);
        }
        result
    }

    fn searched_document(&self) -> Option<(TabId, Arc<str>)> {
        self.state
            .tabs
            .active()
            .map(|tab| (tab.id(), tab.shared_content()))
    }

    /// Re-indexes the search session when the active document or its content
    /// changed during the dispatch.
    fn sync_search(&mut self, before: Option<(TabId, Arc<str>)>) -> bool {
        let after = self.searched_document();
        let same = match (&before, &after) {
            (Some((a_id, a_text)), Some((b_id, b_text))) => {
                a_id == b_id && Arc::ptr_eq(a_text, b_text)
            }
            (None, None) => true,
            _ => false,
        };
        if same {
            return false;
        }
        let text = after.as_ref().map(|(_, text)| &**text);
        self.state.search.set_text(text)
    }

    fn reduce(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::RunCommand(command) => self.dispatch_command(command),
            Action::SetWorkspace(root) => self.set_workspace(root),
            Action::OpenPath(path) => self.open_path(path),
            Action::OpenDropped(path) => {
                let generation = self.state.workspace.generation();
                DispatchResult::unchanged().with_effect(Effect::InspectPath { path, generation })
            }
            Action::PathInspected {
                path,
                generation,
                result,
            } => self.path_inspected(path, generation, result),
            Action::OpenTab {
                path,
                name,
                content,
            } => {
                let (_, changed) = self.state.tabs.open_tab(path, name, &content);
                DispatchResult::changed(changed)
            }
            Action::FileLoaded {
                path,
                generation,
                result,
            } => self.file_loaded(path, generation, result),
            Action::CloseTab(tab_id) => DispatchResult::changed(self.state.tabs.close_tab(tab_id)),
            Action::SelectTab(tab_id) => {
                DispatchResult::changed(self.state.tabs.select_tab(tab_id))
            }
            Action::MoveTab { tab_id, to_index } => {
                DispatchResult::changed(self.state.tabs.move_tab(tab_id, to_index))
            }
            Action::NextTab => DispatchResult::changed(self.state.tabs.next_tab()),
            Action::PrevTab => DispatchResult::changed(self.state.tabs.prev_tab()),
            Action::UpdateContent { tab_id, text } => {
                DispatchResult::changed(self.state.tabs.update_content(tab_id, &text))
            }
            Action::SaveTab(tab_id) => self.save_tab(tab_id),
            Action::Saved {
                tab_id,
                path,
                generation,
                edit_version,
                result,
            } => self.saved(tab_id, path, generation, edit_version, result),
            Action::FileChanged(change) => reconcile::on_file_changed(&mut self.state, &change),
            Action::FileReloaded { request, result } => {
                reconcile::on_file_reloaded(&mut self.state, request, result)
            }
            Action::AcceptDiskVersion(tab_id) => {
                reconcile::accept_disk_version(&mut self.state, tab_id)
            }
            Action::KeepMemoryVersion(tab_id) => {
                reconcile::keep_memory_version(&mut self.state, tab_id)
            }
            Action::SetViewMode(mode) => self.set_view_mode(mode),
            Action::SetEditEnabled(enabled) => self.set_edit_enabled(enabled),
            Action::SetFocusZone(zone) => self.set_focus_zone(zone),
            Action::CycleFocusZone => {
                let zone = self.state.ui.focus.cycle();
                DispatchResult::changed(true).with_signal(Signal::FocusMoved(zone))
            }
            Action::SetSidebarWidth(width) => self.set_sidebar_width(width),
            Action::DismissError => {
                DispatchResult::changed(self.state.ui.last_error.take().is_some())
            }
            Action::SearchSetQuery(query) => {
                let shown = self.state.search.show();
                let text = self.state.tabs.active().map(|tab| tab.content());
                let requeried = self.state.search.set_query(&query, text);
                DispatchResult::changed(shown || requeried)
            }
            Action::SearchNext => DispatchResult::changed(self.state.search.go_to_next()),
            Action::SearchPrev => DispatchResult::changed(self.state.search.go_to_prev()),
            Action::SearchClose => DispatchResult::changed(self.state.search.hide()),
            Action::PaletteSetQuery(query) => {
                let cp = &mut self.state.ui.command_palette;
                if !cp.visible || cp.query == query {
                    return DispatchResult::unchanged();
                }
                cp.query = query;
                cp.selected = 0;
                DispatchResult::changed(true)
            }
            Action::PaletteMoveSelection(delta) => {
                let cp = &mut self.state.ui.command_palette;
                if !cp.visible || delta == 0 {
                    return DispatchResult::unchanged();
                }
                let last = palette::match_indices(&cp.query)
                    .len()
                    .saturating_sub(1);
                let prev = cp.selected;
                cp.selected = if delta > 0 {
                    prev.saturating_add(delta.unsigned_abs()).min(last)
                } else {
                    prev.saturating_sub(delta.unsigned_abs())
                };
                DispatchResult::changed(cp.selected != prev)
            }
            Action::PaletteConfirm => {
                let cp = &mut self.state.ui.command_palette;
                if !cp.visible {
                    return DispatchResult::unchanged();
                }
                let command = palette::selected_command(&cp.query, cp.selected);
                cp.reset();

                let mut result = DispatchResult::changed(true);
                if let Some(command) = command {
                    result.absorb(self.dispatch_command(command));
                }
                result
            }
            Action::PaletteClose => {
                let cp = &mut self.state.ui.command_palette;
                if !cp.visible {
                    return DispatchResult::unchanged();
                }
                cp.reset();
                DispatchResult::changed(true)
            }
            Action::ExplorerToggleDir(dir) => self.toggle_dir(dir),
            Action::MarkdownFilesListed {
                generation,
                request_id,
                result,
            } => {
                if !self.state.workspace.is_current(generation) {
                    return DispatchResult::unchanged();
                }
                let files = result.unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "markdown index failed");
                    Vec::new()
                });
                DispatchResult::changed(self.state.markdown_index.apply(request_id, files))
            }
            Action::DirLoaded {
                path,
                generation,
                request_id,
                result,
            } => {
                if !self.state.workspace.is_current(generation) {
                    return DispatchResult::unchanged();
                }
                let changed = match result {
                    Ok(entries) => self.state.dir_cache.apply_listing(path, request_id, entries),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "directory listing failed");
                        self.state.dir_cache.apply_error(path, request_id)
                    }
                };
                DispatchResult::changed(changed)
            }
        }
    }

    fn dispatch_command(&mut self, command: Command) -> DispatchResult {
        let active = self.state.tabs.active_id();
        match command {
            Command::OpenFolder => DispatchResult::unchanged().with_effect(Effect::PickFolder),
            Command::OpenFile => {
                DispatchResult::unchanged().with_effect(Effect::PickFile(FileFilter::markdown()))
            }
            Command::RefreshExplorer => {
                let mut result = reconcile::refresh_dir_cache(&mut self.state);
                result
                    .effects
                    .extend(reconcile::refresh_markdown_index(&mut self.state));
                result
            }
            Command::Save => match active {
                Some(tab_id) => self.save_tab(tab_id),
                None => DispatchResult::unchanged(),
            },
            Command::CloseTab => match active {
                Some(tab_id) => DispatchResult::changed(self.state.tabs.close_tab(tab_id)),
                None => DispatchResult::unchanged(),
            },
            Command::NextTab => DispatchResult::changed(self.state.tabs.next_tab()),
            Command::PrevTab => DispatchResult::changed(self.state.tabs.prev_tab()),
            Command::ReloadFromDisk => match active {
                Some(tab_id) => reconcile::accept_disk_version(&mut self.state, tab_id),
                None => DispatchResult::unchanged(),
            },
            Command::KeepLocalVersion => match active {
                Some(tab_id) => reconcile::keep_memory_version(&mut self.state, tab_id),
                None => DispatchResult::unchanged(),
            },
            Command::Find => DispatchResult::changed(self.state.search.show()),
            Command::FindNext => DispatchResult::changed(self.state.search.go_to_next()),
            Command::FindPrev => DispatchResult::changed(self.state.search.go_to_prev()),
            Command::CycleFocus => {
                let zone = self.state.ui.focus.cycle();
                DispatchResult::changed(true).with_signal(Signal::FocusMoved(zone))
            }
            Command::FocusNavigation => self.set_focus_zone(FocusZone::Navigation),
            Command::FocusTabStrip => self.set_focus_zone(FocusZone::TabStrip),
            Command::FocusDocument => self.set_focus_zone(FocusZone::Document),
            Command::ViewSource => self.set_view_mode(ViewMode::Source),
            Command::ViewPreview => self.set_view_mode(ViewMode::Preview),
            Command::ViewSplit => self.set_view_mode(ViewMode::Split),
            Command::ViewDirectEdit => self.set_view_mode(ViewMode::DirectEdit),
            Command::ToggleEdit => {
                let enabled = !self.state.ui.edit_enabled;
                self.set_edit_enabled(enabled)
            }
            Command::CommandPalette => {
                let cp = &mut self.state.ui.command_palette;
                let visible = !cp.visible;
                cp.reset();
                cp.visible = visible;
                DispatchResult::changed(true)
            }
        }
    }

    fn set_workspace(&mut self, root: Option<PathBuf>) -> DispatchResult {
        let generation = self.state.workspace.set(root.clone());
        tracing::info!(root = ?root, generation, "workspace changed");

        self.state.tabs.clear();
        self.state.dir_cache.clear();
        self.state.markdown_index.clear();
        self.state.search.clear();
        self.state.ui.last_error = None;

        let mut result = DispatchResult::changed(true);
        match root {
            Some(root) => {
                result.effects.push(Effect::WatchWorkspace(root.clone()));
                if let Some(request_id) = self.state.dir_cache.request_load(&root) {
                    result.effects.push(Effect::LoadDir {
                        path: root,
                        generation,
                        request_id,
                    });
                }
                result
                    .effects
                    .extend(reconcile::refresh_markdown_index(&mut self.state));
            }
            None => result.effects.push(Effect::UnwatchWorkspace),
        }
        result
    }

    fn open_path(&mut self, path: PathBuf) -> DispatchResult {
        if let Some(tab_id) = self.state.tabs.find_by_path(&path).map(|tab| tab.id()) {
            return DispatchResult::changed(self.state.tabs.select_tab(tab_id));
        }
        let generation = self.state.workspace.generation();
        DispatchResult::unchanged().with_effect(Effect::LoadFile { path, generation })
    }

    fn path_inspected(
        &mut self,
        path: PathBuf,
        generation: u64,
        result: Result<DirEntry, FileError>,
    ) -> DispatchResult {
        if !self.state.workspace.is_current(generation) {
            tracing::debug!(path = %path.display(), "discarding drop from previous workspace");
            return DispatchResult::unchanged();
        }
        let error = match result {
            Ok(entry) if entry.is_dir => return self.set_workspace(Some(path)),
            Ok(entry) if entry.is_markdown => return self.open_path(path),
            Ok(_) => FileError::Io {
                path: path.clone(),
                message: "not a markdown document".to_string(),
            },
            Err(error) => error,
        };
        tracing::warn!(path = %path.display(), %error, "dropped path refused");
        self.state.ui.last_error = Some(format!("Could not open {}: {}", path.display(), error));
        DispatchResult::changed(true).with_signal(Signal::OpenFailed { path, error })
    }

    fn file_loaded(
        &mut self,
        path: PathBuf,
        generation: u64,
        result: Result<String, FileError>,
    ) -> DispatchResult {
        if !self.state.workspace.is_current(generation) {
            tracing::debug!(path = %path.display(), "discarding open from previous workspace");
            return DispatchResult::unchanged();
        }
        match result {
            Ok(content) => {
                let name = display_name_for(&path);
                let (_, changed) = self.state.tabs.open_tab(path, name, &content);
                DispatchResult::changed(changed)
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "open failed");
                self.state.ui.last_error =
                    Some(format!("Could not open {}: {}", path.display(), error));
                DispatchResult::changed(true).with_signal(Signal::OpenFailed { path, error })
            }
        }
    }

    fn save_tab(&mut self, tab_id: TabId) -> DispatchResult {
        let generation = self.state.workspace.generation();
        let Some(tab) = self.state.tabs.get(tab_id) else {
            return DispatchResult::unchanged();
        };
        let effect = Effect::WriteFile {
            tab_id,
            path: tab.path().to_path_buf(),
            content: tab.shared_content(),
            generation,
            edit_version: tab.edit_version(),
        };
        DispatchResult::changed(self.state.tabs.begin_write(tab_id)).with_effect(effect)
    }

    fn saved(
        &mut self,
        tab_id: TabId,
        path: PathBuf,
        generation: u64,
        edit_version: u64,
        result: Result<(), FileError>,
    ) -> DispatchResult {
        if !self.state.workspace.is_current(generation) {
            return DispatchResult::unchanged();
        }
        let Some(current_version) = self
            .state
            .tabs
            .get(tab_id)
            .filter(|tab| tab.path() == path)
            .map(|tab| tab.edit_version())
        else {
            return DispatchResult::unchanged();
        };
        let mut changed = self.state.tabs.finish_write(tab_id);

        match result {
            Ok(()) if current_version == edit_version => {
                tracing::info!(path = %path.display(), "saved");
                changed |= self.state.tabs.mark_saved(tab_id);
                DispatchResult::changed(changed)
            }
            Ok(()) => {
                tracing::debug!(path = %path.display(), "saved, but edited since; staying dirty");
                DispatchResult::changed(changed)
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "save failed");
                self.state.ui.last_error =
                    Some(format!("Could not save {}: {}", path.display(), error));
                DispatchResult::changed(true).with_signal(Signal::SaveFailed { tab_id, error })
            }
        }
    }

    fn set_view_mode(&mut self, mode: ViewMode) -> DispatchResult {
        let ui = &mut self.state.ui;
        let mut changed = ui.view_mode != mode;
        ui.view_mode = mode;
        if !mode.supports_edit_toggle() && ui.edit_enabled {
            ui.edit_enabled = false;
            changed = true;
        }
        if !changed {
            return DispatchResult::unchanged();
        }
        let mut result = DispatchResult::changed(true);
        if let Some(effect) =
            self.persist_preference(VIEW_MODE_KEY, Value::from(mode.as_str()))
        {
            result.effects.push(effect);
        }
        result
    }

    fn set_edit_enabled(&mut self, enabled: bool) -> DispatchResult {
        let ui = &mut self.state.ui;
        let enabled = enabled && ui.view_mode.supports_edit_toggle();
        if ui.edit_enabled == enabled {
            return DispatchResult::unchanged();
        }
        ui.edit_enabled = enabled;
        DispatchResult::changed(true)
    }

    fn set_focus_zone(&mut self, zone: FocusZone) -> DispatchResult {
        if !self.state.ui.focus.set_zone(zone) {
            return DispatchResult::unchanged();
        }
        DispatchResult::changed(true).with_signal(Signal::FocusMoved(zone))
    }

    fn set_sidebar_width(&mut self, width: u32) -> DispatchResult {
        let width = clamp_sidebar_width(width);
        if self.state.ui.sidebar_width == width {
            return DispatchResult::unchanged();
        }
        self.state.ui.sidebar_width = width;
        let mut result = DispatchResult::changed(true);
        if let Some(effect) = self.persist_preference(SIDEBAR_WIDTH_KEY, Value::from(width)) {
            result.effects.push(effect);
        }
        result
    }

    fn persist_preference(&mut self, key: &str, value: Value) -> Option<Effect> {
        let patch: PreferenceMap = single_patch(key, value);
        self.state
            .preferences
            .merge(&patch)
            .then_some(Effect::PersistPreferences(patch))
    }

    fn toggle_dir(&mut self, dir: PathBuf) -> DispatchResult {
        if self.state.dir_cache.collapse(&dir) {
            return DispatchResult::changed(true);
        }
        self.state.dir_cache.expand(&dir);
        let mut result = DispatchResult::changed(true);
        if let Some(request_id) = self.state.dir_cache.request_load(&dir) {
            result.effects.push(Effect::LoadDir {
                path: dir,
                generation: self.state.workspace.generation(),
                request_id,
            });
        }
        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
