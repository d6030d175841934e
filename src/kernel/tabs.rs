//! Tab registry: the authoritative list of open documents.
//!
//! All mutation goes through [`TabRegistry`] methods; tabs expose read-only
//! accessors only. Every operation that names a tab id which is no longer open
//! is a silent no-op returning `false`, so callers racing with a close never
//! need an existence check first.

use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl TabId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tab#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiskState {
    #[default]
    InSync,
    /// The file changed on disk while the tab held unsaved edits.
    Conflict,
    MissingOnDisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadCause {
    ExternalChange,
    AcceptDiskVersion,
}

impl ReloadCause {
    pub fn allows_dirty_overwrite(self) -> bool {
        matches!(self, Self::AcceptDiskVersion)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadRequest {
    pub tab_id: TabId,
    pub path: PathBuf,
    pub generation: u64,
    pub cause: ReloadCause,
    pub request_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadVerdict {
    Apply,
    /// A newer request for the same tab was issued, or this one already ran.
    Superseded,
    /// The user started editing while the read was in flight.
    BecameDirty,
}

#[derive(Debug, Clone)]
pub struct DocumentTab {
    id: TabId,
    path: PathBuf,
    name: String,
    content: Arc<str>,
    dirty: bool,
    edit_version: u64,
    disk_state: DiskState,
    last_reload_request_id: u64,
    last_applied_reload_request_id: u64,
    writes_in_flight: u32,
}

impl DocumentTab {
    fn new(id: TabId, path: PathBuf, name: String, content: &str) -> Self {
        Self {
            id,
            path,
            name,
            content: Arc::from(content),
            dirty: false,
            edit_version: 0,
            disk_state: DiskState::InSync,
            last_reload_request_id: 0,
            last_applied_reload_request_id: 0,
            writes_in_flight: 0,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn shared_content(&self) -> Arc<str> {
        Arc::clone(&self.content)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn edit_version(&self) -> u64 {
        self.edit_version
    }

    pub fn disk_state(&self) -> DiskState {
        self.disk_state
    }

    /// A save for this tab was issued and has not completed yet. Changes to
    /// the file seen meanwhile are the echo of that write.
    pub fn is_saving(&self) -> bool {
        self.writes_in_flight > 0
    }

    pub fn display_title(&self) -> String {
        let prefix = match self.disk_state {
            DiskState::Conflict => "\u{26a0} ",
            DiskState::MissingOnDisk => "\u{2717} ",
            DiskState::InSync if self.dirty => "\u{25cf} ",
            DiskState::InSync => "",
        };
        format!("{}{}", prefix, self.name)
    }

    fn issue_reload_request(&mut self, generation: u64, cause: ReloadCause) -> ReloadRequest {
        self.last_reload_request_id = self.last_reload_request_id.saturating_add(1);
        ReloadRequest {
            tab_id: self.id,
            path: self.path.clone(),
            generation,
            cause,
            request_id: self.last_reload_request_id,
        }
    }

    fn is_superseded(&self, request: &ReloadRequest) -> bool {
        request.request_id < self.last_reload_request_id
            || request.request_id <= self.last_applied_reload_request_id
    }

    fn judge_reload(&mut self, request: &ReloadRequest) -> ReloadVerdict {
        if self.is_superseded(request) {
            return ReloadVerdict::Superseded;
        }
        if self.dirty && !request.cause.allows_dirty_overwrite() {
            return ReloadVerdict::BecameDirty;
        }
        self.last_applied_reload_request_id = request.request_id;
        ReloadVerdict::Apply
    }
}

pub fn display_name_for(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[derive(Debug)]
pub struct TabRegistry {
    tabs: Vec<DocumentTab>,
    active: Option<TabId>,
    next_tab_id: u64,
    open_paths_version: u64,
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TabRegistry {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_tab_id: 1,
            open_paths_version: 0,
        }
    }

    fn alloc_tab_id(&mut self) -> TabId {
        let id = TabId::new(self.next_tab_id);
        self.next_tab_id = self.next_tab_id.saturating_add(1);
        id
    }

    fn bump_open_paths(&mut self) {
        self.open_paths_version = self.open_paths_version.saturating_add(1);
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    fn tab_mut(&mut self, id: TabId) -> Option<&mut DocumentTab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn tabs(&self) -> &[DocumentTab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn get(&self, id: TabId) -> Option<&DocumentTab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn find_by_path(&self, path: &Path) -> Option<&DocumentTab> {
        self.tabs.iter().find(|t| t.path == path)
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active(&self) -> Option<&DocumentTab> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.and_then(|id| self.index_of(id))
    }

    /// Bumped whenever the set of open paths changes; the watcher re-syncs
    /// its fingerprints when it observes a new value.
    pub fn open_paths_version(&self) -> u64 {
        self.open_paths_version
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.tabs.iter().map(|t| t.path.as_path())
    }

    pub fn clear(&mut self) -> bool {
        let had_tabs = !self.tabs.is_empty() || self.active.is_some();
        self.tabs.clear();
        self.active = None;
        if had_tabs {
            self.bump_open_paths();
        }
        had_tabs
    }

    /// Opens `path`, or selects the tab that already has it open.
    ///
    /// An existing tab keeps its content: a second open never clobbers
    /// unsaved edits. Returns the tab id and whether anything changed.
    pub fn open_tab(&mut self, path: PathBuf, name: String, content: &str) -> (TabId, bool) {
        if let Some(existing) = self.find_by_path(&path).map(|t| t.id) {
            let changed = self.select_tab(existing);
            return (existing, changed);
        }

        let id = self.alloc_tab_id();
        self.tabs.push(DocumentTab::new(id, path, name, content));
        self.active = Some(id);
        self.bump_open_paths();
        (id, true)
    }

    /// Closing the active tab selects the tab that slides into its slot, or
    /// the new last tab, so repeated closes sweep predictably.
    pub fn close_tab(&mut self, id: TabId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.tabs.remove(index);
        self.bump_open_paths();

        if self.active == Some(id) {
            self.active = if self.tabs.is_empty() {
                None
            } else {
                let next = index.min(self.tabs.len() - 1);
                Some(self.tabs[next].id)
            };
        }
        true
    }

    pub fn select_tab(&mut self, id: TabId) -> bool {
        if self.index_of(id).is_none() || self.active == Some(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    pub fn update_content(&mut self, id: TabId, text: &str) -> bool {
        let Some(tab) = self.tab_mut(id) else {
            return false;
        };
        tab.content = Arc::from(text);
        tab.dirty = true;
        tab.edit_version = tab.edit_version.saturating_add(1);
        true
    }

    pub fn reload_content(&mut self, id: TabId, text: &str) -> bool {
        let Some(tab) = self.tab_mut(id) else {
            return false;
        };
        let changed = tab.dirty || tab.disk_state != DiskState::InSync || *tab.content != *text;
        if *tab.content != *text {
            tab.content = Arc::from(text);
        }
        tab.dirty = false;
        tab.disk_state = DiskState::InSync;
        changed
    }

    pub fn mark_saved(&mut self, id: TabId) -> bool {
        let Some(tab) = self.tab_mut(id) else {
            return false;
        };
        let changed = tab.dirty || tab.disk_state != DiskState::InSync;
        tab.dirty = false;
        tab.disk_state = DiskState::InSync;
        changed
    }

    pub fn set_disk_state(&mut self, id: TabId, disk_state: DiskState) -> bool {
        let Some(tab) = self.tab_mut(id) else {
            return false;
        };
        if tab.disk_state == disk_state {
            return false;
        }
        tab.disk_state = disk_state;
        true
    }

    pub fn next_tab(&mut self) -> bool {
        self.step_active(1)
    }

    pub fn prev_tab(&mut self) -> bool {
        self.step_active(-1)
    }

    fn step_active(&mut self, delta: isize) -> bool {
        let len = self.tabs.len();
        if len <= 1 {
            return false;
        }
        let current = self.active_index().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        let id = self.tabs[next].id;
        if self.active == Some(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    pub fn move_tab(&mut self, id: TabId, to_index: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            return false;
        };
        let to = to_index.min(self.tabs.len() - 1);
        if from == to {
            return false;
        }
        let tab = self.tabs.remove(from);
        self.tabs.insert(to, tab);
        true
    }

    pub fn issue_reload(
        &mut self,
        id: TabId,
        generation: u64,
        cause: ReloadCause,
    ) -> Option<ReloadRequest> {
        self.tab_mut(id)
            .map(|tab| tab.issue_reload_request(generation, cause))
    }

    /// Decides whether a completed read may be applied. `None` means the tab
    /// is gone or now holds a different path.
    pub fn judge_reload(&mut self, request: &ReloadRequest) -> Option<ReloadVerdict> {
        let tab = self.tab_mut(request.tab_id)?;
        if tab.path != request.path {
            return None;
        }
        Some(tab.judge_reload(request))
    }

    /// Like [`judge_reload`](Self::judge_reload) for a read that failed: an
    /// outdated failure must not override what a newer read established.
    /// Dirtiness does not matter since a failure never touches content.
    pub fn judge_failed_reload(&mut self, request: &ReloadRequest) -> Option<ReloadVerdict> {
        let tab = self.tab_mut(request.tab_id)?;
        if tab.path != request.path {
            return None;
        }
        if tab.is_superseded(request) {
            return Some(ReloadVerdict::Superseded);
        }
        tab.last_applied_reload_request_id = request.request_id;
        Some(ReloadVerdict::Apply)
    }

    pub fn begin_write(&mut self, id: TabId) -> bool {
        let Some(tab) = self.tab_mut(id) else {
            return false;
        };
        tab.writes_in_flight = tab.writes_in_flight.saturating_add(1);
        true
    }

    pub fn finish_write(&mut self, id: TabId) -> bool {
        let Some(tab) = self.tab_mut(id) else {
            return false;
        };
        if tab.writes_in_flight == 0 {
            return false;
        }
        tab.writes_in_flight -= 1;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/tabs.rs"]
mod tests;
