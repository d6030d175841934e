use std::path::{Path, PathBuf};

use crate::kernel::services::ports::{
    DirEntry, FileError, Preferences, ViewMode, WorkspaceConfig,
};

use super::dir_cache::DirectoryCache;
use super::file_index::MarkdownIndex;
use super::focus::{FocusState, FocusZone};
use super::search::SearchSession;
use super::tabs::{DocumentTab, TabId, TabRegistry};

/// The rooted directory plus a generation counter. Every `set` bumps the
/// generation, which invalidates all I/O issued against the previous root in
/// one comparison.
#[derive(Debug, Default)]
pub struct WorkspaceState {
    root: Option<PathBuf>,
    generation: u64,
}

impl WorkspaceState {
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn set(&mut self, root: Option<PathBuf>) -> u64 {
        self.root = root;
        self.generation = self.generation.saturating_add(1);
        self.generation
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPaletteState {
    pub visible: bool,
    pub query: String,
    pub selected: usize,
}

impl CommandPaletteState {
    pub fn reset(&mut self) {
        self.visible = false;
        self.query.clear();
        self.selected = 0;
    }
}

#[derive(Debug)]
pub struct UiState {
    pub view_mode: ViewMode,
    pub edit_enabled: bool,
    pub focus: FocusState,
    pub command_palette: CommandPaletteState,
    pub sidebar_width: u32,
    /// Last user-facing failure (open/save), shown until dismissed.
    pub last_error: Option<String>,
}

impl UiState {
    fn new(view_mode: ViewMode, sidebar_width: u32) -> Self {
        Self {
            view_mode,
            edit_enabled: false,
            focus: FocusState::new(),
            command_palette: CommandPaletteState::default(),
            sidebar_width,
            last_error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// The UI should move input focus into this zone.
    FocusMoved(FocusZone),
    /// A tab with unsaved edits had its file changed on disk.
    ConflictDetected { tab_id: TabId, path: PathBuf },
    DiskFileMissing { tab_id: TabId, path: PathBuf },
    SaveFailed { tab_id: TabId, error: FileError },
    OpenFailed { path: PathBuf, error: FileError },
}

/// Complete, immutable copy of everything observers may render.
#[derive(Debug, Clone)]
pub struct WorkspaceSnapshot {
    pub workspace_root: Option<PathBuf>,
    pub generation: u64,
    pub tabs: Vec<DocumentTab>,
    pub active_tab: Option<TabId>,
    pub view_mode: ViewMode,
    pub edit_enabled: bool,
    pub focus: FocusZone,
    pub search: SearchSession,
    pub command_palette: CommandPaletteState,
    pub sidebar_width: u32,
    pub last_error: Option<String>,
    pub markdown_files: Vec<DirEntry>,
}

impl WorkspaceSnapshot {
    pub fn active(&self) -> Option<&DocumentTab> {
        let id = self.active_tab?;
        self.tabs.iter().find(|t| t.id() == id)
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub snapshot: WorkspaceSnapshot,
    pub signals: Vec<Signal>,
}

#[derive(Debug)]
pub struct AppState {
    pub config: WorkspaceConfig,
    pub workspace: WorkspaceState,
    pub tabs: TabRegistry,
    pub search: SearchSession,
    pub dir_cache: DirectoryCache,
    pub markdown_index: MarkdownIndex,
    pub preferences: Preferences,
    pub ui: UiState,
}

impl AppState {
    pub fn new(config: WorkspaceConfig, preferences: Preferences) -> Self {
        let view_mode = preferences
            .view_mode()
            .unwrap_or(config.default_view_mode);
        let sidebar_width = preferences.sidebar_width();
        Self {
            config,
            workspace: WorkspaceState::default(),
            tabs: TabRegistry::new(),
            search: SearchSession::new(),
            dir_cache: DirectoryCache::new(),
            markdown_index: MarkdownIndex::new(),
            preferences,
            ui: UiState::new(view_mode, sidebar_width),
        }
    }

    pub fn active_text(&self) -> Option<&str> {
        self.tabs.active().map(DocumentTab::content)
    }

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            workspace_root: self.workspace.root().map(Path::to_path_buf),
            generation: self.workspace.generation(),
            tabs: self.tabs.tabs().to_vec(),
            active_tab: self.tabs.active_id(),
            view_mode: self.ui.view_mode,
            edit_enabled: self.ui.edit_enabled,
            focus: self.ui.focus.zone(),
            search: self.search.clone(),
            command_palette: self.ui.command_palette.clone(),
            sidebar_width: self.ui.sidebar_width,
            last_error: self.ui.last_error.clone(),
            markdown_files: self.markdown_index.files().to_vec(),
        }
    }
}
