use std::path::PathBuf;

use crate::core::Command;
use crate::kernel::focus::FocusZone;
use crate::kernel::reconcile::FileChange;
use crate::kernel::services::ports::{DirEntry, FileError, ViewMode};
use crate::kernel::tabs::{ReloadRequest, TabId};

#[derive(Debug, Clone)]
pub enum Action {
    RunCommand(Command),
    SetWorkspace(Option<PathBuf>),

    OpenPath(PathBuf),
    /// A path of unknown kind: folders become the workspace, markdown files
    /// open in a tab, anything else is refused.
    OpenDropped(PathBuf),
    PathInspected {
        path: PathBuf,
        generation: u64,
        result: Result<DirEntry, FileError>,
    },
    /// Opens a document whose content the caller already has (drag-and-drop).
    OpenTab {
        path: PathBuf,
        name: String,
        content: String,
    },
    FileLoaded {
        path: PathBuf,
        generation: u64,
        result: Result<String, FileError>,
    },
    CloseTab(TabId),
    SelectTab(TabId),
    MoveTab {
        tab_id: TabId,
        to_index: usize,
    },
    NextTab,
    PrevTab,
    UpdateContent {
        tab_id: TabId,
        text: String,
    },

    SaveTab(TabId),
    Saved {
        tab_id: TabId,
        path: PathBuf,
        generation: u64,
        edit_version: u64,
        result: Result<(), FileError>,
    },

    FileChanged(FileChange),
    FileReloaded {
        request: ReloadRequest,
        result: Result<String, FileError>,
    },
    AcceptDiskVersion(TabId),
    KeepMemoryVersion(TabId),

    SetViewMode(ViewMode),
    SetEditEnabled(bool),
    SetFocusZone(FocusZone),
    CycleFocusZone,
    SetSidebarWidth(u32),
    DismissError,

    SearchSetQuery(String),
    SearchNext,
    SearchPrev,
    SearchClose,

    PaletteSetQuery(String),
    PaletteMoveSelection(isize),
    PaletteConfirm,
    PaletteClose,

    ExplorerToggleDir(PathBuf),
    MarkdownFilesListed {
        generation: u64,
        request_id: u64,
        result: Result<Vec<DirEntry>, FileError>,
    },
    DirLoaded {
        path: PathBuf,
        generation: u64,
        request_id: u64,
        result: Result<Vec<DirEntry>, FileError>,
    },
}
