use std::path::PathBuf;
use std::sync::Arc;

use crate::kernel::services::ports::{FileFilter, PreferenceMap};
use crate::kernel::tabs::{ReloadRequest, TabId};

/// I/O the store asks the host to perform. Each variant carries the keys its
/// completion must be re-validated against.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadFile {
        path: PathBuf,
        generation: u64,
    },
    ReloadFile(ReloadRequest),
    WriteFile {
        tab_id: TabId,
        path: PathBuf,
        content: Arc<str>,
        generation: u64,
        edit_version: u64,
    },
    LoadDir {
        path: PathBuf,
        generation: u64,
        request_id: u64,
    },
    /// Recursive markdown listing of the workspace for quick-open.
    IndexMarkdownFiles {
        root: PathBuf,
        generation: u64,
        request_id: u64,
    },
    /// Stat a path handed over from outside (drop, command line) before
    /// deciding whether it is a folder or a document.
    InspectPath {
        path: PathBuf,
        generation: u64,
    },
    WatchWorkspace(PathBuf),
    UnwatchWorkspace,
    PickFolder,
    PickFile(FileFilter),
    PersistPreferences(PreferenceMap),
}
