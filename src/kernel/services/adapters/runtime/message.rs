use crate::kernel::services::ports::{DirEntry, FileError};
use crate::kernel::tabs::{ReloadRequest, TabId};
use crate::kernel::Action;
use std::path::PathBuf;

/// Completion of one effect, carrying the keys captured when it was issued.
#[derive(Debug)]
pub enum AppMessage {
    FileLoaded {
        path: PathBuf,
        generation: u64,
        result: Result<String, FileError>,
    },
    FileReloaded {
        request: ReloadRequest,
        result: Result<String, FileError>,
    },
    FileSaved {
        tab_id: TabId,
        path: PathBuf,
        generation: u64,
        edit_version: u64,
        result: Result<(), FileError>,
    },
    PathInspected {
        path: PathBuf,
        generation: u64,
        result: Result<DirEntry, FileError>,
    },
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

impl From<AppMessage> for Action {
    fn from(message: AppMessage) -> Self {
        match message {
            AppMessage::FileLoaded {
                path,
                generation,
                result,
            } => Action::FileLoaded {
                path,
                generation,
                result,
            },
            AppMessage::FileReloaded { request, result } => {
                Action::FileReloaded { request, result }
            }
            AppMessage::FileSaved {
                tab_id,
                path,
                generation,
                edit_version,
                result,
            } => Action::Saved {
                tab_id,
                path,
                generation,
                edit_version,
                result,
            },
            AppMessage::PathInspected {
                path,
                generation,
                result,
            } => Action::PathInspected {
                path,
                generation,
                result,
            },
            AppMessage::MarkdownFilesListed {
                generation,
                request_id,
                result,
            } => Action::MarkdownFilesListed {
                generation,
                request_id,
                result,
            },
            AppMessage::DirLoaded {
                path,
                generation,
                request_id,
                result,
            } => Action::DirLoaded {
                path,
                generation,
                request_id,
                result,
            },
        }
    }
}
