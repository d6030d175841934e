use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, FileError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    NotFound(PathBuf),
    PermissionDenied(PathBuf),
    Io { path: PathBuf, message: String },
}

impl FileError {
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FileError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied(path.to_path_buf()),
            _ => FileError::Io {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileError::NotFound(path) | FileError::PermissionDenied(path) => path,
            FileError::Io { path, .. } => path,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FileError::NotFound(_))
    }
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            FileError::PermissionDenied(path) => {
                write!(f, "Permission denied: {}", path.display())
            }
            FileError::Io { path, message } => {
                write!(f, "IO error on {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for FileError {}

/// One row of a directory listing as the navigation panel shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_markdown: bool,
}

/// Filesystem access as the workspace core consumes it.
///
/// Implementations are called from the async runtime's blocking pool, so they
/// must be shareable across threads.
pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Directories first, then files, each group ordered by case-insensitive
    /// name. Hidden entries are skipped.
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Every markdown file below `root`, ordered by case-insensitive path.
    fn list_markdown_files(&self, root: &Path) -> Result<Vec<DirEntry>>;

    /// What `path` is, without reading it. `NotFound` if it does not exist.
    fn metadata(&self, path: &Path) -> Result<DirEntry>;
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/file.rs"]
mod tests;
