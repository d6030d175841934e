//! `FileSystem` backed by the local disk.

use crate::kernel::services::ports::file::{DirEntry, FileError, FileSystem, Result};
use crate::kernel::services::ports::WorkspaceConfig;
use ignore::WalkBuilder;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

pub struct LocalFileSystem {
    config: WorkspaceConfig,
}

impl LocalFileSystem {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self { config }
    }

    fn entry(&self, path: &Path, name: String, is_dir: bool) -> DirEntry {
        DirEntry {
            is_markdown: !is_dir && self.config.is_markdown(path),
            name,
            path: path.to_path_buf(),
            is_dir,
        }
    }
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new(WorkspaceConfig::default())
    }
}

fn listing_order(a: &DirEntry, b: &DirEntry) -> Ordering {
    match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    }
}

impl FileSystem for LocalFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| FileError::from_io(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| FileError::from_io(parent, e))?;
            }
        }
        fs::write(path, content).map_err(|e| FileError::from_io(path, e))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| FileError::from_io(path, e))? {
            let entry = entry.map_err(|e| FileError::from_io(path, e))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if self.config.is_hidden(&name) {
                continue;
            }
            // Entries that vanish between read_dir and stat are skipped.
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let entry_path = entry.path();
            let is_dir = if file_type.is_symlink() {
                entry_path.is_dir()
            } else {
                file_type.is_dir()
            };
            entries.push(self.entry(&entry_path, name, is_dir));
        }

        entries.sort_by(listing_order);
        Ok(entries)
    }

    fn list_markdown_files(&self, root: &Path) -> Result<Vec<DirEntry>> {
        if !root.is_dir() {
            return Err(FileError::NotFound(root.to_path_buf()));
        }

        let walker = WalkBuilder::new(root)
            .hidden(!self.config.show_hidden)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            if !self.config.is_markdown(path) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            files.push(self.entry(path, name, false));
        }

        files.sort_by_cached_key(|e| e.path.to_string_lossy().to_lowercase());
        Ok(files)
    }

    fn metadata(&self, path: &Path) -> Result<DirEntry> {
        let meta = fs::metadata(path).map_err(|e| FileError::from_io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(self.entry(path, name, meta.is_dir()))
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/file/local.rs"]
mod tests;
