//! Directory listings for the navigation panel.
//!
//! The cache is never authoritative: it lags the filesystem and is thrown away
//! wholesale on any change notification. Directories that were expanded at
//! that moment are re-fetched so the tree keeps its shape.
//!
//! Each load carries a per-directory request id. Only the newest outstanding
//! request for a directory may fill it, so a listing issued before an
//! invalidation can never replace the re-fetch that followed it.

use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};

use crate::kernel::services::ports::DirEntry;

#[derive(Debug, Default)]
pub struct DirectoryCache {
    listings: FxHashMap<PathBuf, Vec<DirEntry>>,
    expanded: FxHashSet<PathBuf>,
    pending: FxHashMap<PathBuf, u64>,
    next_request_id: u64,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing(&self, dir: &Path) -> Option<&[DirEntry]> {
        self.listings.get(dir).map(Vec::as_slice)
    }

    pub fn is_expanded(&self, dir: &Path) -> bool {
        self.expanded.contains(dir)
    }

    pub fn is_pending(&self, dir: &Path) -> bool {
        self.pending.contains_key(dir)
    }

    /// Id of the load a listing for `dir` must answer to be applied.
    pub fn pending_request(&self, dir: &Path) -> Option<u64> {
        self.pending.get(dir).copied()
    }

    fn issue(&mut self, dir: PathBuf) -> u64 {
        self.next_request_id = self.next_request_id.saturating_add(1);
        self.pending.insert(dir, self.next_request_id);
        self.next_request_id
    }

    pub fn expanded_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self.expanded.iter().cloned().collect();
        dirs.sort_unstable();
        dirs
    }

    /// Marks `dir` as awaiting a listing and returns the request id. `None`
    /// when a load is already cached or in flight, so callers do not issue a
    /// duplicate.
    pub fn request_load(&mut self, dir: &Path) -> Option<u64> {
        if self.listings.contains_key(dir) || self.pending.contains_key(dir) {
            return None;
        }
        Some(self.issue(dir.to_path_buf()))
    }

    pub fn expand(&mut self, dir: &Path) -> bool {
        self.expanded.insert(dir.to_path_buf())
    }

    pub fn collapse(&mut self, dir: &Path) -> bool {
        self.expanded.remove(dir)
    }

    /// Drops every listing and returns the directories to re-fetch with their
    /// fresh request ids: the root first, then each expanded directory.
    pub fn invalidate(&mut self, root: &Path) -> Vec<(PathBuf, u64)> {
        self.listings.clear();
        self.pending.clear();

        let mut dirs = vec![root.to_path_buf()];
        dirs.extend(
            self.expanded_dirs()
                .into_iter()
                .filter(|dir| dir.as_path() != root),
        );
        dirs.into_iter()
            .map(|dir| {
                let request_id = self.issue(dir.clone());
                (dir, request_id)
            })
            .collect()
    }

    /// Applies a completed listing. Answers to anything but the newest
    /// outstanding request for `dir` are dropped.
    pub fn apply_listing(&mut self, dir: PathBuf, request_id: u64, entries: Vec<DirEntry>) -> bool {
        if self.pending.get(&dir) != Some(&request_id) {
            return false;
        }
        self.pending.remove(&dir);
        self.listings.insert(dir, entries);
        true
    }

    /// A directory that vanished mid-browse shows up as empty instead of
    /// breaking the tree.
    pub fn apply_error(&mut self, dir: PathBuf, request_id: u64) -> bool {
        self.apply_listing(dir, request_id, Vec::new())
    }

    pub fn clear(&mut self) -> bool {
        let had_any =
            !self.listings.is_empty() || !self.expanded.is_empty() || !self.pending.is_empty();
        self.listings.clear();
        self.expanded.clear();
        self.pending.clear();
        had_any
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/dir_cache.rs"]
mod tests;
