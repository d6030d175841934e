//! Every markdown file under the workspace root, for quick-open.
//!
//! Filled by a recursive listing on the async runtime. Like the directory
//! cache it lags the filesystem; each refresh gets a request id and only the
//! newest one may replace the file list.

use crate::kernel::services::ports::DirEntry;

#[derive(Debug, Clone, Default)]
pub struct MarkdownIndex {
    files: Vec<DirEntry>,
    latest_request: u64,
    indexing: bool,
}

impl MarkdownIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[DirEntry] {
        &self.files
    }

    pub fn is_indexing(&self) -> bool {
        self.indexing
    }

    pub fn request(&mut self) -> u64 {
        self.latest_request = self.latest_request.saturating_add(1);
        self.indexing = true;
        self.latest_request
    }

    pub fn apply(&mut self, request_id: u64, files: Vec<DirEntry>) -> bool {
        if request_id != self.latest_request || !self.indexing {
            return false;
        }
        self.indexing = false;
        self.files = files;
        true
    }

    /// Files whose name contains `query`, ignoring case. An empty query
    /// matches everything.
    pub fn matching(&self, query: &str) -> Vec<&DirEntry> {
        let query = query.trim().to_lowercase();
        self.files
            .iter()
            .filter(|entry| query.is_empty() || entry.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn clear(&mut self) -> bool {
        let had_any = !self.files.is_empty() || self.indexing;
        self.files.clear();
        self.indexing = false;
        had_any
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/file_index.rs"]
mod tests;
