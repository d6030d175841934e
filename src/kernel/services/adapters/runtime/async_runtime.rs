use super::message::AppMessage;
use crate::kernel::services::ports::{
    FileError, FileResult, FileSystem, PreferenceMap, PreferenceStore,
};
use crate::kernel::tabs::{ReloadRequest, TabId};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;

pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    fs: Arc<dyn FileSystem>,
    preferences: Option<Arc<dyn PreferenceStore>>,
    tx: Sender<AppMessage>,
}

impl AsyncRuntime {
    pub fn new(
        tx: Sender<AppMessage>,
        fs: Arc<dyn FileSystem>,
        preferences: Option<Arc<dyn PreferenceStore>>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self {
            runtime,
            fs,
            preferences,
            tx,
        })
    }

    pub fn load_file(&self, path: PathBuf, generation: u64) {
        let tx = self.tx.clone();
        let fs = Arc::clone(&self.fs);
        self.runtime.spawn(async move {
            let path_for_read = path.clone();
            let result = blocking(&path, move || fs.read_to_string(&path_for_read)).await;
            let _ = tx.send(AppMessage::FileLoaded {
                path,
                generation,
                result,
            });
        });
    }

    pub fn reload_file(&self, request: ReloadRequest) {
        let tx = self.tx.clone();
        let fs = Arc::clone(&self.fs);
        self.runtime.spawn(async move {
            let path_for_read = request.path.clone();
            let result = blocking(&request.path, move || fs.read_to_string(&path_for_read)).await;
            let _ = tx.send(AppMessage::FileReloaded { request, result });
        });
    }

    pub fn write_file(
        &self,
        tab_id: TabId,
        path: PathBuf,
        content: Arc<str>,
        generation: u64,
        edit_version: u64,
    ) {
        let tx = self.tx.clone();
        let fs = Arc::clone(&self.fs);
        self.runtime.spawn(async move {
            let path_for_write = path.clone();
            let result = blocking(&path, move || fs.write(&path_for_write, &content)).await;
            let _ = tx.send(AppMessage::FileSaved {
                tab_id,
                path,
                generation,
                edit_version,
                result,
            });
        });
    }

    pub fn load_dir(&self, path: PathBuf, generation: u64, request_id: u64) {
        let tx = self.tx.clone();
        let fs = Arc::clone(&self.fs);
        self.runtime.spawn(async move {
            let path_for_list = path.clone();
            let result = blocking(&path, move || fs.list_dir(&path_for_list)).await;
            let _ = tx.send(AppMessage::DirLoaded {
                path,
                generation,
                request_id,
                result,
            });
        });
    }

    pub fn inspect_path(&self, path: PathBuf, generation: u64) {
        let tx = self.tx.clone();
        let fs = Arc::clone(&self.fs);
        self.runtime.spawn(async move {
            let path_for_stat = path.clone();
            let result = blocking(&path, move || fs.metadata(&path_for_stat)).await;
            let _ = tx.send(AppMessage::PathInspected {
                path,
                generation,
                result,
            });
        });
    }

    pub fn index_markdown_files(&self, root: PathBuf, generation: u64, request_id: u64) {
        let tx = self.tx.clone();
        let fs = Arc::clone(&self.fs);
        self.runtime.spawn(async move {
            let root_for_walk = root.clone();
            let result = blocking(&root, move || fs.list_markdown_files(&root_for_walk)).await;
            let _ = tx.send(AppMessage::MarkdownFilesListed {
                generation,
                request_id,
                result,
            });
        });
    }

    /// Fire-and-forget: a failed preferences write is logged, never surfaced.
    pub fn persist_preferences(&self, patch: PreferenceMap) {
        let Some(store) = self.preferences.as_ref().map(Arc::clone) else {
            return;
        };
        self.runtime.spawn(async move {
            match tokio::task::spawn_blocking(move || store.merge(&patch)).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "failed to persist preferences"),
                Err(e) => tracing::warn!(error = %e, "preferences task failed"),
            }
        });
    }
}

async fn blocking<T, F>(path: &Path, work: F) -> FileResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> FileResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result,
        Err(e) => Err(FileError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/async_runtime.rs"]
mod tests;
