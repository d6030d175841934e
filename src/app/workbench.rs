//! Host side of the store: executes effects, feeds completions and watcher
//! events back in as actions.

use crate::kernel::services::adapters::{AppMessage, AsyncRuntime, WorkspaceWatcher};
use crate::kernel::services::ports::{
    DialogService, FileSystem, PreferenceStore, Preferences, WorkspaceConfig,
};
use crate::kernel::{Action, AppState, Effect, Notification, Store, SubscriptionId};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

const MAX_MESSAGE_DRAIN_PER_TICK: usize = 256;

pub struct Workbench {
    store: Store,
    runtime: AsyncRuntime,
    message_rx: Receiver<AppMessage>,
    watcher: Option<WorkspaceWatcher>,
    dialogs: Box<dyn DialogService>,
    config: WorkspaceConfig,
    watched_paths_version: Option<u64>,
}

impl Workbench {
    pub fn new(
        config: WorkspaceConfig,
        fs: Arc<dyn FileSystem>,
        preference_store: Option<Arc<dyn PreferenceStore>>,
        dialogs: Box<dyn DialogService>,
    ) -> std::io::Result<Self> {
        let preferences = preference_store
            .as_ref()
            .map(|store| Preferences::from_map(store.load()))
            .unwrap_or_default();

        let (tx, message_rx) = mpsc::channel();
        let runtime = AsyncRuntime::new(tx, fs, preference_store)?;
        let store = Store::new(AppState::new(config.clone(), preferences));

        Ok(Self {
            store,
            runtime,
            message_rx,
            watcher: None,
            dialogs,
            config,
            watched_paths_version: None,
        })
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Dispatches one action and performs whatever I/O it asked for.
    /// Returns whether any state changed, including follow-up actions
    /// produced by dialogs.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = self.store.dispatch(action);
        let mut changed = result.state_changed;
        for effect in result.effects {
            changed |= self.run_effect(effect);
        }
        self.sync_watched_files();
        changed
    }

    fn run_effect(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::LoadFile { path, generation } => self.runtime.load_file(path, generation),
            Effect::ReloadFile(request) => self.runtime.reload_file(request),
            Effect::WriteFile {
                tab_id,
                path,
                content,
                generation,
                edit_version,
            } => self
                .runtime
                .write_file(tab_id, path, content, generation, edit_version),
            Effect::LoadDir {
                path,
                generation,
                request_id,
            } => self.runtime.load_dir(path, generation, request_id),
            Effect::IndexMarkdownFiles {
                root,
                generation,
                request_id,
            } => self
                .runtime
                .index_markdown_files(root, generation, request_id),
            Effect::InspectPath { path, generation } => {
                self.runtime.inspect_path(path, generation)
            }
            Effect::WatchWorkspace(root) => {
                self.watcher = match WorkspaceWatcher::new(&root, &self.config) {
                    Ok(watcher) => Some(watcher),
                    Err(e) => {
                        tracing::warn!(root = %root.display(), error = %e, "watch failed");
                        None
                    }
                };
                self.watched_paths_version = None;
            }
            Effect::UnwatchWorkspace => {
                self.watcher = None;
                self.watched_paths_version = None;
            }
            Effect::PickFolder => {
                if let Some(folder) = self.dialogs.pick_folder() {
                    return self.dispatch(Action::SetWorkspace(Some(folder)));
                }
            }
            Effect::PickFile(filter) => {
                if let Some(path) = self.dialogs.pick_file(&filter) {
                    return self.dispatch(Action::OpenPath(path));
                }
            }
            Effect::PersistPreferences(patch) => self.runtime.persist_preferences(patch),
        }
        false
    }

    fn sync_watched_files(&mut self) {
        let Some(watcher) = self.watcher.as_mut() else {
            return;
        };
        let version = self.store.state().tabs.open_paths_version();
        if self.watched_paths_version == Some(version) {
            return;
        }
        watcher.sync_open_files(self.store.state().tabs.paths());
        self.watched_paths_version = Some(version);
    }

    fn handle_message(&mut self, message: AppMessage) -> bool {
        if let AppMessage::FileSaved {
            path, result: Ok(()), ..
        } = &message
        {
            if let Some(watcher) = self.watcher.as_mut() {
                watcher.acknowledge_write(path);
            }
        }
        self.dispatch(message.into())
    }

    /// Drains completed I/O without blocking.
    pub fn pump_messages(&mut self) -> bool {
        let mut changed = false;
        for _ in 0..MAX_MESSAGE_DRAIN_PER_TICK {
            match self.message_rx.try_recv() {
                Ok(message) => changed |= self.handle_message(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    /// Blocks up to `timeout` for the next completion, then drains the rest.
    /// Returns `false` if nothing arrived.
    pub fn wait_message(&mut self, timeout: Duration) -> bool {
        match self.message_rx.recv_timeout(timeout) {
            Ok(message) => {
                self.handle_message(message);
                self.pump_messages();
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    pub fn poll_watcher(&mut self) -> bool {
        let Some(watcher) = self.watcher.as_mut() else {
            return false;
        };
        let changes = watcher.drain_changes();
        let mut changed = false;
        for change in changes {
            changed |= self.dispatch(Action::FileChanged(change));
        }
        changed
    }

    /// One host loop iteration.
    pub fn tick(&mut self) -> bool {
        let mut changed = self.pump_messages();
        changed |= self.poll_watcher();
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/workbench.rs"]
mod tests;
