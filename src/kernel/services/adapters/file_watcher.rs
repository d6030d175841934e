use crate::kernel::reconcile::{ChangeKind, FileChange};
use crate::kernel::services::ports::WorkspaceConfig;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq)]
enum FsDelta {
    Created { path: PathBuf },
    Deleted { path: PathBuf },
    Renamed { from: PathBuf, to: PathBuf },
    Modified { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FileFingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

/// Arrival-ordered changes with back-to-back repeats for one path folded.
#[derive(Default)]
struct DrainBuffer {
    changes: Vec<FileChange>,
    last_kind: FxHashMap<PathBuf, ChangeKind>,
}

impl DrainBuffer {
    fn push(&mut self, path: PathBuf, kind: ChangeKind) {
        if self.last_kind.get(&path) == Some(&kind) {
            return;
        }
        self.last_kind.insert(path.clone(), kind);
        self.changes.push(FileChange::new(path, kind));
    }
}

/// Recursive watch over the workspace root, turning raw notify events into
/// [`FileChange`]s the reconciliation engine understands.
///
/// Open files are fingerprinted (length + mtime) so metadata-only noise and
/// our own saves do not look like external edits.
pub struct WorkspaceWatcher {
    watcher: RecommendedWatcher,
    raw_event_rx: mpsc::Receiver<notify::Event>,
    root: PathBuf,
    show_hidden: bool,
    open_file_keys: FxHashMap<PathBuf, FxHashSet<PathBuf>>,
    open_file_fingerprints: FxHashMap<PathBuf, FileFingerprint>,
}

impl WorkspaceWatcher {
    pub fn new(root: &Path, config: &WorkspaceConfig) -> Result<Self, notify::Error> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    let _ = tx.send(event);
                }
                Err(err) => tracing::warn!(error = %err, "watcher error"),
            },
            Config::default().with_poll_interval(config.watcher_poll_interval),
        )?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        tracing::info!(root = %root.display(), "watching workspace");
        Ok(Self::from_parts(watcher, rx, root, config))
    }

    fn from_parts(
        watcher: RecommendedWatcher,
        raw_event_rx: mpsc::Receiver<notify::Event>,
        root: PathBuf,
        config: &WorkspaceConfig,
    ) -> Self {
        Self {
            watcher,
            raw_event_rx,
            root,
            show_hidden: config.show_hidden,
            open_file_keys: FxHashMap::default(),
            open_file_fingerprints: FxHashMap::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Replaces the set of open files. Fingerprints of files that stay open
    /// are kept so a change that raced with the sync is still noticed.
    pub fn sync_open_files<'a, I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut open_file_keys: FxHashMap<PathBuf, FxHashSet<PathBuf>> = FxHashMap::default();
        let mut open_file_fingerprints: FxHashMap<PathBuf, FileFingerprint> = FxHashMap::default();

        for path in paths {
            let path = path.to_path_buf();
            if open_file_fingerprints.contains_key(&path) {
                continue;
            }
            for key in path_identity_keys(path.as_path(), self.root.as_path()) {
                open_file_keys.entry(key).or_default().insert(path.clone());
            }

            if let Some(existing) = self.open_file_fingerprints.get(&path).cloned() {
                open_file_fingerprints.insert(path, existing);
            } else if let Some(fingerprint) = file_fingerprint(path.as_path()) {
                open_file_fingerprints.insert(path, fingerprint);
            }
        }

        self.open_file_keys = open_file_keys;
        self.open_file_fingerprints = open_file_fingerprints;
    }

    /// Records the on-disk state after one of our own writes so the echo
    /// event is not reported as an external change.
    pub fn acknowledge_write(&mut self, path: &Path) {
        for tab_path in self.match_open_paths(path) {
            if let Some(fingerprint) = file_fingerprint(tab_path.as_path()) {
                self.open_file_fingerprints.insert(tab_path, fingerprint);
            } else {
                self.open_file_fingerprints.remove(&tab_path);
            }
        }
    }

    pub fn drain_changes(&mut self) -> Vec<FileChange> {
        let _watcher_guard = &self.watcher;

        let mut buffer = DrainBuffer::default();
        while let Ok(event) = self.raw_event_rx.try_recv() {
            for delta in normalize_notify_event(event) {
                self.route_delta(delta, &mut buffer);
            }
        }
        buffer.changes
    }

    fn route_delta(&mut self, delta: FsDelta, buffer: &mut DrainBuffer) {
        match delta {
            FsDelta::Modified { path } => {
                let open = self.match_open_paths(path.as_path());
                if open.is_empty() {
                    if let Some(path) = self.to_workspace_path(path.as_path()) {
                        buffer.push(path, ChangeKind::Modified);
                    }
                    return;
                }
                for tab_path in sorted(open) {
                    if self.refresh_open_file_fingerprint(tab_path.as_path()) {
                        buffer.push(tab_path, ChangeKind::Modified);
                    }
                }
            }
            FsDelta::Deleted { path } => self.route_removed(path, buffer),
            FsDelta::Created { path } => self.route_created(path, buffer),
            FsDelta::Renamed { from, to } => {
                self.route_removed(from, buffer);
                self.route_created(to, buffer);
            }
        }
    }

    fn route_removed(&mut self, path: PathBuf, buffer: &mut DrainBuffer) {
        let open = self.match_open_paths(path.as_path());
        if open.is_empty() {
            if let Some(path) = self.to_workspace_path(path.as_path()) {
                buffer.push(path, ChangeKind::Removed);
            }
            return;
        }
        for tab_path in sorted(open) {
            self.open_file_fingerprints.remove(&tab_path);
            buffer.push(tab_path, ChangeKind::Removed);
        }
    }

    fn route_created(&mut self, path: PathBuf, buffer: &mut DrainBuffer) {
        if !path.exists() {
            return;
        }
        let open = self.match_open_paths(path.as_path());
        if open.is_empty() {
            if let Some(path) = self.to_workspace_path(path.as_path()) {
                buffer.push(path, ChangeKind::Created);
            }
            return;
        }
        for tab_path in sorted(open) {
            let _ = self.refresh_open_file_fingerprint(tab_path.as_path());
            buffer.push(tab_path, ChangeKind::Created);
        }
    }

    fn refresh_open_file_fingerprint(&mut self, path: &Path) -> bool {
        match file_fingerprint(path) {
            Some(new_fingerprint) => self
                .open_file_fingerprints
                .insert(path.to_path_buf(), new_fingerprint.clone())
                .map_or(true, |previous| previous != new_fingerprint),
            None => self.open_file_fingerprints.remove(path).is_some(),
        }
    }

    fn to_workspace_path(&self, path: &Path) -> Option<PathBuf> {
        let raw = raw_absolute_path(path, self.root.as_path());
        let root = self.root.as_path();

        let resolved = if raw.starts_with(root) {
            Some(raw)
        } else {
            raw.canonicalize()
                .ok()
                .filter(|canonical| canonical.starts_with(root))
        }?;

        if !self.show_hidden && contains_hidden_component(resolved.as_path(), root) {
            return None;
        }
        Some(resolved)
    }

    fn match_open_paths(&self, path: &Path) -> FxHashSet<PathBuf> {
        let mut matched = FxHashSet::default();
        for key in path_identity_keys(path, self.root.as_path()) {
            if let Some(paths) = self.open_file_keys.get(&key) {
                matched.extend(paths.iter().cloned());
            }
        }
        matched
    }
}

fn sorted(paths: FxHashSet<PathBuf>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = paths.into_iter().collect();
    paths.sort_unstable();
    paths
}

fn raw_absolute_path(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn path_identity_keys(path: &Path, root: &Path) -> Vec<PathBuf> {
    let raw = raw_absolute_path(path, root);
    let mut keys = vec![raw.clone()];
    if let Ok(canonical) = raw.canonicalize() {
        if canonical != raw {
            keys.push(canonical);
        }
    }
    keys
}

fn contains_hidden_component(path: &Path, root: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| {
        if let Component::Normal(name) = component {
            name.to_string_lossy().starts_with('.')
        } else {
            false
        }
    })
}

fn file_fingerprint(path: &Path) -> Option<FileFingerprint> {
    let metadata = std::fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }

    Some(FileFingerprint {
        len: metadata.len(),
        modified: metadata.modified().ok(),
    })
}

fn normalize_notify_event(event: notify::Event) -> Vec<FsDelta> {
    match event.kind {
        EventKind::Create(_) => event
            .paths
            .into_iter()
            .map(|path| FsDelta::Created { path })
            .collect(),
        EventKind::Remove(_) => event
            .paths
            .into_iter()
            .map(|path| FsDelta::Deleted { path })
            .collect(),
        EventKind::Modify(kind) => normalize_modify_event(kind, event.paths),
        _ => Vec::new(),
    }
}

fn normalize_modify_event(kind: ModifyKind, paths: Vec<PathBuf>) -> Vec<FsDelta> {
    match kind {
        ModifyKind::Name(RenameMode::Both) if paths.len() >= 2 => {
            let mut paths = paths.into_iter();
            match (paths.next(), paths.next()) {
                (Some(from), Some(to)) => vec![FsDelta::Renamed { from, to }],
                _ => Vec::new(),
            }
        }
        ModifyKind::Name(RenameMode::From) => paths
            .into_iter()
            .map(|path| FsDelta::Deleted { path })
            .collect(),
        ModifyKind::Name(RenameMode::To) => paths
            .into_iter()
            .map(|path| FsDelta::Created { path })
            .collect(),
        ModifyKind::Data(_)
        | ModifyKind::Any
        | ModifyKind::Other
        | ModifyKind::Metadata(_)
        | ModifyKind::Name(_) => paths
            .into_iter()
            .map(|path| FsDelta::Modified { path })
            .collect(),
    }
}
