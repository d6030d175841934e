//! Service ports: traits + data contracts.

pub mod config;
pub mod dialog;
pub mod file;
pub mod preferences;
pub mod settings;

pub use config::WorkspaceConfig;
pub use dialog::{DialogService, FileFilter};
pub use file::{DirEntry, FileError, FileSystem, Result as FileResult};
pub use preferences::{PreferenceMap, PreferenceStore, Preferences};
pub use settings::{Settings, ViewMode};
