//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod dialog;
pub mod file;
pub mod file_watcher;
pub mod paths;
pub mod preferences;
pub mod runtime;
pub mod settings;

pub use dialog::PromptDialog;
pub use file::LocalFileSystem;
pub use file_watcher::WorkspaceWatcher;
pub use paths::{ensure_log_dir, get_app_data_dir, get_log_dir, get_preferences_path};
pub use preferences::JsonPreferenceStore;
pub use runtime::{AppMessage, AsyncRuntime};
pub use settings::{ensure_settings_file, get_settings_path, load_settings};
