use std::path::Path;
use std::time::Duration;

use super::settings::{Settings, ViewMode};

#[derive(Clone, Debug)]
pub struct WorkspaceConfig {
    pub default_view_mode: ViewMode,
    pub watcher_poll_interval: Duration,
    pub show_hidden: bool,
    pub markdown_extensions: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for WorkspaceConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            default_view_mode: settings.default_view_mode,
            watcher_poll_interval: Duration::from_millis(settings.watcher_poll_ms.max(10)),
            show_hidden: settings.show_hidden,
            markdown_extensions: settings
                .markdown_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }
}

impl WorkspaceConfig {
    pub fn is_markdown(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| self.markdown_extensions.iter().any(|e| *e == ext))
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        !self.show_hidden && name.starts_with('.')
    }
}
