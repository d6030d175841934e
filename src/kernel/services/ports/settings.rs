use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    Source,
    #[default]
    Preview,
    Split,
    DirectEdit,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Source,
        ViewMode::Preview,
        ViewMode::Split,
        ViewMode::DirectEdit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Preview => "preview",
            Self::Split => "split",
            Self::DirectEdit => "direct-edit",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == name)
    }

    /// The edit toggle only means something where the rendered document is
    /// the input surface.
    pub fn supports_edit_toggle(self) -> bool {
        matches!(self, Self::Preview | Self::DirectEdit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub default_view_mode: ViewMode,
    #[serde(default = "default_watcher_poll_ms")]
    pub watcher_poll_ms: u64,
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default = "default_markdown_extensions")]
    pub markdown_extensions: Vec<String>,
}

fn default_watcher_poll_ms() -> u64 {
    250
}

fn default_markdown_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_view_mode: ViewMode::default(),
            watcher_poll_ms: default_watcher_poll_ms(),
            show_hidden: false,
            markdown_extensions: default_markdown_extensions(),
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
