use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn markdown() -> Self {
        Self {
            name: "Markdown".to_string(),
            extensions: vec!["md".to_string(), "markdown".to_string()],
        }
    }

    pub fn accepts(&self, path: &std::path::Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }
}

/// Folder / file pickers. `None` means the user cancelled.
pub trait DialogService {
    fn pick_folder(&mut self) -> Option<PathBuf>;

    fn pick_file(&mut self, filter: &FileFilter) -> Option<PathBuf>;
}
