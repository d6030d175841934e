//! Line-oriented dialog service for the headless binary.

use crate::kernel::services::ports::{DialogService, FileFilter};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Asks for paths on a text stream. An empty answer cancels.
pub struct PromptDialog<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptDialog<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Option<PathBuf> {
        let _ = write!(self.output, "{prompt}: ");
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let answer = line.trim();
                (!answer.is_empty()).then(|| PathBuf::from(answer))
            }
        }
    }
}

impl<R: BufRead, W: Write> DialogService for PromptDialog<R, W> {
    fn pick_folder(&mut self) -> Option<PathBuf> {
        let path = self.ask("Folder")?;
        if path.is_dir() {
            Some(path)
        } else {
            let _ = writeln!(self.output, "not a directory: {}", path.display());
            None
        }
    }

    fn pick_file(&mut self, filter: &FileFilter) -> Option<PathBuf> {
        let prompt = format!("{} file ({})", filter.name, filter.extensions.join(", "));
        let path = self.ask(&prompt)?;
        if filter.accepts(&path) {
            Some(path)
        } else {
            let _ = writeln!(self.output, "not a {} file: {}", filter.name, path.display());
            None
        }
    }
}
