//! Fenced diagram blocks (```` ```mermaid ````) inside markdown text.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// Byte range of the whole fence, markers included.
    pub start: usize,
    pub end: usize,
    pub source: String,
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*```[ \t]*mermaid[ \t]*\r?\n((?s:.*?))^[ \t]*```[ \t]*$")
            .expect("diagram fence regex is valid")
    })
}

/// Every complete mermaid fence in `text`, in order. Unterminated fences are
/// ignored so a half-typed block never renders.
pub fn find_diagram_blocks(text: &str) -> Vec<DiagramBlock> {
    fence_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let body = caps.get(1)?;
            Some(DiagramBlock {
                start: whole.start(),
                end: whole.end(),
                source: body.as_str().trim_end_matches(['\r', '\n']).to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/diagram.rs"]
mod tests;
