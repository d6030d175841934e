//! In-document search: match indexing and a cursor over the results.
//!
//! [`find_matches`] is a pure function over `(text, query)`; the preview and
//! split panes can call it independently without sharing state.

use memchr::memmem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Byte offset into the original text.
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Match {
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy)]
struct FoldSpan {
    folded_start: usize,
    orig_start: usize,
    orig_end: usize,
}

/// Lowercased copy of a text plus the mapping back to original byte offsets.
/// Folding can change a character's encoded length, so offsets found in the
/// folded text cannot be used directly.
struct FoldedText {
    text: String,
    spans: Vec<FoldSpan>,
}

impl FoldedText {
    fn new(source: &str) -> Self {
        let mut text = String::with_capacity(source.len());
        let mut spans = Vec::with_capacity(source.len());
        for (orig_start, ch) in source.char_indices() {
            spans.push(FoldSpan {
                folded_start: text.len(),
                orig_start,
                orig_end: orig_start + ch.len_utf8(),
            });
            text.extend(ch.to_lowercase());
        }
        Self { text, spans }
    }

    fn to_original(&self, start: usize, end: usize) -> (usize, usize) {
        let first = self
            .spans
            .partition_point(|s| s.folded_start <= start)
            .saturating_sub(1);
        let last = self
            .spans
            .partition_point(|s| s.folded_start < end)
            .saturating_sub(1);
        (self.spans[first].orig_start, self.spans[last].orig_end)
    }
}

fn fold_query(query: &str) -> String {
    query.chars().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive substring matches, in text order.
///
/// After a hit at `p` the scan resumes one character past `p` rather than
/// past the end of the hit, so overlapping occurrences are all reported:
/// `"aa"` in `"aaaa"` yields offsets 0, 1 and 2.
pub fn find_matches(text: &str, query: &str) -> Vec<Match> {
    if query.is_empty() || text.is_empty() {
        return Vec::new();
    }

    let needle = fold_query(query);
    let folded = FoldedText::new(text);
    let haystack = folded.text.as_bytes();
    let finder = memmem::Finder::new(needle.as_bytes());

    let source = text.as_bytes();
    let mut matches: Vec<Match> = Vec::new();
    let mut line = 0;
    let mut line_counted_to = 0;
    let mut pos = 0;

    while pos < haystack.len() {
        let Some(rel) = finder.find(&haystack[pos..]) else {
            break;
        };
        let hit = pos + rel;
        let (start, end) = folded.to_original(hit, hit + needle.len());

        if matches.last().map_or(true, |m| m.start != start) {
            line += memchr::memchr_iter(b'\n', &source[line_counted_to..start]).count();
            line_counted_to = start;
            matches.push(Match::new(start, end, line));
        }

        let step = folded.text[hit..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        pos = hit + step;
    }

    matches
}

#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    visible: bool,
    query: String,
    matches: Vec<Match>,
    current: usize,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn current_index(&self) -> Option<usize> {
        if self.matches.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }

    pub fn current_match(&self) -> Option<&Match> {
        self.matches.get(self.current)
    }

    pub fn show(&mut self) -> bool {
        if self.visible {
            return false;
        }
        self.visible = true;
        true
    }

    /// Hides the bar and drops the query so no highlighting lingers.
    pub fn hide(&mut self) -> bool {
        if !self.visible && self.query.is_empty() {
            return false;
        }
        self.visible = false;
        self.query.clear();
        self.matches.clear();
        self.current = 0;
        true
    }

    pub fn set_query(&mut self, query: &str, text: Option<&str>) -> bool {
        if self.query == query {
            return false;
        }
        self.query = query.to_string();
        self.reindex(text);
        true
    }

    /// Recomputes matches after the searched document changed (edit, reload,
    /// or a different active tab).
    pub fn set_text(&mut self, text: Option<&str>) -> bool {
        let before = (self.matches.len(), self.current);
        self.reindex(text);
        !self.query.is_empty() || before != (self.matches.len(), self.current)
    }

    fn reindex(&mut self, text: Option<&str>) {
        self.matches = match text {
            Some(text) => find_matches(text, &self.query),
            None => Vec::new(),
        };
        self.current = 0;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn go_to_next(&mut self) -> bool {
        let len = self.matches.len();
        if len == 0 {
            return false;
        }
        let prev = self.current;
        self.current = (self.current + 1) % len;
        self.current != prev
    }

    pub fn go_to_prev(&mut self) -> bool {
        let len = self.matches.len();
        if len == 0 {
            return false;
        }
        let prev = self.current;
        self.current = if self.current == 0 {
            len - 1
        } else {
            self.current - 1
        };
        self.current != prev
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/search.rs"]
mod tests;
