//! Generated configuration text and the per-session transcript.

use std::fmt;

use log::debug;

/// One generated command block, as ordered configuration-language lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigText {
    lines: Vec<String>,
}

impl ConfigText {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Get the lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when there is no non-blank line.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    /// Check if any line equals `line` exactly.
    pub fn contains_line(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }

    /// Position of the first line equal to `line`.
    pub fn position(&self, line: &str) -> Option<usize> {
        self.lines.iter().position(|l| l == line)
    }
}

impl fmt::Display for ConfigText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

impl<S: Into<String>> FromIterator<S> for ConfigText {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for ConfigText {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.lines.extend(iter.into_iter().map(Into::into));
    }
}

/// Append-only session transcript of every generated block.
///
/// Blocks are separated by a marker line so the whole session can be
/// copied or exported at once.
#[derive(Debug, Clone)]
pub struct Transcript {
    separator: String,
    buffer: String,
    entries: usize,
}

impl Transcript {
    /// Create an empty transcript using `separator` between entries.
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            buffer: String::new(),
            entries: 0,
        }
    }

    /// Append a generated block.
    pub fn append(&mut self, text: &ConfigText) {
        self.append_text(&text.to_string());
    }

    /// Append raw text. Blank text is ignored.
    pub fn append_text(&mut self, text: &str) {
        let text = text.trim_end_matches(['\r', '\n']);
        if text.trim().is_empty() {
            return;
        }
        if !self.buffer.is_empty() {
            self.buffer.push_str(&self.separator);
            self.buffer.push('\n');
        }
        self.buffer.push_str(text);
        self.buffer.push('\n');
        self.entries += 1;
        debug!("Transcript now holds {} entries", self.entries);
    }

    /// Clear everything. Called when the device context changes.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.entries = 0;
    }

    /// Copy of the full transcript for export.
    pub fn snapshot(&self) -> String {
        self.buffer.clone()
    }

    /// Borrow the full transcript.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Number of appended blocks.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// True when nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The separator line.
    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new("! --- next configuration ---")
    }
}
