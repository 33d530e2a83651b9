//! Open documents and LSP coordinate conversion.
//!
//! Documents are stored in a [`Rope`] so incremental `didChange` edits and line lookups stay
//! cheap on large files. Positions follow LSP conventions: 0-based lines, `character` counted in
//! UTF-16 code units.

use ropey::Rope;
use std::collections::BTreeMap;
use std::ops::Range as ByteRange;

/// A position in a document (UTF-16 based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// Line number (0-based).
    pub line: u32,
    /// Character offset (UTF-16 code units, 0-based).
    pub character: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A range in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    /// Range start position (inclusive).
    pub start: Position,
    /// Range end position (exclusive).
    pub end: Position,
}

impl Range {
    /// Create a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// One `textDocument/didChange` content change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    /// Replaced range, or `None` for a full-text replacement.
    pub range: Option<Range>,
    /// Replacement text.
    pub text: String,
}

impl ContentChange {
    /// A change replacing the whole document.
    pub fn full(text: impl Into<String>) -> Self {
        Self {
            range: None,
            text: text.into(),
        }
    }

    /// A change replacing `range`.
    pub fn incremental(range: Range, text: impl Into<String>) -> Self {
        Self {
            range: Some(range),
            text: text.into(),
        }
    }
}

/// A text document snapshot owned by the server.
#[derive(Debug, Clone)]
pub struct TextDocument {
    uri: String,
    version: i32,
    rope: Rope,
}

impl TextDocument {
    /// Create a document from its initial text.
    pub fn new(uri: impl Into<String>, version: i32, text: &str) -> Self {
        Self {
            uri: uri.into(),
            version,
            rope: Rope::from_str(text),
        }
    }

    /// Document URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Current version.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Full text of the current snapshot.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Number of lines (a trailing newline starts an empty last line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of `line` without its line ending.
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }

    /// Apply `changes` in order and move to `version`.
    pub fn apply_changes(&mut self, version: i32, changes: &[ContentChange]) {
        for change in changes {
            match change.range {
                None => self.rope = Rope::from_str(&change.text),
                Some(range) => {
                    let start = self.position_to_char(range.start);
                    let end = self.position_to_char(range.end);
                    let (start, end) = (start.min(end), start.max(end));
                    self.rope.remove(start..end);
                    self.rope.insert(start, &change.text);
                }
            }
        }
        self.version = version;
    }

    fn line_content_chars(&self, line: usize) -> usize {
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
        }
        if len > 0 && slice.char(len - 1) == '\r' {
            len -= 1;
        }
        len
    }

    /// Convert a position to a char offset, clamping out-of-range values to the document.
    pub fn position_to_char(&self, position: Position) -> usize {
        let line = position.line as usize;
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let line_start = self.rope.line_to_char(line);
        let line_end = line_start + self.line_content_chars(line);
        let start_utf16 = self.rope.char_to_utf16_cu(line_start);
        let end_utf16 = self.rope.char_to_utf16_cu(line_end);
        let target = (start_utf16 + position.character as usize).min(end_utf16);
        self.rope.utf16_cu_to_char(target)
    }

    /// Convert a byte offset into a position. Offsets past the end clamp to the end.
    pub fn byte_to_position(&self, byte: usize) -> Position {
        let char_idx = self.rope.byte_to_char(byte.min(self.rope.len_bytes()));
        let line = self.rope.char_to_line(char_idx);
        let line_start = self.rope.line_to_char(line);
        let character =
            self.rope.char_to_utf16_cu(char_idx) - self.rope.char_to_utf16_cu(line_start);
        Position::new(line as u32, character as u32)
    }

    /// Convert a byte range into a position range.
    pub fn byte_range_to_range(&self, range: ByteRange<usize>) -> Range {
        Range::new(
            self.byte_to_position(range.start),
            self.byte_to_position(range.end),
        )
    }
}

/// All documents currently open in the editor, keyed by URI.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: BTreeMap<String, TextDocument>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or reopen) a document.
    pub fn open(&mut self, uri: &str, version: i32, text: &str) -> &TextDocument {
        self.documents
            .insert(uri.to_string(), TextDocument::new(uri, version, text));
        &self.documents[uri]
    }

    /// Apply changes to an open document. Returns `None` if it is not open.
    pub fn change(
        &mut self,
        uri: &str,
        version: i32,
        changes: &[ContentChange],
    ) -> Option<&TextDocument> {
        let document = self.documents.get_mut(uri)?;
        document.apply_changes(version, changes);
        Some(document)
    }

    /// Close a document.
    pub fn close(&mut self, uri: &str) -> Option<TextDocument> {
        self.documents.remove(uri)
    }

    /// Look up an open document.
    pub fn get(&self, uri: &str) -> Option<&TextDocument> {
        self.documents.get(uri)
    }

    /// URIs of all open documents, in sorted order.
    pub fn uris(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    /// Number of open documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if no documents are open.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
