//! Document access
//!
//!     The formatter walks a document line by line and needs four things from
//!     it: neighbouring lines, a line's text, a revision that changes whenever
//!     that text changes, and somewhere to keep per-line state. [`Document`]
//!     is that contract, with the storage half inherited from [`BlockStore`].
//!
//!     [`TextBuffer`] is the in-memory implementation used by the indenter and
//!     the CLI. Lines are addressed by [`LineId`], which survives insertions and
//!     removals around the line, so cached state stays attached to the text it
//!     was computed from.

use crate::qmljs::cache::{BlockData, BlockStore};
use crate::qmljs::token::LexerState;
use serde::Serialize;
use std::collections::HashMap;

/// Line-oriented view of a document.
pub trait Document: BlockStore {
    fn first_line(&self) -> Option<Self::Line>;

    fn next_line(&self, line: Self::Line) -> Option<Self::Line>;

    fn previous_line(&self, line: Self::Line) -> Option<Self::Line>;

    /// Text of `line` without its line terminator.
    fn line_text(&self, line: Self::Line) -> &str;

    /// Changes whenever the text of `line` changes.
    fn revision(&self, line: Self::Line) -> u64;
}

/// Stable handle of a line in a [`TextBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineId(u64);

#[derive(Debug, Clone)]
struct LineEntry {
    id: LineId,
    text: String,
    revision: u64,
    block: Option<BlockData>,
    lexer_state: Option<LexerState>,
}

/// An editable, in-memory document.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    lines: Vec<LineEntry>,
    positions: HashMap<LineId, usize>,
    next_id: u64,
    next_revision: u64,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `text` on `\n`. A trailing newline yields a final empty line,
    /// and a `\r` before the newline stays part of the line.
    pub fn from_text(text: &str) -> Self {
        let mut buffer = TextBuffer::new();
        for line in text.split('\n') {
            buffer.push_line(line);
        }
        buffer
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_at(&self, index: usize) -> Option<LineId> {
        self.lines.get(index).map(|entry| entry.id)
    }

    pub fn index_of(&self, line: LineId) -> Option<usize> {
        self.positions.get(&line).copied()
    }

    pub fn lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.lines.iter().map(|entry| entry.id)
    }

    /// The whole document, lines joined with `\n`.
    pub fn text(&self) -> String {
        let texts: Vec<&str> = self.lines.iter().map(|entry| entry.text.as_str()).collect();
        texts.join("\n")
    }

    pub fn push_line(&mut self, text: &str) -> LineId {
        self.insert_line(self.lines.len(), text)
    }

    /// Insert a line before `index` (clamped to the end) and return its id.
    pub fn insert_line(&mut self, index: usize, text: &str) -> LineId {
        let index = index.min(self.lines.len());
        let id = LineId(self.next_id);
        self.next_id += 1;
        let revision = self.bump_revision();
        self.lines.insert(
            index,
            LineEntry {
                id,
                text: text.to_string(),
                revision,
                block: None,
                lexer_state: None,
            },
        );
        self.reindex_from(index);
        id
    }

    /// Remove `line`, returning its text.
    ///
    /// The line that moves into its place loses its cached state, since the
    /// state it started from is gone.
    pub fn remove_line(&mut self, line: LineId) -> Option<String> {
        let index = self.positions.remove(&line)?;
        let entry = self.lines.remove(index);
        if let Some(successor) = self.lines.get_mut(index) {
            successor.block = None;
        }
        self.reindex_from(index);
        Some(entry.text)
    }

    /// Replace the text of `line`. Returns `false` for an unknown line.
    pub fn set_line_text(&mut self, line: LineId, text: &str) -> bool {
        let revision = self.bump_revision();
        match self.entry_mut(line) {
            Some(entry) => {
                entry.text = text.to_string();
                entry.revision = revision;
                true
            }
            None => false,
        }
    }

    fn bump_revision(&mut self) -> u64 {
        self.next_revision += 1;
        self.next_revision
    }

    fn reindex_from(&mut self, index: usize) {
        for (position, entry) in self.lines.iter().enumerate().skip(index) {
            self.positions.insert(entry.id, position);
        }
    }

    fn entry(&self, line: LineId) -> Option<&LineEntry> {
        self.index_of(line).map(|index| &self.lines[index])
    }

    fn entry_mut(&mut self, line: LineId) -> Option<&mut LineEntry> {
        let index = self.index_of(line)?;
        self.lines.get_mut(index)
    }
}

impl BlockStore for TextBuffer {
    type Line = LineId;

    fn save_block_data(&mut self, line: LineId, data: BlockData) {
        if let Some(entry) = self.entry_mut(line) {
            entry.block = Some(data);
        }
    }

    fn load_block_data(&self, line: LineId) -> Option<&BlockData> {
        self.entry(line).and_then(|entry| entry.block.as_ref())
    }

    fn save_lexer_state(&mut self, line: LineId, state: LexerState) {
        if let Some(entry) = self.entry_mut(line) {
            entry.lexer_state = Some(state);
        }
    }

    fn load_lexer_state(&self, line: LineId) -> Option<LexerState> {
        self.entry(line).and_then(|entry| entry.lexer_state)
    }
}

impl Document for TextBuffer {
    fn first_line(&self) -> Option<LineId> {
        self.line_at(0)
    }

    fn next_line(&self, line: LineId) -> Option<LineId> {
        self.index_of(line).and_then(|index| self.line_at(index + 1))
    }

    fn previous_line(&self, line: LineId) -> Option<LineId> {
        self.index_of(line)
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| self.line_at(index))
    }

    fn line_text(&self, line: LineId) -> &str {
        self.entry(line).map(|entry| entry.text.as_str()).unwrap_or("")
    }

    fn revision(&self, line: LineId) -> u64 {
        self.entry(line).map(|entry| entry.revision).unwrap_or(0)
    }
}
