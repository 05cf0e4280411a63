//! Per-line block cache
//!
//!     Every line carries a [`BlockData`] snapshot: the automaton stack at the
//!     start and at the end of the line, the indent depth reached at its end and
//!     the revision of the text it was computed from. Re-indenting line N then
//!     only needs the snapshot of line N - 1, and after an edit only the lines
//!     whose snapshots went stale are replayed.
//!
//!     The engine does not own this storage. It reads and writes it through the
//!     four hooks of [`BlockStore`], which an editor implements on whatever it
//!     keeps per line (see [`crate::qmljs::document::TextBuffer`] for the
//!     in-memory implementation).

use crate::qmljs::state::StateStack;
use crate::qmljs::token::LexerState;
use std::fmt::Debug;

/// Cached automaton snapshot for one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockData {
    /// Stack at the start of the line, i.e. the previous line's end stack.
    pub begin_state: StateStack,
    /// Stack after the last token of the line.
    pub end_state: StateStack,
    /// Indent depth after the last token of the line.
    pub indent_depth: i32,
    /// Revision of the line text this was computed from; `None` once invalidated.
    pub revision: Option<u64>,
}

impl BlockData {
    /// The "unknown" sentinel: never matches any line revision.
    pub fn invalid() -> Self {
        BlockData::default()
    }

    pub fn is_valid(&self) -> bool {
        self.revision.is_some()
    }
}

/// Storage hooks the engine uses to persist per-line state.
pub trait BlockStore {
    /// Stable handle of a line.
    type Line: Copy + Eq + Debug;

    fn save_block_data(&mut self, line: Self::Line, data: BlockData);

    fn load_block_data(&self, line: Self::Line) -> Option<&BlockData>;

    /// Record the scanner state at the end of `line`.
    fn save_lexer_state(&mut self, line: Self::Line, state: LexerState);

    /// Scanner state at the end of `line`, `None` when unknown.
    fn load_lexer_state(&self, line: Self::Line) -> Option<LexerState>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qmljs::state::initial_state;

    #[test]
    fn test_invalid_block_data_has_no_revision() {
        let data = BlockData::invalid();
        assert!(!data.is_valid());
        assert!(data.end_state.is_empty());
    }

    #[test]
    fn test_valid_block_data() {
        let data = BlockData {
            begin_state: initial_state(),
            end_state: initial_state(),
            indent_depth: 4,
            revision: Some(3),
        };
        assert!(data.is_valid());
        assert_ne!(data, BlockData::invalid());
    }
}
