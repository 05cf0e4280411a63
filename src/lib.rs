//! # qmljs-indent
//!
//! Incremental auto-indentation for QML and JavaScript sources.
//!
//! File Layout
//!
//! Everything lives under [`qmljs`]. The pieces, leaves first:
//!
//! src/qmljs
//!   ├── token        Tokens, generic token kinds and the lexer sub-state
//!   ├── scanner      Line scanner (logos) honouring multi-line comments/strings
//!   ├── classifier   Extended token kinds (contextual keywords, `?`, `++`, `--`)
//!   ├── state        Automaton states and stacks
//!   ├── formatter    The pushdown automaton and its incremental drivers
//!   ├── policy       Pluggable indentation policy (Qt style by default)
//!   ├── cache        Per-line block data and the storage hooks
//!   ├── document     Text access contract and an in-memory buffer
//!   ├── indenter     High level entry points used by editors and the CLI
//!   ├── config       Layered configuration
//!   ├── testing      Sample documents and assertion helpers for tests
//!   └── error        Errors for the fallible outer surfaces
//!
//! The engine never builds a syntax tree. It keeps, per line, the stack of
//! syntactic contexts that are still open at the end of that line, and derives
//! indentation from it.

pub mod qmljs;

pub use qmljs::cache::{BlockData, BlockStore};
pub use qmljs::config::{IndentConfig, Loader};
pub use qmljs::document::{Document, LineId, TextBuffer};
pub use qmljs::error::IndentError;
pub use qmljs::formatter::CodeFormatter;
pub use qmljs::indenter::Indenter;
pub use qmljs::policy::{IndentPolicy, QtStylePolicy};
pub use qmljs::state::{initial_state, State, StateStack, StateTag};
pub use qmljs::token::{LexerState, Token, TokenKind};
