//! Testing utilities
//!
//!     Indentation tests go wrong in a specific way: a hand-typed snippet with a
//!     stray space asserts the wrong thing, and nobody notices because the
//!     engine agrees with it on every other line. Two rules keep that in check:
//!
//!         1. Whole-file expectations come from the vetted samples in
//!            `samples/` (via [`Sample`]). A sample is correct when re-indenting
//!            it changes nothing, which [`assert_well_indented`] checks.
//!         2. Targeted expectations state columns explicitly, per line, with
//!            [`indents`], rather than comparing against re-typed text.

use crate::qmljs::cache::BlockStore;
use crate::qmljs::config::{load_defaults, IndentConfig};
use crate::qmljs::document::TextBuffer;
use crate::qmljs::indenter::Indenter;
use crate::qmljs::state::StateTag;

/// Vetted, correctly indented source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    /// Nested QML objects, bindings, lists and arrays.
    QmlObjects,
    /// Imports, properties with modifiers, signals, enums and functions.
    QmlDeclarations,
    /// JavaScript statements: if/else chains, loops, switch, try/catch.
    JsStatements,
    /// Comments and multi-line strings.
    CommentsAndStrings,
}

impl Sample {
    pub const ALL: [Sample; 4] = [
        Sample::QmlObjects,
        Sample::QmlDeclarations,
        Sample::JsStatements,
        Sample::CommentsAndStrings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sample::QmlObjects => "qml_objects.qml",
            Sample::QmlDeclarations => "qml_declarations.qml",
            Sample::JsStatements => "js_statements.js",
            Sample::CommentsAndStrings => "comments_and_strings.qml",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            Sample::QmlObjects => include_str!("../../samples/qml_objects.qml"),
            Sample::QmlDeclarations => include_str!("../../samples/qml_declarations.qml"),
            Sample::JsStatements => include_str!("../../samples/js_statements.js"),
            Sample::CommentsAndStrings => include_str!("../../samples/comments_and_strings.qml"),
        }
    }
}

fn default_config() -> IndentConfig {
    load_defaults().expect("embedded defaults to load")
}

/// The indent the engine computes for every line of `text`, without
/// modifying it.
pub fn indents(text: &str) -> Vec<i32> {
    let mut buffer = TextBuffer::from_text(text);
    let mut indenter = Indenter::new(&default_config());
    let lines: Vec<_> = buffer.lines().collect();
    lines
        .into_iter()
        .map(|line| indenter.indent_line(&mut buffer, line))
        .collect()
}

/// State tags at the end of every line of `text`.
pub fn end_states(text: &str) -> Vec<Vec<StateTag>> {
    let mut buffer = TextBuffer::from_text(text);
    let mut indenter = Indenter::new(&default_config());
    let lines: Vec<_> = buffer.lines().collect();
    if let Some(&last) = lines.last() {
        indenter.formatter_mut().update_state_until(&mut buffer, last);
    }
    lines
        .iter()
        .map(|&line| {
            buffer
                .load_block_data(line)
                .map(|data| data.end_state.tags())
                .unwrap_or_default()
        })
        .collect()
}

/// Re-indent `text` with the default configuration.
pub fn reindent(text: &str) -> String {
    Indenter::new(&default_config()).reindent_text(text)
}

/// Panic with the first differing line unless `text` is a fixed point of
/// re-indentation.
pub fn assert_well_indented(text: &str) {
    let result = reindent(text);
    if result == text {
        return;
    }
    let mismatch = text
        .lines()
        .zip(result.lines())
        .enumerate()
        .find(|(_, (expected, actual))| expected != actual);
    match mismatch {
        Some((index, (expected, actual))) => panic!(
            "line {} re-indented differently\n  expected: {:?}\n  actual:   {:?}",
            index + 1,
            expected,
            actual
        ),
        None => panic!("re-indentation changed the line structure"),
    }
}
