//! Property-based tests for the indentation engine
//!
//! Documents are assembled from a pool of QML/JavaScript lines, which keeps
//! the generated input close to what an editor actually sees while still
//! producing plenty of unbalanced and half-typed code.

use proptest::prelude::*;
use qmljs_indent::qmljs::testing::{indents, reindent};
use qmljs_indent::{Indenter, LineId, TextBuffer};

const LINES: &[&str] = &[
    "Item {",
    "}",
    "width: 100",
    "x: {",
    "property int count: 3",
    "readonly property var list: [",
    "1,",
    "]",
    "import QtQuick 2.15",
    "signal clicked(int x)",
    "function f(a, b) {",
    "if (a > b)",
    "if (a) {",
    "} else {",
    "else",
    "return a;",
    "foo(a,",
    "b);",
    "var a = b +",
    "? c",
    ": d;",
    "switch (x) {",
    "case 1:",
    "default:",
    "break;",
    "try {",
    "} catch (e) {",
    "do {",
    "} while (x);",
    "/* open comment",
    "comment text */",
    "// line comment",
    "text: \"open string",
    "string end\"",
    "",
];

#[derive(Debug, Clone)]
enum Edit {
    Insert(usize, &'static str),
    Remove(usize),
    Replace(usize, &'static str),
}

fn line() -> impl Strategy<Value = &'static str> {
    prop::sample::select(LINES)
}

fn indented_line() -> impl Strategy<Value = String> {
    (0usize..12, line()).prop_map(|(indent, text)| format!("{}{}", " ".repeat(indent), text))
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0usize..32, line()).prop_map(|(index, text)| Edit::Insert(index, text)),
        (0usize..32).prop_map(Edit::Remove),
        (0usize..32, line()).prop_map(|(index, text)| Edit::Replace(index, text)),
    ]
}

fn all_indents(indenter: &mut Indenter, buffer: &mut TextBuffer) -> Vec<i32> {
    let lines: Vec<LineId> = buffer.lines().collect();
    lines
        .into_iter()
        .map(|line| indenter.indent_line(buffer, line))
        .collect()
}

/// Apply `edit` the way an editor would, notifying the formatter of the
/// changed line.
fn apply(indenter: &mut Indenter, buffer: &mut TextBuffer, edit: &Edit) {
    let count = buffer.line_count();
    match *edit {
        Edit::Insert(index, text) => {
            let line = buffer.insert_line(index % (count + 1), text);
            indenter
                .formatter_mut()
                .update_line_state_change(buffer, line);
        }
        Edit::Remove(index) => {
            if count > 1 {
                if let Some(line) = buffer.line_at(index % count) {
                    buffer.remove_line(line);
                }
            }
        }
        Edit::Replace(index, text) => {
            if let Some(line) = buffer.line_at(index % count) {
                buffer.set_line_text(line, text);
                indenter
                    .formatter_mut()
                    .update_line_state_change(buffer, line);
            }
        }
    }
}

proptest! {
    #[test]
    fn incremental_indents_match_fresh_computation(
        lines in prop::collection::vec(line(), 1..16),
        edits in prop::collection::vec(edit(), 0..8),
    ) {
        let mut buffer = TextBuffer::from_text(&lines.join("\n"));
        let mut indenter = Indenter::default();
        all_indents(&mut indenter, &mut buffer);

        for edit in &edits {
            apply(&mut indenter, &mut buffer, edit);
        }

        let incremental = all_indents(&mut indenter, &mut buffer);
        prop_assert_eq!(incremental, indents(&buffer.text()));
    }

    #[test]
    fn reindent_is_idempotent(lines in prop::collection::vec(indented_line(), 1..16)) {
        let once = reindent(&lines.join("\n"));
        let twice = reindent(&once);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn reindent_keeps_line_structure(text in "[a-zA-Z0-9 (){}\\[\\];:,.?!=+*/\"'`\n\t-]{0,200}") {
        let result = reindent(&text);
        prop_assert_eq!(result.split('\n').count(), text.split('\n').count());
        for (before, after) in text.split('\n').zip(result.split('\n')) {
            prop_assert_eq!(before.trim_start_matches([' ', '\t']), after.trim_start_matches([' ', '\t']));
        }
    }

    #[test]
    fn indents_are_never_below_minus_one(text in "[a-zA-Z (){}\\[\\];:,?\"/*\n]{0,120}") {
        for indent in indents(&text) {
            prop_assert!(indent >= -1, "indent {} out of range", indent);
        }
    }
}
