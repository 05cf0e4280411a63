//! Line-by-line indentation of small QML and JavaScript snippets
//!
//! Every case lists the column the engine must compute for each line of the
//! input, as it stands, without re-indenting anything first.

use qmljs_indent::qmljs::testing::{end_states, indents, reindent};
use qmljs_indent::{Document, Indenter, StateTag, TextBuffer};
use rstest::rstest;

#[rstest]
#[case::object_binding("Item {\nwidth: 100\n}", vec![0, 4, 0])]
#[case::nested_objects("Item {\n    Text {\n        x: 1\n    }\n}", vec![0, 4, 8, 4, 0])]
#[case::imports(
    "import QtQuick 2.15\nimport \"utils.js\" as Utils\nItem {\n}",
    vec![0, 0, 0, 0]
)]
#[case::braceless_if("if (x)\n    foo();", vec![0, 4])]
#[case::statement_after_braceless_if("if (x)\n    foo();\nbar();", vec![0, 4, 0])]
#[case::braceless_else("if (a)\n    b();\nelse\n    c();", vec![0, 4, 0, 4])]
#[case::array_closes_at_statement("var a = [\n  1,\n  2\n]", vec![0, 4, 2, 0])]
#[case::labelled_loop("outer: for (;;)\n    foo();\nbar();", vec![0, 4, 0])]
#[case::continuation("var a = b +\n        c;", vec![0, 8])]
#[case::call_arguments("foo(a,\n    b);", vec![0, 4])]
#[case::ternary("var a = b\n        ? c\n        : d;", vec![0, 8, 8])]
#[case::empty_document("", vec![0])]
fn test_indents(#[case] text: &str, #[case] expected: Vec<i32>) {
    assert_eq!(indents(text), expected);
}

#[rstest]
#[case::script_block("Item {\n    x: {\n        foo();\n    }\n}")]
#[case::property_block("Item {\n    property int x: {\n        return 1;\n    }\n}")]
fn test_binding_block_anchors_at_binding(#[case] text: &str) {
    // The block closes at the binding and its body is one unit deeper.
    assert_eq!(indents(text), vec![0, 4, 8, 4, 0]);
}

#[test]
fn test_top_level_property_block_is_an_object_literal() {
    // Outside an object definition the braces open a JavaScript object
    // literal that closes at the statement column.
    assert_eq!(indents("property int x: {\n    y: 1\n}"), vec![0, 4, 0]);
}

#[rstest]
#[case::readonly("readonly\nx")]
#[case::required("required\nx")]
#[case::enumeration("enum\nx")]
fn test_qml_modifiers_in_statement_position_are_skipped(#[case] text: &str) {
    let states = end_states(text);
    assert_eq!(states[0], vec![StateTag::TopmostIntro, StateTag::TopJs]);
    assert_eq!(indents(text), vec![0, 0]);
}

#[test]
fn test_else_aligns_with_its_if() {
    let text = "function f() {\n    if (a) {\n        b();\n    } else {\n        c();\n    }\n}";
    assert_eq!(indents(text), vec![0, 4, 8, 4, 8, 4, 0]);
}

#[test]
fn test_case_labels_align_with_switch() {
    let text = "switch (x) {\ncase 1:\n    foo();\n    break;\ndefault:\n    bar();\n}";
    assert_eq!(indents(text), vec![0, 0, 4, 4, 0, 4, 0]);
}

#[test]
fn test_block_comment_keeps_its_column() {
    let text = "Item {\n    /* a\n          b */\n    x: 1\n}";
    assert_eq!(indents(text), vec![0, 4, 10, 4, 0]);
}

#[test]
fn test_line_comment_indents_like_code() {
    assert_eq!(indents("Item {\n// note\n}"), vec![0, 4, 0]);
}

#[test]
fn test_multi_line_string_is_left_alone() {
    let text = "Item {\n    text: \"a\nb\"\n}";
    assert_eq!(indents(text), vec![0, 4, -1, 0]);
    assert_eq!(reindent(text), text);
}

#[test]
fn test_reindent_array_elements() {
    assert_eq!(
        reindent("var a = [\n  1,\n  2\n]"),
        "var a = [\n    1,\n    2\n]"
    );
}

#[test]
fn test_reindent_clears_blank_lines() {
    assert_eq!(reindent("Item {\n   \n}"), "Item {\n\n}");
}

#[rstest]
#[case::after_condition("if (x)", 4)]
#[case::after_object_open("Item {", 4)]
#[case::after_complete_statement("foo();", 0)]
fn test_new_line_after(#[case] text: &str, #[case] expected: i32) {
    let mut buffer = TextBuffer::from_text(text);
    let line = buffer.first_line().unwrap();
    let mut indenter = Indenter::default();
    assert_eq!(indenter.indent_new_line_after(&mut buffer, line), expected);
}

#[test]
fn test_new_line_after_binding() {
    let mut buffer = TextBuffer::from_text("Item {\n    x: 1");
    let line = buffer.line_at(1).unwrap();
    let mut indenter = Indenter::default();
    assert_eq!(indenter.indent_new_line_after(&mut buffer, line), 4);
}

#[test]
fn test_edit_changes_following_lines() {
    let mut buffer = TextBuffer::from_text("Item {\nx: 1\n}");
    let mut indenter = Indenter::default();
    let second = buffer.line_at(1).unwrap();
    assert_eq!(indenter.indent_line(&mut buffer, second), 4);

    let first = buffer.first_line().unwrap();
    buffer.set_line_text(first, "foo();");
    indenter
        .formatter_mut()
        .update_line_state_change(&mut buffer, first);
    assert_eq!(indenter.indent_line(&mut buffer, second), 0);
}
