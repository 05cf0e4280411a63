//! The Qt Creator indentation style.

use super::{Depths, IndentPolicy};
use crate::qmljs::classifier::ExtendedKind as K;
use crate::qmljs::formatter::FormatterContext;
use crate::qmljs::state::StateTag as S;
use crate::qmljs::token::LexerState;

/// Continuation lines get two units, blocks one. `case` labels sit at the
/// level of their `switch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QtStylePolicy {
    indent_size: i32,
}

impl Default for QtStylePolicy {
    fn default() -> Self {
        QtStylePolicy { indent_size: 4 }
    }
}

impl QtStylePolicy {
    pub fn new(indent_size: usize) -> Self {
        let mut policy = QtStylePolicy::default();
        policy.set_indent_size(indent_size);
        policy
    }

    pub fn indent_size(&self) -> usize {
        self.indent_size as usize
    }

    pub fn set_indent_size(&mut self, indent_size: usize) {
        self.indent_size = i32::try_from(indent_size).unwrap_or(i32::MAX);
    }
}

impl IndentPolicy for QtStylePolicy {
    fn on_enter(&self, new_state: S, cx: &FormatterContext, depths: &mut Depths) {
        let unit = self.indent_size;
        let parent = cx.state(0);
        let token = cx.current_token();
        let token_position = cx.column(token.offset);
        let first_token = cx.is_first_token();
        let last_token = cx.is_last_token();

        match new_state {
            S::ObjectDefinitionOpen => {
                // `foo: Item {` and `property Item foo: Item {` anchor at the binding.
                if parent.tag == S::BindingAssignment {
                    depths.saved = cx.state(1).saved_indent_depth;
                }
                if first_token {
                    depths.saved = token_position;
                }
                depths.indent = depths.saved.saturating_add(unit);
            }

            S::BindingOrObjectDefinition => {
                if first_token {
                    depths.saved = token_position;
                    depths.indent = token_position;
                }
            }

            S::BindingAssignment | S::ObjectLiteralAssignment => {
                depths.indent = if last_token {
                    depths.saved.saturating_add(unit)
                } else {
                    let next = cx.token_at(cx.token_index() + 1);
                    cx.column(next.offset)
                };
            }

            S::ExpressionOrObjectDefinition => depths.indent = token_position,

            S::ExpressionOrLabel => {
                if depths.indent == token_position {
                    depths.indent = depths.indent.saturating_add(unit.saturating_mul(2));
                } else {
                    depths.indent = token_position;
                }
            }

            S::Expression => {
                let after_identifier = matches!(
                    parent.tag,
                    S::ExpressionOrObjectDefinition | S::ExpressionOrLabel
                );
                if depths.indent == token_position {
                    // Array elements on their own line are not continuations.
                    if !after_identifier
                        && parent.tag != S::BindingAssignment
                        && parent.tag != S::BracketOpen
                    {
                        depths.indent = depths.indent.saturating_add(unit.saturating_mul(2));
                    }
                } else if !after_identifier {
                    depths.indent = token_position;
                }
            }

            S::ExpressionMaybeContinuation => {
                // Continuations indent relative to the enclosing statement.
                let mut i = 1;
                while cx.state(i).tag != S::TopmostIntro {
                    let tag = cx.state(i).tag;
                    if tag.is_expression_end_state() && !tag.is_braceless_state() {
                        depths.indent = cx.state(i - 1).saved_indent_depth;
                        break;
                    }
                    i += 1;
                }
            }

            S::BracketOpen => {
                if parent.tag == S::Expression && cx.state(1).tag == S::BindingAssignment {
                    depths.saved = cx.state(2).saved_indent_depth;
                    depths.indent = depths.saved.saturating_add(unit);
                } else if parent.tag == S::ObjectLiteralAssignment {
                    depths.saved = parent.saved_indent_depth;
                    depths.indent = depths.saved.saturating_add(unit);
                } else {
                    // `var a = [` closes at the statement, not at the continuation.
                    if parent.tag == S::Expression {
                        depths.saved = expression_base(cx);
                    }
                    depths.indent = if last_token {
                        depths.saved.saturating_add(unit)
                    } else {
                        token_position.saturating_add(1)
                    };
                }
            }

            S::FunctionStart => {
                let first = cx.token_at(0);
                depths.saved = cx.column(first.offset);
                depths.indent = depths.saved;
            }

            S::DoStatementWhileParenOpen
            | S::StatementWithConditionParenOpen
            | S::SignalArglistOpen
            | S::FunctionArglistOpen
            | S::ParenOpen => {
                if last_token {
                    depths.indent = depths.indent.saturating_add(unit);
                } else {
                    depths.indent = token_position.saturating_add(1);
                }
            }

            S::TernaryOp => {
                if last_token {
                    depths.indent = depths.indent.saturating_add(unit);
                } else {
                    let length = i32::try_from(token.length).unwrap_or(i32::MAX);
                    depths.indent = token_position.saturating_add(length).saturating_add(1);
                }
            }

            S::JsBlockOpen if parent.tag == S::CaseCont => {
                // `case x: {` keeps the case body depth.
                depths.saved = parent.saved_indent_depth;
            }

            S::JsBlockOpen | S::SubstatementOpen => {
                if parent.tag == S::BindingAssignment {
                    depths.saved = cx.state(1).saved_indent_depth;
                }
                depths.indent = depths.saved.saturating_add(unit);
            }

            S::Substatement => depths.indent = depths.indent.saturating_add(unit),

            S::ObjectLiteralOpen => {
                if matches!(parent.tag, S::Expression | S::ObjectLiteralAssignment) {
                    depths.indent = expression_base(cx);
                    depths.saved = depths.indent;
                }
                depths.indent = depths.indent.saturating_add(unit);
            }

            S::StatementWithCondition
            | S::TryStatement
            | S::CatchStatement
            | S::FinallyStatement
            | S::IfStatement
            | S::DoStatement
            | S::SwitchStatement => {
                if first_token || parent.tag == S::BindingAssignment {
                    depths.saved = token_position;
                }
                depths.indent = depths.saved;
                // `else if` on one line: the if belongs at the else.
                if !first_token
                    && new_state == S::IfStatement
                    && parent.tag == S::Substatement
                    && cx.state(1).tag == S::ElseClause
                {
                    depths.indent = cx.state(1).saved_indent_depth;
                    depths.saved = depths.indent;
                }
            }

            S::MaybeElse | S::MaybeCatchOrFinally => {
                let mut last_non_end = 0;
                while !cx.state(last_non_end + 1).tag.is_expression_end_state() {
                    last_non_end += 1;
                }
                depths.indent = cx.state(last_non_end).saved_indent_depth;
            }

            S::ConditionOpen => {
                if token_position <= depths.indent.saturating_add(unit) {
                    depths.indent = depths.indent.saturating_add(unit.saturating_mul(2));
                } else {
                    depths.indent = token_position.saturating_add(1);
                }
            }

            S::CaseStart => depths.saved = token_position,

            S::CaseCont => depths.indent = depths.indent.saturating_add(unit),

            S::MultiLineCommentStart => depths.indent = token_position.saturating_add(2),

            S::MultiLineCommentCont => depths.indent = token_position,

            _ => {}
        }
    }

    fn adjust_indent(&self, cx: &FormatterContext, start_state: LexerState, indent_depth: &mut i32) {
        let top = cx.state(0);
        let tokens = cx.tokens();

        // Comment lines keep their alignment.
        if top.tag.is_multi_line_comment() && !tokens.is_empty() {
            *indent_depth = cx.column(tokens[0].offset);
            return;
        }
        // The text of a multi-line string is never touched.
        if start_state.is_in_multi_line_string() {
            *indent_depth = -1;
            return;
        }

        let first = cx.token_at(0);
        match cx.kind(&first) {
            K::LeftBrace => {
                if matches!(top.tag, S::Substatement | S::BindingAssignment | S::CaseCont) {
                    *indent_depth = top.saved_indent_depth;
                }
            }

            K::RightBrace => {
                if top.tag == S::JsBlockOpen && cx.state(1).tag == S::CaseCont {
                    *indent_depth = cx.state(1).saved_indent_depth;
                    return;
                }
                if let Some(state) = cx.stack().iter().rev().find(|state| {
                    matches!(
                        state.tag,
                        S::ObjectDefinitionOpen
                            | S::JsBlockOpen
                            | S::SubstatementOpen
                            | S::ObjectLiteralOpen
                    )
                }) {
                    *indent_depth = state.saved_indent_depth;
                }
            }

            K::RightBracket => {
                if let Some(state) = cx
                    .stack()
                    .iter()
                    .rev()
                    .find(|state| state.tag == S::BracketOpen)
                {
                    *indent_depth = state.saved_indent_depth;
                }
            }

            K::LeftBracket | K::LeftParenthesis | K::Delimiter => {
                if top.tag == S::ExpressionMaybeContinuation {
                    *indent_depth = top.saved_indent_depth;
                }
            }

            K::Else => {
                if top.tag == S::MaybeElse {
                    *indent_depth = cx.state(1).saved_indent_depth;
                } else if top.tag == S::ExpressionMaybeContinuation {
                    // The else closes a braceless if whose expression statement
                    // just ended: find that if, skipping nested if/else pairs.
                    let mut has_else = false;
                    let mut i = 1;
                    while cx.state(i).tag != S::TopmostIntro {
                        let state = cx.state(i);
                        if state.tag == S::ElseClause {
                            has_else = true;
                        } else if state.tag == S::IfStatement {
                            if has_else {
                                has_else = false;
                            } else {
                                *indent_depth = state.saved_indent_depth;
                                break;
                            }
                        }
                        i += 1;
                    }
                }
            }

            K::Catch | K::Finally => {
                if top.tag == S::MaybeCatchOrFinally {
                    *indent_depth = cx.state(1).saved_indent_depth;
                }
            }

            K::Colon => {
                if top.tag == S::TernaryOp {
                    *indent_depth = indent_depth.saturating_sub(2);
                }
            }

            K::Question => {
                if top.tag == S::ExpressionMaybeContinuation {
                    *indent_depth = top.saved_indent_depth;
                }
            }

            K::Default | K::Case => {
                if let Some(state) = cx
                    .stack()
                    .iter()
                    .rev()
                    .find(|state| matches!(state.tag, S::SwitchStatement | S::CaseCont))
                {
                    *indent_depth = state.saved_indent_depth;
                }
            }

            _ => {}
        }
    }
}

/// Depth of the statement an expression belongs to, without the
/// continuation indent the expression itself added.
fn expression_base(cx: &FormatterContext) -> i32 {
    let label = cx.state(1);
    if label.tag == S::ExpressionOrLabel {
        label.saved_indent_depth
    } else {
        cx.state(0).saved_indent_depth
    }
}
