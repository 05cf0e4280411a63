//! Per-state token handling
//!
//! One arm per top state. Tokens a state has no rule for are consumed without
//! touching the stack, which is how the automaton absorbs broken code: the
//! worst an unexpected token can do is leave a context open a little longer.
//!
//! Statements and the openers that may appear inside any expression are
//! recognised by [`CodeFormatter::try_statement`] and
//! [`CodeFormatter::try_inside_expression`], shared by every state that
//! accepts them.

use super::{CodeFormatter, Step};
use crate::qmljs::classifier::ExtendedKind as K;
use crate::qmljs::policy::IndentPolicy;
use crate::qmljs::state::StateTag as S;
use crate::qmljs::token::LexerState;
use tracing::warn;

/// Outcome of the shared statement and expression recognisers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Dispatch {
    /// The token does not start anything the recogniser knows.
    NotHandled,
    Consumed,
    /// New states were entered and the token must be seen again.
    Retry,
}

impl Dispatch {
    fn step(self) -> Option<Step> {
        match self {
            Dispatch::NotHandled => None,
            Dispatch::Consumed => Some(Step::Advance),
            Dispatch::Retry => Some(Step::Retry),
        }
    }
}

impl<P: IndentPolicy> CodeFormatter<P> {
    /// Feed the current token to the top state.
    pub(super) fn dispatch(&mut self, kind: K, end_lexer_state: LexerState) -> Step {
        let top = self.top_tag();
        match top {
            S::TopmostIntro => match kind {
                K::Identifier => {
                    self.enter(S::ObjectDefinitionOrJs);
                    Step::Retry
                }
                K::Import => {
                    self.enter(S::TopQml);
                    Step::Retry
                }
                K::LeftBrace => {
                    // A lone object literal, as in a JSON file.
                    self.enter(S::TopJs);
                    self.enter(S::Expression);
                    Step::Retry
                }
                _ => {
                    self.enter(S::TopJs);
                    Step::Retry
                }
            },

            S::TopQml => {
                match kind {
                    K::Import => self.enter(S::ImportStart),
                    K::Identifier => self.enter(S::BindingOrObjectDefinition),
                    _ => {}
                }
                Step::Advance
            }

            S::TopJs => self.statement_or_advance(kind),

            S::ObjectDefinitionOrJs => match kind {
                K::Dot => Step::Advance,
                K::Identifier => {
                    let token = self.cx.current_token();
                    let uppercase = self
                        .cx
                        .text(&token)
                        .chars()
                        .next()
                        .is_some_and(char::is_uppercase);
                    if uppercase {
                        Step::Advance
                    } else {
                        self.turn_into(S::TopJs);
                        Step::Retry
                    }
                }
                K::LeftBrace => {
                    self.turn_into(S::BindingOrObjectDefinition);
                    Step::Retry
                }
                _ => {
                    self.turn_into(S::TopJs);
                    Step::Retry
                }
            },

            S::ImportStart => {
                self.enter(S::ImportMaybeDotOrVersionOrAs);
                Step::Advance
            }
            S::ImportMaybeDotOrVersionOrAs => match kind {
                K::Dot => self.turn_and_advance(S::ImportDot),
                K::As => self.turn_and_advance(S::ImportAs),
                K::Number => self.turn_and_advance(S::ImportMaybeAs),
                _ => self.finish_import(),
            },
            S::ImportMaybeAs => match kind {
                K::As => self.turn_and_advance(S::ImportAs),
                _ => self.finish_import(),
            },
            S::ImportDot => match kind {
                K::Identifier => self.turn_and_advance(S::ImportMaybeDotOrVersionOrAs),
                _ => self.finish_import(),
            },
            S::ImportAs => {
                if kind == K::Identifier {
                    self.leave(false);
                    self.leave(false);
                }
                Step::Advance
            }

            S::BindingOrObjectDefinition => {
                match kind {
                    K::Colon => self.enter(S::BindingAssignment),
                    K::LeftBrace => self.enter(S::ObjectDefinitionOpen),
                    _ => {}
                }
                Step::Advance
            }

            S::BindingAssignment => match kind {
                K::Semicolon | K::RightBracket | K::RightParenthesis => {
                    self.leave(true);
                    Step::Advance
                }
                K::If => self.enter_and_advance(S::IfStatement),
                K::With => self.enter_and_advance(S::StatementWithCondition),
                K::Try => self.enter_and_advance(S::TryStatement),
                K::Switch => self.enter_and_advance(S::SwitchStatement),
                K::LeftBrace => self.enter_and_advance(S::JsBlockOpen),
                K::On | K::As | K::List | K::Import | K::Signal | K::Property | K::Identifier => {
                    self.enter_and_advance(S::ExpressionOrObjectDefinition)
                }
                _ => {
                    self.enter(S::Expression);
                    Step::Retry
                }
            },

            S::ObjectDefinitionOpen => match kind {
                K::RightBrace => {
                    self.leave(true);
                    Step::Advance
                }
                K::Default | K::Readonly | K::Required => {
                    self.enter_and_advance(S::PropertyModifiers)
                }
                K::Property => self.enter_and_advance(S::PropertyStart),
                K::Function => self.enter_and_advance(S::FunctionStart),
                K::Signal => self.enter_and_advance(S::SignalStart),
                K::Enum => self.enter_and_advance(S::EnumStart),
                K::On | K::As | K::List | K::Import | K::Identifier => {
                    self.enter_and_advance(S::BindingOrObjectDefinition)
                }
                _ => Step::Advance,
            },

            S::PropertyModifiers => match kind {
                K::Property => self.turn_and_advance(S::PropertyStart),
                K::Default | K::Readonly | K::Required => Step::Advance,
                _ => {
                    self.leave(true);
                    Step::Advance
                }
            },

            S::PropertyStart => match kind {
                K::Colon => self.enter_and_advance(S::BindingAssignment),
                K::Var | K::Identifier => self.enter_and_advance(S::PropertyName),
                K::List => self.enter_and_advance(S::PropertyListOpen),
                _ => {
                    self.leave(true);
                    Step::Retry
                }
            },
            S::PropertyListOpen => {
                let token = self.cx.current_token();
                if self.cx.text(&token) == ">" {
                    self.turn_into(S::PropertyName);
                }
                Step::Advance
            }
            S::PropertyName => self.turn_and_advance(S::PropertyMaybeInitializer),
            S::PropertyMaybeInitializer => match kind {
                K::Colon => self.turn_and_advance(S::BindingAssignment),
                _ => {
                    self.leave(true);
                    Step::Retry
                }
            },

            S::EnumStart => {
                if kind == K::LeftBrace {
                    self.enter(S::ObjectLiteralOpen);
                }
                Step::Advance
            }

            S::SignalStart => match kind {
                K::Colon => self.enter_and_advance(S::BindingAssignment),
                _ => self.enter_and_advance(S::SignalMaybeArglist),
            },
            S::SignalMaybeArglist => match kind {
                K::LeftParenthesis => self.turn_and_advance(S::SignalArglistOpen),
                _ => {
                    self.leave(true);
                    Step::Retry
                }
            },
            S::SignalArglistOpen => {
                if kind == K::RightParenthesis {
                    self.leave(true);
                }
                Step::Advance
            }

            S::FunctionStart => {
                if kind == K::LeftParenthesis {
                    self.enter(S::FunctionArglistOpen);
                }
                Step::Advance
            }
            S::FunctionArglistOpen => {
                if kind == K::RightParenthesis {
                    self.turn_into(S::FunctionArglistClosed);
                }
                Step::Advance
            }
            S::FunctionArglistClosed => match kind {
                K::LeftBrace => self.turn_and_advance(S::JsBlockOpen),
                _ => {
                    self.leave(true);
                    Step::Retry
                }
            },

            S::ExpressionOrObjectDefinition => match kind {
                K::Dot | K::Identifier => Step::Advance,
                K::LeftBrace => self.turn_and_advance(S::ObjectDefinitionOpen),
                K::RightBracket | K::RightParenthesis => {
                    self.leave(false);
                    Step::Retry
                }
                _ => {
                    self.enter(S::Expression);
                    Step::Retry
                }
            },

            S::ExpressionOrLabel => match kind {
                K::Colon => self.turn_and_advance(S::LabelledStatement),
                K::RightBracket | K::RightParenthesis => {
                    self.leave(false);
                    Step::Retry
                }
                _ => {
                    self.enter(S::Expression);
                    Step::Retry
                }
            },

            S::TernaryOp if kind == K::Colon => {
                self.enter(S::TernaryOpAfterColon);
                self.enter(S::ExpressionContinuation);
                Step::Advance
            }
            S::TernaryOp | S::TernaryOpAfterColon | S::Expression => {
                if self.try_inside_expression(kind) {
                    return Step::Advance;
                }
                match kind {
                    K::Comma | K::Delimiter => self.enter_and_advance(S::ExpressionContinuation),
                    K::RightBracket | K::RightParenthesis => {
                        self.leave(false);
                        Step::Retry
                    }
                    K::RightBrace => {
                        self.leave(true);
                        Step::Retry
                    }
                    K::Semicolon => {
                        self.leave(true);
                        Step::Advance
                    }
                    _ => Step::Advance,
                }
            }

            S::ExpressionContinuation => {
                self.leave(false);
                Step::Retry
            }

            S::ExpressionMaybeContinuation => {
                match kind {
                    K::Question | K::Delimiter | K::LeftBracket | K::LeftParenthesis
                    | K::LeftBrace => self.leave(false),
                    _ => self.leave(true),
                }
                Step::Retry
            }

            S::ParenOpen => {
                if !self.try_inside_expression(kind) && kind == K::RightParenthesis {
                    self.leave(false);
                }
                Step::Advance
            }

            S::BracketOpen => {
                match kind {
                    K::Comma => self.enter(S::BracketElementStart),
                    K::RightBracket => self.leave(false),
                    _ => {}
                }
                Step::Advance
            }

            S::ObjectLiteralOpen => {
                if self.try_inside_expression(kind) {
                    return Step::Advance;
                }
                match kind {
                    K::Colon => self.enter_and_advance(S::ObjectLiteralAssignment),
                    K::RightBracket | K::RightParenthesis => {
                        self.leave(false);
                        Step::Retry
                    }
                    K::RightBrace => {
                        self.leave(true);
                        Step::Advance
                    }
                    _ => Step::Advance,
                }
            }

            S::ObjectLiteralAssignment => {
                if self.try_inside_expression(kind) {
                    return Step::Advance;
                }
                match kind {
                    K::Delimiter => self.enter_and_advance(S::ExpressionContinuation),
                    K::RightBracket | K::RightParenthesis | K::RightBrace => {
                        self.leave(false);
                        Step::Retry
                    }
                    K::Comma => {
                        self.leave(false);
                        Step::Advance
                    }
                    _ => Step::Advance,
                }
            }

            S::BracketElementStart => match kind {
                K::Identifier => self.turn_and_advance(S::BracketElementMaybeObjectDefinition),
                _ => {
                    self.leave(false);
                    self.enter(S::Expression);
                    Step::Retry
                }
            },
            S::BracketElementMaybeObjectDefinition => match kind {
                K::LeftBrace => self.turn_and_advance(S::ObjectDefinitionOpen),
                _ => {
                    self.leave(false);
                    self.enter(S::Expression);
                    Step::Retry
                }
            },

            S::JsBlockOpen | S::SubstatementOpen => {
                if let Some(step) = self.try_statement(kind).step() {
                    return step;
                }
                if kind == K::RightBrace {
                    self.leave(true);
                }
                Step::Advance
            }

            S::LabelledStatement => {
                if let Some(step) = self.try_statement(kind).step() {
                    return step;
                }
                self.leave(true);
                Step::Advance
            }

            S::Substatement => {
                if kind == K::LeftBrace {
                    return self.turn_and_advance(S::SubstatementOpen);
                }
                self.statement_or_advance(kind)
            }

            S::IfStatement => match kind {
                K::LeftParenthesis => self.enter_and_advance(S::ConditionOpen),
                _ => {
                    self.leave(true);
                    Step::Advance
                }
            },

            S::MaybeElse => match kind {
                K::Else => {
                    self.turn_into(S::ElseClause);
                    self.enter(S::Substatement);
                    Step::Advance
                }
                _ => {
                    self.leave(true);
                    Step::Retry
                }
            },

            S::MaybeCatchOrFinally => match kind {
                K::Catch => self.turn_and_advance(S::CatchStatement),
                K::Finally => self.turn_and_advance(S::FinallyStatement),
                _ => {
                    self.leave(true);
                    Step::Retry
                }
            },

            S::ElseClause => {
                // An else clause always has a substatement on top of it.
                warn!(?kind, "token dispatched to a bare else clause");
                self.leave(true);
                Step::Advance
            }

            S::ConditionOpen | S::StatementWithConditionParenOpen => {
                if !self.try_inside_expression(kind) && kind == K::RightParenthesis {
                    self.turn_into(S::Substatement);
                }
                Step::Advance
            }

            S::SwitchStatement | S::CatchStatement | S::StatementWithCondition => match kind {
                K::LeftParenthesis => self.enter_and_advance(S::StatementWithConditionParenOpen),
                _ => {
                    self.leave(true);
                    Step::Advance
                }
            },

            S::TryStatement | S::FinallyStatement => match kind {
                K::LeftBrace => self.enter_and_advance(S::JsBlockOpen),
                _ => {
                    self.leave(true);
                    Step::Advance
                }
            },

            S::DoStatement => match kind {
                K::While => Step::Advance,
                K::LeftParenthesis => self.enter_and_advance(S::DoStatementWhileParenOpen),
                _ => {
                    self.leave(true);
                    Step::Retry
                }
            },
            S::DoStatementWhileParenOpen => {
                if !self.try_inside_expression(kind) && kind == K::RightParenthesis {
                    self.leave(false);
                    self.leave(true);
                }
                Step::Advance
            }

            S::BreakContinueStatement => {
                self.leave(true);
                match kind {
                    K::Identifier => Step::Advance,
                    _ => Step::Retry,
                }
            }

            S::CaseStart => {
                if kind == K::Colon {
                    self.turn_into(S::CaseCont);
                }
                Step::Advance
            }
            S::CaseCont => match kind {
                K::Case | K::Default | K::RightBrace => {
                    self.leave(false);
                    Step::Retry
                }
                _ => self.statement_or_advance(kind),
            },

            S::MultiLineCommentStart | S::MultiLineCommentCont => {
                if kind != K::Comment {
                    self.leave(false);
                    return Step::Retry;
                }
                if self.cx.is_last_token() && end_lexer_state.multi_line() == LexerState::NORMAL {
                    self.leave(false);
                } else if self.cx.is_first_token() {
                    self.turn_into(S::MultiLineCommentCont);
                }
                Step::Advance
            }

            // Only ever found under an expression or popped right away.
            S::ReturnStatement | S::ThrowStatement | S::EmptyStatement => {
                warn!(state = ?top, ?kind, "unhandled state on top of the stack");
                Step::Advance
            }
        }
    }

    /// Bookkeeping once every token of the line has been seen.
    pub(super) fn finish_line(&mut self, end_lexer_state: LexerState) {
        match self.top_tag() {
            S::ExpressionOrLabel => self.enter(S::Expression),
            S::BreakContinueStatement => self.leave(true),
            _ => {}
        }

        let top = self.top_tag();
        if matches!(
            top,
            S::Expression
                | S::ExpressionOrObjectDefinition
                | S::ObjectLiteralAssignment
                | S::TernaryOpAfterColon
        ) {
            self.enter(S::ExpressionMaybeContinuation);
        }

        if !top.is_multi_line_comment() && end_lexer_state.is_in_multi_line_comment() {
            self.enter(S::MultiLineCommentStart);
        }
    }

    /// Recognise the start of a statement.
    pub(super) fn try_statement(&mut self, kind: K) -> Dispatch {
        match kind {
            K::Semicolon => {
                self.enter(S::EmptyStatement);
                self.leave(true);
                Dispatch::Consumed
            }
            K::Break | K::Continue => self.enter_consumed(S::BreakContinueStatement),
            K::Throw => {
                self.enter(S::ThrowStatement);
                self.enter_consumed(S::Expression)
            }
            K::Return => {
                self.enter(S::ReturnStatement);
                self.enter_consumed(S::Expression)
            }
            K::While | K::For | K::Catch => self.enter_consumed(S::StatementWithCondition),
            K::Switch => self.enter_consumed(S::SwitchStatement),
            K::If => self.enter_consumed(S::IfStatement),
            K::Do => {
                self.enter(S::DoStatement);
                self.enter_consumed(S::Substatement)
            }
            K::Case | K::Default => self.enter_consumed(S::CaseStart),
            K::Try => self.enter_consumed(S::TryStatement),
            K::LeftBrace => self.enter_consumed(S::JsBlockOpen),
            K::Identifier => self.enter_consumed(S::ExpressionOrLabel),
            K::Delimiter
            | K::Var
            | K::PlusPlus
            | K::MinusMinus
            | K::Import
            | K::Signal
            | K::On
            | K::As
            | K::List
            | K::Property
            | K::Function
            | K::Number
            | K::String
            | K::LeftParenthesis => {
                self.enter(S::Expression);
                Dispatch::Retry
            }
            _ => Dispatch::NotHandled,
        }
    }

    /// Recognise a nested opener inside an expression. Returns whether the
    /// token was consumed.
    pub(super) fn try_inside_expression(&mut self, kind: K) -> bool {
        let new_state = match kind {
            K::LeftParenthesis => S::ParenOpen,
            K::LeftBracket => S::BracketOpen,
            K::LeftBrace => S::ObjectLiteralOpen,
            K::Function => S::FunctionStart,
            K::Question => S::TernaryOp,
            _ => return false,
        };
        self.enter(new_state);
        true
    }

    fn statement_or_advance(&mut self, kind: K) -> Step {
        self.try_statement(kind).step().unwrap_or(Step::Advance)
    }

    fn enter_and_advance(&mut self, new_state: S) -> Step {
        self.enter(new_state);
        Step::Advance
    }

    fn enter_consumed(&mut self, new_state: S) -> Dispatch {
        self.enter(new_state);
        Dispatch::Consumed
    }

    fn turn_and_advance(&mut self, new_state: S) -> Step {
        self.turn_into(new_state);
        Step::Advance
    }

    /// Anything other than the next part of an import ends it.
    fn finish_import(&mut self) -> Step {
        self.leave(false);
        self.leave(false);
        Step::Retry
    }
}
