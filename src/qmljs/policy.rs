//! Indentation policies
//!
//! The automaton decides which contexts are open. A policy decides what that
//! means in columns: how deep to indent when a context is entered, and how to
//! correct a line's indent for its own first token (a line starting with `}`
//! goes back out before anything on it is processed).
//!
//! [`QtStylePolicy`] is the stock policy; an editor wanting a different style
//! implements [`IndentPolicy`] and hands it to
//! [`CodeFormatter::new`](crate::qmljs::formatter::CodeFormatter::new).

mod qt_style;

pub use qt_style::QtStylePolicy;

use crate::qmljs::formatter::FormatterContext;
use crate::qmljs::state::StateTag;
use crate::qmljs::token::LexerState;

/// The two depths a policy may change when a state is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depths {
    /// Indent depth from here on.
    pub indent: i32,
    /// Depth restored when the new state is left.
    pub saved: i32,
}

pub trait IndentPolicy {
    /// Called before `new_state` is pushed. Both depths start at the current
    /// indent depth; `cx.state(0)` is the state being entered from.
    fn on_enter(&self, new_state: StateTag, cx: &FormatterContext, depths: &mut Depths);

    /// Correct `indent_depth` for the tokens of the line being indented.
    ///
    /// `cx` holds the previous line's end stack and the tokens of the line.
    /// Setting `indent_depth` to -1 asks to keep the line's indentation.
    fn adjust_indent(&self, cx: &FormatterContext, start_state: LexerState, indent_depth: &mut i32);
}
