//! Automaton states
//!
//!     Each [`State`] is one open syntactic context ("inside an if condition",
//!     "inside an object literal", ...) together with the indent depth that was
//!     current when the context was entered. Leaving a context restores that
//!     depth, so enter/leave always pair up.
//!
//!     A [`StateStack`] is the whole set of open contexts at some point in the
//!     document. Its bottom is always [`StateTag::TopmostIntro`], which is never
//!     popped.

use serde::Serialize;

/// Syntactic contexts the automaton distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateTag {
    /// Start of the document, before anything decided between QML and JS.
    TopmostIntro,
    /// Root state of a QML document.
    TopQml,
    /// Root state of a JavaScript document.
    TopJs,
    /// Document starts with an identifier: QML object or JS statement.
    ObjectDefinitionOrJs,
    MultiLineCommentStart,
    MultiLineCommentCont,

    /// After `import`.
    ImportStart,
    /// After the imported string or identifier.
    ImportMaybeDotOrVersionOrAs,
    /// After a `.` in a dotted import uri.
    ImportDot,
    /// After the version number.
    ImportMaybeAs,
    /// After `as`.
    ImportAs,

    /// After `property`.
    PropertyStart,
    /// After `default`, `readonly` or `required`.
    PropertyModifiers,
    /// After `list` used as a property type.
    PropertyListOpen,
    /// After the property type.
    PropertyName,
    /// After the property name.
    PropertyMaybeInitializer,
    /// After `enum`.
    EnumStart,
    /// After `signal`.
    SignalStart,
    /// After the signal name.
    SignalMaybeArglist,
    /// Inside the signal's `(`.
    SignalArglistOpen,

    /// After `function`.
    FunctionStart,
    /// Inside the parameter list.
    FunctionArglistOpen,
    /// After the parameter list, expecting `{`.
    FunctionArglistClosed,

    /// After an identifier in an object definition.
    BindingOrObjectDefinition,
    /// After the `:` of a binding.
    BindingAssignment,
    /// After the `{` of an object definition.
    ObjectDefinitionOpen,

    Expression,
    /// End of line where the next line definitely continues the expression.
    ExpressionContinuation,
    /// End of line where the next line may continue the expression.
    ExpressionMaybeContinuation,
    /// Binding value starting with an identifier (`x: foo` or `x: Foo {`).
    ExpressionOrObjectDefinition,
    /// Statement starting with an identifier: expression or label.
    ExpressionOrLabel,

    ParenOpen,
    BracketOpen,
    ObjectLiteralOpen,
    /// After the `:` in an object literal.
    ObjectLiteralAssignment,
    /// At the start of an array element.
    BracketElementStart,
    /// After an identifier at the start of an array element.
    BracketElementMaybeObjectDefinition,
    /// After `?`.
    TernaryOp,
    /// After the `:` of a ternary.
    TernaryOpAfterColon,

    JsBlockOpen,
    /// A lone `;`, popped right away.
    EmptyStatement,
    /// After `break` or `continue`, may be followed by a label.
    BreakContinueStatement,
    IfStatement,
    /// After the body of an `if`, waiting to see whether an `else` follows.
    MaybeElse,
    ElseClause,
    /// Inside the parenthesised condition of an `if`.
    ConditionOpen,
    /// The first line after a condition or loop header.
    Substatement,
    /// The `{` opening a substatement block.
    SubstatementOpen,
    LabelledStatement,
    ReturnStatement,
    ThrowStatement,
    /// After `for`, `while`, `with` or `catch`.
    StatementWithCondition,
    StatementWithConditionParenOpen,
    TryStatement,
    CatchStatement,
    FinallyStatement,
    /// After a `try` or `catch` block, waiting for `catch` or `finally`.
    MaybeCatchOrFinally,
    DoStatement,
    DoStatementWhileParenOpen,
    SwitchStatement,
    /// After `case` or `default`.
    CaseStart,
    /// After the `:` of a case label.
    CaseCont,
}

impl StateTag {
    /// States in which an expression (and with it a statement) may end.
    pub fn is_expression_end_state(self) -> bool {
        matches!(
            self,
            StateTag::TopmostIntro
                | StateTag::TopJs
                | StateTag::ObjectDefinitionOpen
                | StateTag::DoStatement
                | StateTag::JsBlockOpen
                | StateTag::SubstatementOpen
                | StateTag::BracketOpen
                | StateTag::ParenOpen
                | StateTag::CaseCont
                | StateTag::ObjectLiteralOpen
        )
    }

    /// Statement states whose body may come without braces.
    pub fn is_braceless_state(self) -> bool {
        matches!(
            self,
            StateTag::IfStatement
                | StateTag::ElseClause
                | StateTag::Substatement
                | StateTag::BindingAssignment
                | StateTag::BindingOrObjectDefinition
        )
    }

    pub fn is_multi_line_comment(self) -> bool {
        matches!(
            self,
            StateTag::MultiLineCommentStart | StateTag::MultiLineCommentCont
        )
    }
}

/// One open context and the indent depth to restore when it is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct State {
    pub tag: StateTag,
    pub saved_indent_depth: i32,
}

impl State {
    pub fn new(tag: StateTag, saved_indent_depth: i32) -> Self {
        State {
            tag,
            saved_indent_depth,
        }
    }
}

/// The open contexts, bottom first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StateStack(Vec<State>);

/// A fresh stack holding only the document root.
pub fn initial_state() -> StateStack {
    StateStack(vec![State::new(StateTag::TopmostIntro, 0)])
}

impl StateStack {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, state: State) {
        self.0.push(state);
    }

    pub fn pop(&mut self) -> Option<State> {
        self.0.pop()
    }

    pub fn top(&self) -> Option<&State> {
        self.0.last()
    }

    /// The state `below_top` entries under the top.
    ///
    /// Looking past the bottom yields a `TopmostIntro` placeholder, so walks
    /// that stop at the root terminate on short stacks too.
    pub fn state(&self, below_top: usize) -> State {
        self.0
            .len()
            .checked_sub(below_top + 1)
            .map(|idx| self.0[idx])
            .unwrap_or(State::new(StateTag::TopmostIntro, 0))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &State> {
        self.0.iter()
    }

    pub fn tags(&self) -> Vec<StateTag> {
        self.0.iter().map(|s| s.tag).collect()
    }
}

impl From<Vec<State>> for StateStack {
    fn from(states: Vec<State>) -> Self {
        StateStack(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_topmost_intro() {
        let stack = initial_state();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top(), Some(&State::new(StateTag::TopmostIntro, 0)));
    }

    #[test]
    fn test_initial_state_is_fresh_each_time() {
        let mut first = initial_state();
        first.push(State::new(StateTag::TopJs, 4));
        assert_eq!(initial_state().len(), 1);
    }

    #[test]
    fn test_state_below_top() {
        let stack = StateStack::from(vec![
            State::new(StateTag::TopmostIntro, 0),
            State::new(StateTag::TopQml, 0),
            State::new(StateTag::ObjectDefinitionOpen, 4),
        ]);
        assert_eq!(stack.state(0).tag, StateTag::ObjectDefinitionOpen);
        assert_eq!(stack.state(1).tag, StateTag::TopQml);
        assert_eq!(stack.state(2).tag, StateTag::TopmostIntro);
        assert_eq!(stack.state(7), State::new(StateTag::TopmostIntro, 0));
    }

    #[test]
    fn test_state_families() {
        assert!(StateTag::JsBlockOpen.is_expression_end_state());
        assert!(!StateTag::Expression.is_expression_end_state());
        assert!(StateTag::IfStatement.is_braceless_state());
        assert!(!StateTag::SubstatementOpen.is_braceless_state());
        assert!(StateTag::MultiLineCommentCont.is_multi_line_comment());
    }

    #[test]
    fn test_stack_serializes_as_list() {
        let json = serde_json::to_string(&initial_state()).unwrap();
        assert_eq!(json, r#"[{"tag":"topmost_intro","saved_indent_depth":0}]"#);
    }
}
