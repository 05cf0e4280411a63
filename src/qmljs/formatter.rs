//! The indentation automaton
//!
//!     [`CodeFormatter`] is a pushdown automaton over tokens. Its stack holds
//!     the syntactic contexts open at the current token (see
//!     [`crate::qmljs::state`]); each token either leaves the stack alone,
//!     enters new contexts, leaves contexts, or does some of that and asks to
//!     see the same token again in the new top context. The per-state rules
//!     live in [`transitions`].
//!
//!     Indent depth is tracked alongside the stack. Entering a state lets the
//!     [`IndentPolicy`] pick the depth for what follows and the depth to
//!     restore on leave. Leaving restores it. The indent of a line is then the
//!     depth at the end of the previous line, adjusted by the policy for the
//!     line's own first token.
//!
//! Incremental Operation
//!
//!     After each line the stack and depth are stored with the line
//!     ([`BlockData`]). Re-indenting a line restores the previous line's
//!     snapshot instead of replaying the document, and
//!     [`CodeFormatter::update_state_until`] only replays lines whose snapshot
//!     is stale: the text revision changed, or the stack it started from is not
//!     the previous line's end stack any more.
//!
//!     A line's state only depends on the state before it and its own text, so
//!     the incremental result is always the one a full recomputation gives.

mod transitions;

use crate::qmljs::cache::BlockData;
use crate::qmljs::classifier::{classify, ExtendedKind};
use crate::qmljs::document::Document;
use crate::qmljs::policy::{Depths, IndentPolicy, QtStylePolicy};
use crate::qmljs::scanner::Scanner;
use crate::qmljs::state::{initial_state, State, StateStack, StateTag};
use crate::qmljs::token::{LexerState, Token};
use tracing::{debug, trace, warn};

/// Upper bound on re-dispatches of a single token before it is skipped.
const MAX_RETRIES_PER_TOKEN: usize = 256;

/// Everything the automaton knows about the line being processed.
///
/// This is the read-only view an [`IndentPolicy`] gets.
#[derive(Debug, Clone)]
pub struct FormatterContext {
    stack: StateStack,
    begin_state: StateStack,
    indent_depth: i32,
    line: String,
    tokens: Vec<Token>,
    token_index: usize,
    current_token: Token,
    start_lexer_state: LexerState,
    tab_size: usize,
}

impl FormatterContext {
    fn new(tab_size: usize) -> Self {
        FormatterContext {
            stack: initial_state(),
            begin_state: initial_state(),
            indent_depth: 0,
            line: String::new(),
            tokens: Vec::new(),
            token_index: 0,
            current_token: Token::end_of_file(),
            start_lexer_state: LexerState::NORMAL,
            tab_size,
        }
    }

    /// The state `below_top` entries under the top of the stack.
    pub fn state(&self, below_top: usize) -> State {
        self.stack.state(below_top)
    }

    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    pub fn indent_depth(&self) -> i32 {
        self.indent_depth
    }

    /// The current line, with its trailing newline.
    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn token_index(&self) -> usize {
        self.token_index
    }

    pub fn current_token(&self) -> Token {
        self.current_token
    }

    /// Token at `index`, or an end-of-file placeholder past the end.
    pub fn token_at(&self, index: usize) -> Token {
        self.tokens
            .get(index)
            .copied()
            .unwrap_or_else(Token::end_of_file)
    }

    pub fn is_first_token(&self) -> bool {
        self.token_index == 0
    }

    pub fn is_last_token(&self) -> bool {
        self.token_index + 1 == self.tokens.len()
    }

    pub fn start_lexer_state(&self) -> LexerState {
        self.start_lexer_state
    }

    pub fn text(&self, token: &Token) -> &str {
        token.text(&self.line)
    }

    pub fn kind(&self, token: &Token) -> ExtendedKind {
        classify(token, &self.line)
    }

    /// Visual column of byte `offset` in the current line; tabs advance to
    /// the next multiple of the tab size.
    pub fn column(&self, offset: usize) -> i32 {
        let tab_size = self.tab_size.max(1);
        let column = self
            .line
            .char_indices()
            .take_while(|(idx, _)| *idx < offset)
            .fold(0usize, |column, (_, c)| match c {
                '\t' => column.saturating_add(tab_size - column % tab_size),
                _ => column.saturating_add(1),
            });
        i32::try_from(column).unwrap_or(i32::MAX)
    }
}

/// What a state handler did with the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Move on to the next token.
    Advance,
    /// Dispatch the same token again against the new top state.
    Retry,
}

/// Incremental indentation engine for QML/JavaScript.
#[derive(Debug, Clone)]
pub struct CodeFormatter<P = QtStylePolicy> {
    policy: P,
    scanner: Scanner,
    cx: FormatterContext,
}

impl Default for CodeFormatter<QtStylePolicy> {
    fn default() -> Self {
        CodeFormatter::new(QtStylePolicy::default())
    }
}

impl CodeFormatter<QtStylePolicy> {
    pub fn indent_size(&self) -> usize {
        self.policy.indent_size()
    }

    /// Columns per indentation level. Cached snapshots computed with another
    /// size are stale; call [`CodeFormatter::invalidate_cache`] afterwards.
    pub fn set_indent_size(&mut self, indent_size: usize) {
        self.policy.set_indent_size(indent_size);
    }
}

impl<P: IndentPolicy> CodeFormatter<P> {
    pub fn new(policy: P) -> Self {
        CodeFormatter {
            policy,
            scanner: Scanner::new(),
            cx: FormatterContext::new(4),
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    pub fn tab_size(&self) -> usize {
        self.cx.tab_size
    }

    /// Set the tab width used for column computation. Zero is treated as one.
    pub fn set_tab_size(&mut self, tab_size: usize) {
        self.cx.tab_size = tab_size.max(1);
    }

    /// Bring every line up to and including `line` up to date.
    ///
    /// Lines whose cached snapshot is still valid are skipped. From the first
    /// stale line on every line through `line` is recomputed, and the line
    /// after `line` is marked unknown so later queries pick up the changes.
    pub fn update_state_until<D>(&mut self, doc: &mut D, line: D::Line)
    where
        D: Document,
    {
        let mut previous_end = initial_state();
        let mut cursor = doc.first_line();

        while let Some(current) = cursor {
            let end_state = match doc.load_block_data(current) {
                Some(data)
                    if data.revision == Some(doc.revision(current))
                        && data.begin_state == previous_end
                        && doc.load_lexer_state(current).is_some() =>
                {
                    data.end_state.clone()
                }
                _ => break,
            };
            if current == line {
                return;
            }
            previous_end = end_state;
            cursor = doc.next_line(current);
        }

        if let Some(first) = cursor {
            debug!(line = ?first, "replaying stale lines");
        }
        while let Some(current) = cursor {
            self.recalculate_state_after(doc, current);
            cursor = doc.next_line(current);
            if current == line {
                break;
            }
        }

        if let Some(next) = cursor {
            doc.save_block_data(next, BlockData::invalid());
        }
    }

    /// Recompute `line` after an edit and mark the line after it unknown.
    ///
    /// Does nothing when the cached snapshot of `line` matches its revision.
    pub fn update_line_state_change<D>(&mut self, doc: &mut D, line: D::Line)
    where
        D: Document,
    {
        if let Some(data) = doc.load_block_data(line) {
            if data.revision == Some(doc.revision(line)) {
                return;
            }
        }
        self.recalculate_state_after(doc, line);
        if let Some(next) = doc.next_line(line) {
            doc.save_block_data(next, BlockData::invalid());
        }
    }

    /// Indent column for `line`, or -1 when its indentation must be kept.
    ///
    /// Uses the cached snapshot of the previous line as it stands; call
    /// [`CodeFormatter::update_state_until`] on the previous line first when
    /// the document may have changed.
    pub fn indent_for<D>(&mut self, doc: &mut D, line: D::Line) -> i32
    where
        D: Document,
    {
        let previous = doc.previous_line(line);
        self.restore_current_state(doc, previous);
        self.tokenize_line(doc, line);
        self.cx.token_index = 0;
        self.cx.current_token = self.cx.token_at(0);

        let mut indent_depth = self.cx.indent_depth;
        self.policy
            .adjust_indent(&self.cx, self.cx.start_lexer_state, &mut indent_depth);
        indent_depth
    }

    /// Indent column a new, empty line inserted right after `line` would get.
    pub fn indent_for_new_line_after<D>(&mut self, doc: &mut D, line: D::Line) -> i32
    where
        D: Document,
    {
        self.restore_current_state(doc, Some(line));
        self.cx.line.clear();
        self.cx.line.push('\n');
        self.cx.tokens.clear();
        self.cx.token_index = 0;
        self.cx.current_token = Token::end_of_file();
        self.cx.start_lexer_state = doc.load_lexer_state(line).unwrap_or(LexerState::NORMAL);

        let mut indent_depth = self.cx.indent_depth;
        self.policy
            .adjust_indent(&self.cx, self.cx.start_lexer_state, &mut indent_depth);
        indent_depth
    }

    /// Forget every cached snapshot of `doc`.
    pub fn invalidate_cache<D>(&mut self, doc: &mut D)
    where
        D: Document,
    {
        let mut cursor = doc.first_line();
        while let Some(line) = cursor {
            doc.save_block_data(line, BlockData::invalid());
            cursor = doc.next_line(line);
        }
    }

    /// Run the automaton over `line`, starting from the previous line's end
    /// snapshot, and store the resulting snapshot with `line`.
    pub fn recalculate_state_after<D>(&mut self, doc: &mut D, line: D::Line)
    where
        D: Document,
    {
        let previous = doc.previous_line(line);
        self.restore_current_state(doc, previous);
        let end_lexer_state = self.tokenize_line(doc, line);

        self.cx.token_index = 0;
        self.cx.current_token = Token::end_of_file();
        let mut retries = 0;
        while self.cx.token_index < self.cx.tokens.len() {
            let token = self.cx.tokens[self.cx.token_index];
            self.cx.current_token = token;
            let kind = self.cx.kind(&token);

            if kind == ExtendedKind::Comment && !self.top_tag().is_multi_line_comment() {
                self.cx.token_index += 1;
                continue;
            }

            match self.dispatch(kind, end_lexer_state) {
                Step::Advance => {
                    self.cx.token_index += 1;
                    retries = 0;
                }
                Step::Retry if retries >= MAX_RETRIES_PER_TOKEN => {
                    warn!(?kind, state = ?self.top_tag(), "token keeps re-dispatching, skipping it");
                    self.cx.token_index += 1;
                    retries = 0;
                }
                Step::Retry => retries += 1,
            }
        }

        self.finish_line(end_lexer_state);
        trace!(line = ?line, stack = ?self.cx.stack.tags(), depth = self.cx.indent_depth, "line processed");
        self.save_current_state(doc, line);
    }

    fn top_tag(&self) -> StateTag {
        self.cx.state(0).tag
    }

    fn enter(&mut self, new_state: StateTag) {
        let mut depths = Depths {
            indent: self.cx.indent_depth,
            saved: self.cx.indent_depth,
        };
        self.policy.on_enter(new_state, &self.cx, &mut depths);
        self.cx.stack.push(State::new(new_state, depths.saved));
        self.cx.indent_depth = depths.indent;

        // An array literal always starts with an element.
        if new_state == StateTag::BracketOpen {
            self.enter(StateTag::BracketElementStart);
        }
    }

    /// Pop the top state and restore its saved depth. The bottom state stays.
    fn pop_state(&mut self) -> Option<State> {
        if self.cx.stack.len() <= 1 || self.top_tag() == StateTag::TopmostIntro {
            warn!("attempt to leave the topmost state ignored");
            return None;
        }
        let popped = self.cx.stack.pop()?;
        self.cx.indent_depth = popped.saved_indent_depth;
        Some(popped)
    }

    /// Leave the top state. With `statement_done`, keep leaving enclosing
    /// states until one is reached in which a statement may end.
    fn leave(&mut self, statement_done: bool) {
        let mut popped = match self.pop_state() {
            Some(popped) => popped,
            None => return,
        };
        if !statement_done {
            return;
        }

        loop {
            let top = self.top_tag();
            match top {
                StateTag::IfStatement => {
                    if popped.tag != StateTag::MaybeElse {
                        self.enter(StateTag::MaybeElse);
                        return;
                    }
                }
                StateTag::ElseClause => {
                    // The else clause and the if it belongs to end together.
                    if self.pop_state().is_none() {
                        return;
                    }
                }
                StateTag::TryStatement => {
                    if popped.tag != StateTag::MaybeCatchOrFinally
                        && popped.tag != StateTag::FinallyStatement
                    {
                        self.enter(StateTag::MaybeCatchOrFinally);
                        return;
                    }
                }
                _ if top.is_expression_end_state() => return,
                _ => {}
            }
            popped = match self.pop_state() {
                Some(popped) => popped,
                None => return,
            };
        }
    }

    fn turn_into(&mut self, new_state: StateTag) {
        self.leave(false);
        self.enter(new_state);
    }

    /// Load the end snapshot of `previous`, or the document start without one.
    fn restore_current_state<D>(&mut self, doc: &D, previous: Option<D::Line>)
    where
        D: Document,
    {
        let restored = previous
            .and_then(|line| doc.load_block_data(line))
            .filter(|data| !data.end_state.is_empty())
            .map(|data| (data.end_state.clone(), data.indent_depth));

        let (stack, indent_depth) = restored.unwrap_or_else(|| (initial_state(), 0));
        self.cx.begin_state = stack.clone();
        self.cx.stack = stack;
        self.cx.indent_depth = indent_depth;
    }

    fn save_current_state<D>(&self, doc: &mut D, line: D::Line)
    where
        D: Document,
    {
        let data = BlockData {
            begin_state: self.cx.begin_state.clone(),
            end_state: self.cx.stack.clone(),
            indent_depth: self.cx.indent_depth,
            revision: Some(doc.revision(line)),
        };
        doc.save_block_data(line, data);
    }

    /// Scan `line` into the context and record its end lexer state.
    fn tokenize_line<D>(&mut self, doc: &mut D, line: D::Line) -> LexerState
    where
        D: Document,
    {
        let start = match doc.previous_line(line) {
            None => LexerState::NORMAL,
            Some(previous) => doc.load_lexer_state(previous).unwrap_or_else(|| {
                warn!(line = ?previous, "lexer state of previous line unknown, assuming normal");
                LexerState::NORMAL
            }),
        };

        self.cx.line.clear();
        self.cx.line.push_str(doc.line_text(line));
        self.cx.line.push('\n');
        let (tokens, end) = self.scanner.tokenize(&self.cx.line, start);
        self.cx.tokens = tokens;
        self.cx.start_lexer_state = start;
        doc.save_lexer_state(line, end);
        end
    }
}
