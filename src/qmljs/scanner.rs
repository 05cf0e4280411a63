//! Line scanner for QML/JavaScript
//!
//!     The scanner turns the text of a single line into [`Token`]s. It is line
//!     oriented on purpose: an editor re-indents one line at a time, and the only
//!     thing a line needs from the lines above it is the [`LexerState`] the
//!     previous line ended in.
//!
//!     Raw tokenization is done by a logos lexer (see [`tokens`]). What logos can
//!     not express on its own is resuming in the middle of a construct that was
//!     opened on an earlier line, so a line that starts inside a block comment
//!     or a multi-line string is first consumed up to the closing delimiter by
//!     hand, and only the remainder goes through logos.
//!
//! Contract
//!
//!     `tokenize(text, start_state)` expects the line text with its trailing
//!     newline and returns the tokens plus the state the next line starts in.
//!     Whitespace never produces tokens. Comments do, because the formatter
//!     needs to know about them to keep comment lines aligned.

pub mod tokens;

use crate::qmljs::token::{LexerState, Token, TokenKind};
use logos::Logos;
use tokens::RawToken;

/// Scans single lines of QML/JavaScript.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scanner;

impl Scanner {
    pub fn new() -> Self {
        Scanner
    }

    /// Tokenize one line, resuming from `start_state`.
    pub fn tokenize(&self, text: &str, start_state: LexerState) -> (Vec<Token>, LexerState) {
        tokenize(text, start_state)
    }
}

/// Tokenize one line of text, resuming from `start_state`.
pub fn tokenize(text: &str, start_state: LexerState) -> (Vec<Token>, LexerState) {
    let mut tokens = Vec::new();
    let content_end = content_end(text);
    let mut state = start_state;
    let mut offset = 0;

    match start_state.multi_line() {
        LexerState::MULTI_LINE_COMMENT => {
            let (token, closed_at) = resume_comment(&text[..content_end]);
            tokens.extend(token);
            match closed_at {
                Some(end) => {
                    offset = end;
                    state = state.with_multi_line(LexerState::NORMAL);
                }
                None => return (tokens, state),
            }
        }
        LexerState::MULTI_LINE_STRING_DQUOTE
        | LexerState::MULTI_LINE_STRING_SQUOTE
        | LexerState::MULTI_LINE_STRING_BQUOTE => {
            let quote = match start_state.multi_line() {
                LexerState::MULTI_LINE_STRING_DQUOTE => '"',
                LexerState::MULTI_LINE_STRING_SQUOTE => '\'',
                _ => '`',
            };
            let (closed, end) = tokens::scan_string_body(&text[..content_end], quote);
            if end > 0 {
                tokens.push(Token::new(0, end, TokenKind::String));
            }
            if !closed {
                return (tokens, state.with_regexp_may_follow(false));
            }
            offset = end;
            state = state
                .with_multi_line(LexerState::NORMAL)
                .with_regexp_may_follow(false);
        }
        _ => {}
    }

    let mut lexer = RawToken::lexer_with_extras(&text[offset..], state);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        // Characters logos does not know about carry no indentation meaning.
        let Ok(raw) = result else {
            continue;
        };
        let kind = raw.kind(lexer.slice());
        let token = Token::new(offset + span.start, span.end - span.start, kind);
        let may_follow = tokens::regexp_may_follow_after(kind, token.text(text));
        if kind != TokenKind::Comment {
            lexer.extras = lexer.extras.with_regexp_may_follow(may_follow);
        }
        tokens.push(token);
    }

    (tokens, lexer.extras)
}

/// Byte offset where the line content ends, before the line terminator.
fn content_end(text: &str) -> usize {
    let trimmed = text
        .strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(text);
    trimmed.len()
}

/// Consume the tail of a block comment opened on an earlier line.
///
/// Returns the comment token (starting at the first non-blank character) and,
/// if the comment closes on this line, the offset right after `*/`.
fn resume_comment(content: &str) -> (Option<Token>, Option<usize>) {
    let start = content
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(idx, _)| idx);
    let closed_at = content.find("*/").map(|idx| idx + 2);
    let end = closed_at.unwrap_or(content.len());

    let token = start
        .filter(|&start| start < end)
        .map(|start| Token::new(start, end - start, TokenKind::Comment));
    (token, closed_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str, state: LexerState) -> Vec<TokenKind> {
        tokenize(text, state).0.into_iter().map(|t| t.kind).collect()
    }

    fn lexemes(text: &str, state: LexerState) -> Vec<String> {
        tokenize(text, state)
            .0
            .iter()
            .map(|t| t.text(text).to_string())
            .collect()
    }

    #[test]
    fn test_simple_binding() {
        let text = "width: parent.width * 2\n";
        assert_eq!(
            lexemes(text, LexerState::NORMAL),
            vec!["width", ":", "parent", ".", "width", "*", "2"]
        );
        assert_eq!(
            kinds(text, LexerState::NORMAL),
            vec![
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Delimiter,
                TokenKind::Number,
            ]
        );
    }

    #[test]
    fn test_empty_line() {
        let (tokens, state) = tokenize("\n", LexerState::NORMAL);
        assert!(tokens.is_empty());
        assert_eq!(state.multi_line(), LexerState::NORMAL);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("if (x) return foo\n", LexerState::NORMAL),
            vec![
                TokenKind::Keyword,
                TokenKind::LeftParenthesis,
                TokenKind::Identifier,
                TokenKind::RightParenthesis,
                TokenKind::Keyword,
                TokenKind::Identifier,
            ]
        );
        // contextual QML words stay identifiers
        assert_eq!(
            kinds("property signal import\n", LexerState::NORMAL),
            vec![TokenKind::Identifier; 3]
        );
    }

    #[test]
    fn test_line_comment() {
        let text = "foo() // trailing { comment\n";
        let (tokens, _) = tokenize(text, LexerState::NORMAL);
        let last = tokens.last().copied().unwrap();
        assert_eq!(last.kind, TokenKind::Comment);
        assert_eq!(last.text(text), "// trailing { comment");
    }

    #[test]
    fn test_block_comment_closed_on_line() {
        let (tokens, state) = tokenize("/* a */ x\n", LexerState::NORMAL);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(state.multi_line(), LexerState::NORMAL);
    }

    #[test]
    fn test_block_comment_spanning_lines() {
        let (tokens, state) = tokenize("x = 1 /* open\n", LexerState::NORMAL);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Comment);
        assert!(state.is_in_multi_line_comment());

        let text = "   still inside\n";
        let (tokens, state) = tokenize(text, state);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].offset, 3);
        assert_eq!(tokens[0].text(text), "still inside");
        assert!(state.is_in_multi_line_comment());

        let text = " */ y\n";
        let (tokens, state) = tokenize(text, state);
        assert_eq!(
            tokens.iter().map(|t| t.text(text)).collect::<Vec<_>>(),
            vec!["*/", "y"]
        );
        assert_eq!(state.multi_line(), LexerState::NORMAL);
    }

    #[test]
    fn test_blank_line_inside_comment_has_no_tokens() {
        let (tokens, state) = tokenize("\n", LexerState::MULTI_LINE_COMMENT);
        assert!(tokens.is_empty());
        assert!(state.is_in_multi_line_comment());
    }

    #[test]
    fn test_multi_line_strings() {
        let (tokens, state) = tokenize("text: \"first\n", LexerState::NORMAL);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::String);
        assert_eq!(state.multi_line(), LexerState::MULTI_LINE_STRING_DQUOTE);

        let text = "  second\" + x\n";
        let (tokens, state) = tokenize(text, state);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text(text), "  second\"");
        assert_eq!(tokens.len(), 3);
        assert_eq!(state.multi_line(), LexerState::NORMAL);

        let (_, state) = tokenize("var s = 'abc\n", LexerState::NORMAL);
        assert_eq!(state.multi_line(), LexerState::MULTI_LINE_STRING_SQUOTE);

        let (_, state) = tokenize("var s = `abc\n", LexerState::NORMAL);
        assert_eq!(state.multi_line(), LexerState::MULTI_LINE_STRING_BQUOTE);
    }

    #[test]
    fn test_escaped_quote_does_not_close_string() {
        let text = "\"a\\\"b\" c\n";
        let (tokens, state) = tokenize(text, LexerState::NORMAL);
        assert_eq!(tokens[0].text(text), "\"a\\\"b\"");
        assert_eq!(tokens.len(), 2);
        assert_eq!(state.multi_line(), LexerState::NORMAL);
    }

    #[test]
    fn test_regexp_versus_division() {
        assert_eq!(
            kinds("var r = /ab+c/g;\n", LexerState::NORMAL),
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Delimiter,
                TokenKind::RegExp,
                TokenKind::Semicolon,
            ]
        );
        assert_eq!(
            kinds("a / b / c\n", LexerState::NORMAL),
            vec![
                TokenKind::Identifier,
                TokenKind::Delimiter,
                TokenKind::Identifier,
                TokenKind::Delimiter,
                TokenKind::Identifier,
            ]
        );
        assert_eq!(
            lexemes("x /= 2\n", LexerState::NORMAL),
            vec!["x", "/=", "2"]
        );
    }

    #[test]
    fn test_regexp_flag_carries_to_next_line() {
        let (_, state) = tokenize("var r =\n", LexerState::NORMAL);
        assert!(state.regexp_may_follow());
        let (tokens, _) = tokenize("/x/\n", state);
        assert_eq!(tokens[0].kind, TokenKind::RegExp);

        let (_, state) = tokenize("var r = a\n", LexerState::NORMAL);
        assert!(!state.regexp_may_follow());
    }

    #[test]
    fn test_operators_are_delimiters() {
        assert_eq!(
            lexemes("a ? b : c++ && --d\n", LexerState::NORMAL),
            vec!["a", "?", "b", ":", "c", "++", "&&", "--", "d"]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1 2.5 .5 0xff 1e10\n", LexerState::NORMAL),
            vec![TokenKind::Number; 5]
        );
    }

    #[test]
    fn test_offsets_account_for_resumed_prefix() {
        let text = "end */ foo\n";
        let (tokens, _) = tokenize(text, LexerState::MULTI_LINE_COMMENT);
        assert_eq!(tokens[1].offset, 7);
        assert_eq!(tokens[1].text(text), "foo");
    }

    #[test]
    fn test_scanner_struct_delegates() {
        let scanner = Scanner::new();
        assert_eq!(
            scanner.tokenize("a\n", LexerState::NORMAL),
            tokenize("a\n", LexerState::NORMAL)
        );
    }
}
