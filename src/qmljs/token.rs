//! Core token types shared by the scanner, the classifier and the formatter.
//!
//!     A token is a half-open byte span into the text of one line plus a generic
//!     kind. Tokens never own text: the formatter keeps the current line around
//!     and slices it on demand, which is what lets the classifier look at a
//!     lexeme without the scanner allocating per token.
//!
//!     Lines are scanned one at a time, so whatever was left unfinished at the
//!     end of the previous line (a block comment, a string spanning lines, the
//!     possibility of a regular expression) is carried in a [`LexerState`].

use serde::Serialize;
use std::fmt;

/// Generic token kinds produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EndOfFile,
    Keyword,
    Identifier,
    String,
    Comment,
    Number,
    LeftParenthesis,
    RightParenthesis,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Colon,
    Comma,
    Dot,
    Delimiter,
    RegExp,
}

/// A token of one line: `offset..offset + length` in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub offset: usize,
    pub length: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(offset: usize, length: usize, kind: TokenKind) -> Self {
        Token {
            offset,
            length,
            kind,
        }
    }

    /// The placeholder returned when a line has no token at the requested index.
    pub fn end_of_file() -> Self {
        Token::new(0, 0, TokenKind::EndOfFile)
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Slice this token's lexeme out of the line it was scanned from.
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        line.get(self.offset..self.end()).unwrap_or("")
    }
}

/// Scanner sub-state carried from the end of one line to the start of the next.
///
/// The low three bits hold the multi-line construct the line ended in, the
/// next bit records whether a `/` at the start of the next line would begin a
/// regular expression.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct LexerState(u8);

impl LexerState {
    pub const NORMAL: LexerState = LexerState(0);
    pub const MULTI_LINE_COMMENT: LexerState = LexerState(1);
    pub const MULTI_LINE_STRING_DQUOTE: LexerState = LexerState(2);
    pub const MULTI_LINE_STRING_SQUOTE: LexerState = LexerState(3);
    pub const MULTI_LINE_STRING_BQUOTE: LexerState = LexerState(4);
    pub const MULTI_LINE_MASK: u8 = 0b0111;
    pub const REGEXP_MAY_FOLLOW: u8 = 0b1000;

    /// The multi-line construct part only, with the regexp flag stripped.
    pub const fn multi_line(self) -> LexerState {
        LexerState(self.0 & Self::MULTI_LINE_MASK)
    }

    pub fn is_in_multi_line_comment(self) -> bool {
        self.multi_line() == Self::MULTI_LINE_COMMENT
    }

    pub fn is_in_multi_line_string(self) -> bool {
        matches!(
            self.multi_line(),
            Self::MULTI_LINE_STRING_DQUOTE
                | Self::MULTI_LINE_STRING_SQUOTE
                | Self::MULTI_LINE_STRING_BQUOTE
        )
    }

    pub const fn regexp_may_follow(self) -> bool {
        self.0 & Self::REGEXP_MAY_FOLLOW != 0
    }

    pub const fn with_regexp_may_follow(self, may_follow: bool) -> LexerState {
        if may_follow {
            LexerState(self.0 | Self::REGEXP_MAY_FOLLOW)
        } else {
            LexerState(self.0 & !Self::REGEXP_MAY_FOLLOW)
        }
    }

    /// Replace the multi-line part, keeping the regexp flag.
    pub const fn with_multi_line(self, multi_line: LexerState) -> LexerState {
        LexerState((self.0 & !Self::MULTI_LINE_MASK) | (multi_line.0 & Self::MULTI_LINE_MASK))
    }
}

impl fmt::Debug for LexerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.multi_line() {
            Self::NORMAL => "Normal",
            Self::MULTI_LINE_COMMENT => "MultiLineComment",
            Self::MULTI_LINE_STRING_DQUOTE => "MultiLineStringDQuote",
            Self::MULTI_LINE_STRING_SQUOTE => "MultiLineStringSQuote",
            Self::MULTI_LINE_STRING_BQUOTE => "MultiLineStringBQuote",
            _ => "Invalid",
        };
        if self.regexp_may_follow() {
            write!(f, "{name}|RegexpMayFollow")
        } else {
            write!(f, "{name}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_text_slices_line() {
        let line = "import QtQuick 2.0";
        let token = Token::new(7, 7, TokenKind::Identifier);
        assert_eq!(token.text(line), "QtQuick");
        assert_eq!(token.end(), 14);
    }

    #[test]
    fn test_token_text_out_of_range_is_empty() {
        let token = Token::new(10, 3, TokenKind::Identifier);
        assert_eq!(token.text("short"), "");
    }

    #[test]
    fn test_lexer_state_flags_are_independent() {
        let state = LexerState::MULTI_LINE_COMMENT.with_regexp_may_follow(true);
        assert!(state.is_in_multi_line_comment());
        assert!(state.regexp_may_follow());
        assert_eq!(state.multi_line(), LexerState::MULTI_LINE_COMMENT);

        let cleared = state.with_regexp_may_follow(false);
        assert_eq!(cleared, LexerState::MULTI_LINE_COMMENT);
    }

    #[test]
    fn test_lexer_state_string_detection() {
        assert!(LexerState::MULTI_LINE_STRING_DQUOTE.is_in_multi_line_string());
        assert!(LexerState::MULTI_LINE_STRING_SQUOTE.is_in_multi_line_string());
        assert!(LexerState::MULTI_LINE_STRING_BQUOTE.is_in_multi_line_string());
        assert!(!LexerState::MULTI_LINE_COMMENT.is_in_multi_line_string());
        assert!(!LexerState::NORMAL.is_in_multi_line_string());
    }

    #[test]
    fn test_with_multi_line_keeps_regexp_flag() {
        let state = LexerState::NORMAL
            .with_regexp_may_follow(true)
            .with_multi_line(LexerState::MULTI_LINE_STRING_SQUOTE);
        assert!(state.regexp_may_follow());
        assert!(state.is_in_multi_line_string());
    }

    #[test]
    fn test_lexer_state_serializes_as_number() {
        let json = serde_json::to_string(&LexerState::MULTI_LINE_COMMENT).unwrap();
        assert_eq!(json, "1");
    }
}
