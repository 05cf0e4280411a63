//! Raw logos token definitions for the line scanner
//!
//! These are an implementation detail of [`super::tokenize`]: every raw token
//! maps onto one generic [`TokenKind`]. Strings, block comments and regular
//! expressions are matched by callbacks because their extent depends on the
//! rest of the line, and an unterminated string or comment records the
//! multi-line construct in the lexer extras.

use crate::qmljs::token::{LexerState, TokenKind};
use logos::{Lexer, Logos};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Reserved JavaScript words. Contextual QML words (`property`, `signal`, ...)
/// are deliberately absent: they are ordinary identifiers to the scanner.
static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "break",
        "case",
        "catch",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "finally",
        "for",
        "function",
        "if",
        "in",
        "instanceof",
        "let",
        "new",
        "return",
        "switch",
        "this",
        "throw",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
    ]
    .into_iter()
    .collect()
});

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(word)
}

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(extras = LexerState)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[token("\"", |lex| string_literal(lex, '"'))]
    #[token("'", |lex| string_literal(lex, '\''))]
    #[token("`", |lex| string_literal(lex, '`'))]
    String,

    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    Number,

    #[regex(r"[\p{L}_$][\p{L}\p{N}_$]*")]
    Word,

    #[token("(")]
    LeftParenthesis,
    #[token(")")]
    RightParenthesis,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    /// `/` is division, `/=` or the start of a regular expression depending on
    /// what came before it.
    #[token("/", slash)]
    Slash(TokenKind),

    #[token("?")]
    #[token("?.")]
    #[token("??")]
    #[token("??=")]
    #[token("+")]
    #[token("++")]
    #[token("+=")]
    #[token("-")]
    #[token("--")]
    #[token("-=")]
    #[token("*")]
    #[token("**")]
    #[token("*=")]
    #[token("**=")]
    #[token("%")]
    #[token("%=")]
    #[token("&")]
    #[token("&&")]
    #[token("&=")]
    #[token("&&=")]
    #[token("|")]
    #[token("||")]
    #[token("|=")]
    #[token("||=")]
    #[token("^")]
    #[token("^=")]
    #[token("!")]
    #[token("~")]
    #[token("<")]
    #[token("<=")]
    #[token("<<")]
    #[token("<<=")]
    #[token(">")]
    #[token(">=")]
    #[token(">>")]
    #[token(">>=")]
    #[token(">>>")]
    #[token(">>>=")]
    #[token("=")]
    #[token("==")]
    #[token("===")]
    #[token("!=")]
    #[token("!==")]
    #[token("=>")]
    #[token("...")]
    #[token("@")]
    Delimiter,
}

impl RawToken {
    /// The generic kind of this raw token; `lexeme` tells keywords from identifiers.
    pub fn kind(self, lexeme: &str) -> TokenKind {
        match self {
            RawToken::LineComment | RawToken::BlockComment => TokenKind::Comment,
            RawToken::String => TokenKind::String,
            RawToken::Number => TokenKind::Number,
            RawToken::Word if is_keyword(lexeme) => TokenKind::Keyword,
            RawToken::Word => TokenKind::Identifier,
            RawToken::LeftParenthesis => TokenKind::LeftParenthesis,
            RawToken::RightParenthesis => TokenKind::RightParenthesis,
            RawToken::LeftBrace => TokenKind::LeftBrace,
            RawToken::RightBrace => TokenKind::RightBrace,
            RawToken::LeftBracket => TokenKind::LeftBracket,
            RawToken::RightBracket => TokenKind::RightBracket,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Slash(kind) => kind,
            RawToken::Delimiter => TokenKind::Delimiter,
        }
    }
}

/// Whether a `/` right after a token of this kind starts a regular expression.
pub fn regexp_may_follow_after(kind: TokenKind, text: &str) -> bool {
    match kind {
        TokenKind::Identifier
        | TokenKind::Number
        | TokenKind::String
        | TokenKind::RegExp
        | TokenKind::RightParenthesis
        | TokenKind::RightBracket
        | TokenKind::RightBrace => false,
        TokenKind::Keyword => text != "this",
        TokenKind::Delimiter => !matches!(text, "++" | "--"),
        _ => true,
    }
}

/// Scan a string body up to and including the closing `quote`.
///
/// Returns whether the string was closed and the byte length consumed. An
/// unterminated string stops before the line terminator.
pub fn scan_string_body(body: &str, quote: char) -> (bool, usize) {
    let mut chars = body.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                if let Some((next_idx, '\n')) = chars.next() {
                    return (false, next_idx);
                }
            }
            '\n' => return (false, trim_carriage_return(body, idx)),
            c if c == quote => return (true, idx + c.len_utf8()),
            _ => {}
        }
    }
    (false, trim_carriage_return(body, body.len()))
}

fn trim_carriage_return(body: &str, end: usize) -> usize {
    if body[..end].ends_with('\r') {
        end - 1
    } else {
        end
    }
}

fn string_literal(lex: &mut Lexer<RawToken>, quote: char) -> bool {
    let (closed, consumed) = scan_string_body(lex.remainder(), quote);
    lex.bump(consumed);
    if !closed {
        let multi_line = match quote {
            '"' => LexerState::MULTI_LINE_STRING_DQUOTE,
            '\'' => LexerState::MULTI_LINE_STRING_SQUOTE,
            _ => LexerState::MULTI_LINE_STRING_BQUOTE,
        };
        lex.extras = lex.extras.with_multi_line(multi_line);
    }
    true
}

fn block_comment(lex: &mut Lexer<RawToken>) -> bool {
    let remainder = lex.remainder();
    match remainder.find("*/") {
        Some(idx) => lex.bump(idx + 2),
        None => {
            let end = remainder.find('\n').unwrap_or(remainder.len());
            let end = trim_carriage_return(remainder, end);
            lex.bump(end);
            lex.extras = lex.extras.with_multi_line(LexerState::MULTI_LINE_COMMENT);
        }
    }
    true
}

fn slash(lex: &mut Lexer<RawToken>) -> TokenKind {
    let remainder = lex.remainder();
    if lex.extras.regexp_may_follow() {
        if let Some(len) = regexp_body_len(remainder) {
            lex.bump(len);
            return TokenKind::RegExp;
        }
    }
    if remainder.starts_with('=') {
        lex.bump(1);
    }
    TokenKind::Delimiter
}

/// Length of a regular expression body plus its closing `/` and flags, or
/// `None` when the line ends first.
fn regexp_body_len(body: &str) -> Option<usize> {
    let mut in_class = false;
    let mut chars = body.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\n' | '\r' => return None,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => {
                let flags = body[idx + 1..]
                    .chars()
                    .take_while(|c| c.is_ascii_alphabetic())
                    .count();
                return Some(idx + 1 + flags);
            }
            _ => {}
        }
    }
    None
}
