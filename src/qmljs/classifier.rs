//! Extended token classification
//!
//! The scanner only knows generic kinds. The automaton needs to tell `if` from
//! `while`, `property` from any other identifier and `?` from any other
//! operator. [`classify`] derives that from the generic kind and the lexeme,
//! and nothing else.

use crate::qmljs::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Token kinds as seen by the automaton: the generic kinds plus keywords,
/// contextual QML words and the few operators that matter for indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendedKind {
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

    Break,
    Case,
    Catch,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Finally,
    For,
    Function,
    If,
    In,
    InstanceOf,
    New,
    Return,
    Switch,
    This,
    Throw,
    Try,
    TypeOf,
    Var,
    Void,
    While,
    With,

    Import,
    Signal,
    On,
    As,
    List,
    Property,
    Readonly,
    Required,
    Enum,

    Question,
    PlusPlus,
    MinusMinus,
}

impl From<TokenKind> for ExtendedKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::EndOfFile => ExtendedKind::EndOfFile,
            TokenKind::Keyword => ExtendedKind::Keyword,
            TokenKind::Identifier => ExtendedKind::Identifier,
            TokenKind::String => ExtendedKind::String,
            TokenKind::Comment => ExtendedKind::Comment,
            TokenKind::Number => ExtendedKind::Number,
            TokenKind::LeftParenthesis => ExtendedKind::LeftParenthesis,
            TokenKind::RightParenthesis => ExtendedKind::RightParenthesis,
            TokenKind::LeftBrace => ExtendedKind::LeftBrace,
            TokenKind::RightBrace => ExtendedKind::RightBrace,
            TokenKind::LeftBracket => ExtendedKind::LeftBracket,
            TokenKind::RightBracket => ExtendedKind::RightBracket,
            TokenKind::Semicolon => ExtendedKind::Semicolon,
            TokenKind::Colon => ExtendedKind::Colon,
            TokenKind::Comma => ExtendedKind::Comma,
            TokenKind::Dot => ExtendedKind::Dot,
            TokenKind::Delimiter => ExtendedKind::Delimiter,
            TokenKind::RegExp => ExtendedKind::RegExp,
        }
    }
}

static KEYWORD_KINDS: Lazy<HashMap<&'static str, ExtendedKind>> = Lazy::new(|| {
    use ExtendedKind::*;
    HashMap::from([
        ("break", Break),
        ("case", Case),
        ("catch", Catch),
        ("continue", Continue),
        ("debugger", Debugger),
        ("default", Default),
        ("delete", Delete),
        ("do", Do),
        ("else", Else),
        ("finally", Finally),
        ("for", For),
        ("function", Function),
        ("if", If),
        ("in", In),
        ("instanceof", InstanceOf),
        ("new", New),
        ("return", Return),
        ("switch", Switch),
        ("this", This),
        ("throw", Throw),
        ("try", Try),
        ("typeof", TypeOf),
        ("var", Var),
        ("let", Var),
        ("const", Var),
        ("void", Void),
        ("while", While),
        ("with", With),
    ])
});

static CONTEXTUAL_KINDS: Lazy<HashMap<&'static str, ExtendedKind>> = Lazy::new(|| {
    use ExtendedKind::*;
    HashMap::from([
        ("import", Import),
        ("signal", Signal),
        ("on", On),
        ("as", As),
        ("list", List),
        ("property", Property),
        ("readonly", Readonly),
        ("required", Required),
        ("enum", Enum),
    ])
});

/// Classify `token`, whose lexeme is sliced out of `line`.
pub fn classify(token: &Token, line: &str) -> ExtendedKind {
    let text = token.text(line);
    match token.kind {
        TokenKind::Keyword => KEYWORD_KINDS
            .get(text)
            .copied()
            .unwrap_or(ExtendedKind::Keyword),
        TokenKind::Identifier => CONTEXTUAL_KINDS
            .get(text)
            .copied()
            .unwrap_or(ExtendedKind::Identifier),
        TokenKind::Delimiter => match text {
            "?" => ExtendedKind::Question,
            "++" => ExtendedKind::PlusPlus,
            "--" => ExtendedKind::MinusMinus,
            _ => ExtendedKind::Delimiter,
        },
        kind => kind.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qmljs::scanner::tokenize;
    use crate::qmljs::token::LexerState;

    fn classify_line(line: &str) -> Vec<ExtendedKind> {
        let (tokens, _) = tokenize(line, LexerState::NORMAL);
        tokens.iter().map(|t| classify(t, line)).collect()
    }

    #[test]
    fn test_contextual_keywords() {
        assert_eq!(
            classify_line("import QtQuick 2.0 as Q\n"),
            vec![
                ExtendedKind::Import,
                ExtendedKind::Identifier,
                ExtendedKind::Number,
                ExtendedKind::As,
                ExtendedKind::Identifier,
            ]
        );
        assert_eq!(
            classify_line("readonly property list<Item> items\n")[..3].to_vec(),
            vec![
                ExtendedKind::Readonly,
                ExtendedKind::Property,
                ExtendedKind::List
            ]
        );
    }

    #[test]
    fn test_statement_keywords() {
        assert_eq!(
            classify_line("if else for while do switch case default try catch finally\n"),
            vec![
                ExtendedKind::If,
                ExtendedKind::Else,
                ExtendedKind::For,
                ExtendedKind::While,
                ExtendedKind::Do,
                ExtendedKind::Switch,
                ExtendedKind::Case,
                ExtendedKind::Default,
                ExtendedKind::Try,
                ExtendedKind::Catch,
                ExtendedKind::Finally,
            ]
        );
    }

    #[test]
    fn test_declarations_map_to_var() {
        assert_eq!(
            classify_line("var let const\n"),
            vec![ExtendedKind::Var; 3]
        );
    }

    #[test]
    fn test_indentation_relevant_operators() {
        assert_eq!(
            classify_line("a ? b++ : --c + d\n"),
            vec![
                ExtendedKind::Identifier,
                ExtendedKind::Question,
                ExtendedKind::Identifier,
                ExtendedKind::PlusPlus,
                ExtendedKind::Colon,
                ExtendedKind::MinusMinus,
                ExtendedKind::Identifier,
                ExtendedKind::Delimiter,
                ExtendedKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_end_of_file_placeholder() {
        assert_eq!(
            classify(&Token::end_of_file(), ""),
            ExtendedKind::EndOfFile
        );
    }
}
