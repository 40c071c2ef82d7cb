//! Token definitions for the lexer.

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Words
    Ident(String),
    /// `@name`, stored without the `@`.
    AtKeyword(String),
    /// `@{name}`, stored without the braces.
    Interpolation(String),
    /// `#name`, stored without the `#`.
    Hash(String),

    // Literals
    Number { value: f64, unit: String },
    String { value: String, quote: char },
    /// Unquoted `url(...)`, stored as the text between the parentheses.
    Url(String),
    /// `/* ... */`, stored with delimiters.
    Comment(String),

    /// Any run of spaces, tabs and line breaks.
    Whitespace,

    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Colon,
    Semi,
    Comma,
    Dot,
    Gt,
    Lt,
    Plus,
    Minus,
    Tilde,
    Star,
    Slash,
    Eq,
    Bang,
    Amp,
    Pipe,
    Caret,
    Dollar,
    Percent,
    At,
    Backslash,
    Backtick,

    Eof,
}

impl TokenKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::AtKeyword(_) => "at-keyword",
            TokenKind::Interpolation(_) => "interpolation",
            TokenKind::Hash(_) => "'#' name",
            TokenKind::Number { .. } => "number",
            TokenKind::String { .. } => "string",
            TokenKind::Url(_) => "url",
            TokenKind::Comment(_) => "comment",
            TokenKind::Whitespace => "whitespace",

            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Semi => "';'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Gt => "'>'",
            TokenKind::Lt => "'<'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Tilde => "'~'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Eq => "'='",
            TokenKind::Bang => "'!'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Dollar => "'$'",
            TokenKind::Percent => "'%'",
            TokenKind::At => "'@'",
            TokenKind::Backslash => "'\\'",
            TokenKind::Backtick => "'`'",

            TokenKind::Eof => "end of file",
        }
    }

    /// Whitespace and comments; insignificant between most constructs.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment(_))
    }
}
