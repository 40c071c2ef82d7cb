//! The lexer implementation using logos.

use logos::Logos;
use lesshint_ast::token::{Token, TokenKind};
use lesshint_ast::Span;
use thiserror::Error;

/// Raw token type for logos - values are extracted in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
enum RawToken {
    // Whitespace is significant in selectors and space-separated values.
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // === Words ===
    #[regex(r"-?-?[a-zA-Z_\x{80}-\x{10FFFF}][a-zA-Z0-9_\-\x{80}-\x{10FFFF}]*")]
    Ident,

    #[regex(r"@-?[a-zA-Z_][a-zA-Z0-9_\-]*")]
    AtKeyword,

    #[regex(r"@\{[a-zA-Z0-9_\-]+\}")]
    Interpolation,

    #[regex(r"#[a-zA-Z0-9_\-]+")]
    Hash,

    // === Literals ===
    #[regex(r"([0-9]+(\.[0-9]+)?|\.[0-9]+)([a-zA-Z]+|%)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.|\\\n)*""#)]
    #[regex(r#"'([^'\\\n]|\\.|\\\n)*'"#)]
    String,

    // === Delimiters ===
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,

    // === Operators and selector punctuation ===
    #[token(".")]
    Dot,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("~")]
    Tilde,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("$")]
    Dollar,
    #[token("%")]
    Percent,
    #[token("@")]
    At,
    #[token("\\")]
    Backslash,
    #[token("`")]
    Backtick,
}

/// Consume a block comment. Returns false when it is never closed.
fn block_comment(lexer: &mut logos::Lexer<RawToken>) -> bool {
    match lexer.remainder().find("*/") {
        Some(end) => {
            lexer.bump(end + 2);
            true
        }
        None => {
            let rest = lexer.remainder().len();
            lexer.bump(rest);
            false
        }
    }
}

/// Length of an unquoted `url(...)` argument list starting at `(`,
/// including both parentheses. `None` when the argument is quoted.
fn unquoted_url_len(rest: &str) -> Option<usize> {
    let inner = rest.strip_prefix('(')?;
    let trimmed = inner.trim_start();
    if trimmed.starts_with('"') || trimmed.starts_with('\'') {
        return None;
    }
    let close = inner.find([')', '\n'])?;
    if inner.as_bytes()[close] != b')' {
        return None;
    }
    Some(close + 2)
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The lexer for Less source text.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self { source, errors: Vec::new() }
    }

    /// Tokenize the entire source, collecting multiple errors.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let kind = match result {
                Ok(RawToken::Ident) if slice.eq_ignore_ascii_case("url") => {
                    match unquoted_url_len(logos_lexer.remainder()) {
                        Some(len) => {
                            let rest = logos_lexer.remainder();
                            let inner = rest[1..len - 1].trim().to_string();
                            logos_lexer.bump(len);
                            tokens.push(Token {
                                kind: TokenKind::Url(inner),
                                span: Span::new(span.start, span.end + len),
                            });
                            continue;
                        }
                        None => TokenKind::Ident(slice.to_string()),
                    }
                }
                Ok(raw) => match self.convert_token(raw, slice, span.start, span.end) {
                    Ok(kind) => kind,
                    Err(e) => {
                        self.errors.push(e);
                        continue;
                    }
                },
                Err(()) => {
                    let error = if slice.starts_with("/*") {
                        LexError::unterminated_comment(span.start)
                    } else if slice.starts_with('"') || slice.starts_with('\'') {
                        LexError::unterminated_string(span.start, span.end)
                    } else {
                        let ch = self.source[span.start..].chars().next().unwrap_or('?');
                        LexError::unexpected_char(ch, span.start)
                    };
                    self.errors.push(error);
                    continue;
                }
            };

            tokens.push(Token {
                kind,
                span: Span::new(span.start, span.end),
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source.len(), self.source.len()),
        });

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Convert a raw logos token to our TokenKind, extracting values.
    fn convert_token(&self, raw: RawToken, slice: &str, start: usize, end: usize) -> Result<TokenKind, LexError> {
        Ok(match raw {
            RawToken::Whitespace => TokenKind::Whitespace,
            RawToken::BlockComment => TokenKind::Comment(slice.to_string()),

            RawToken::Ident => TokenKind::Ident(slice.to_string()),
            RawToken::AtKeyword => TokenKind::AtKeyword(slice[1..].to_string()),
            RawToken::Interpolation => TokenKind::Interpolation(slice[2..slice.len() - 1].to_string()),
            RawToken::Hash => TokenKind::Hash(slice[1..].to_string()),

            RawToken::Number => {
                let split = slice
                    .find(|c: char| c.is_ascii_alphabetic() || c == '%')
                    .unwrap_or(slice.len());
                let value = slice[..split]
                    .parse::<f64>()
                    .map_err(|_| LexError::invalid_number(start, end))?;
                TokenKind::Number { value, unit: slice[split..].to_string() }
            }
            RawToken::String => {
                let quote = slice.chars().next().unwrap_or('"');
                let inner = &slice[1..slice.len() - 1];
                TokenKind::String { value: inner.to_string(), quote }
            }

            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Semi => TokenKind::Semi,
            RawToken::Comma => TokenKind::Comma,

            RawToken::Dot => TokenKind::Dot,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Amp => TokenKind::Amp,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Caret => TokenKind::Caret,
            RawToken::Dollar => TokenKind::Dollar,
            RawToken::Percent => TokenKind::Percent,
            RawToken::At => TokenKind::At,
            RawToken::Backslash => TokenKind::Backslash,
            RawToken::Backtick => TokenKind::Backtick,

            RawToken::LineComment => unreachable!("line comments are skipped"),
        })
    }
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("Unrecognised input '{}'", ch),
            hint: None,
        }
    }

    fn unterminated_string(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Unterminated string".to_string(),
            hint: Some("close the string with a matching quote".to_string()),
        }
    }

    fn unterminated_comment(start: usize) -> Self {
        Self {
            span: Span::new(start, start + 2),
            message: "Missing closing '*/'".to_string(),
            hint: None,
        }
    }

    fn invalid_number(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Invalid number".to_string(),
            hint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let result = Lexer::new(src).tokenize();
        assert!(result.is_ok(), "Lex errors: {:?}", result.errors);
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_a_declaration() {
        assert_eq!(
            kinds("color: #fff;"),
            vec![
                TokenKind::Ident("color".into()),
                TokenKind::Colon,
                TokenKind::Whitespace,
                TokenKind::Hash("fff".into()),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_numbers_with_units() {
        assert_eq!(
            kinds("10px .5em 50%"),
            vec![
                TokenKind::Number { value: 10.0, unit: "px".into() },
                TokenKind::Whitespace,
                TokenKind::Number { value: 0.5, unit: "em".into() },
                TokenKind::Whitespace,
                TokenKind::Number { value: 50.0, unit: "%".into() },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_variables_and_interpolation() {
        assert_eq!(
            kinds("@gray-light .@{name}"),
            vec![
                TokenKind::AtKeyword("gray-light".into()),
                TokenKind::Whitespace,
                TokenKind::Dot,
                TokenKind::Interpolation("name".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_comments_and_keeps_block_comments() {
        assert_eq!(
            kinds("a // note\n/* b */"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Whitespace,
                TokenKind::Whitespace,
                TokenKind::Comment("/* b */".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unquoted_url_is_one_token() {
        let result = Lexer::new("url(http://x.org/a.png?v=1)").tokenize();
        assert!(result.is_ok(), "Lex errors: {:?}", result.errors);
        assert_eq!(result.tokens[0].kind, TokenKind::Url("http://x.org/a.png?v=1".into()));
        assert_eq!(result.tokens[0].span, Span::new(0, 27));
    }

    #[test]
    fn quoted_url_is_a_call() {
        assert_eq!(
            kinds("url('a.png')"),
            vec![
                TokenKind::Ident("url".into()),
                TokenKind::LParen,
                TokenKind::String { value: "a.png".into(), quote: '\'' },
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn reports_unterminated_comment() {
        let result = Lexer::new("a { /* open").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Missing closing '*/'");
        assert_eq!(result.errors[0].span.start, 4);
    }

    #[test]
    fn reports_unexpected_character() {
        let result = Lexer::new("a { b: ?; }").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].span.start, 7);
    }
}
