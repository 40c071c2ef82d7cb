// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use lesshint_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on context.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        ("'}'", TokenKind::Eof) => Some("every '{' needs a matching '}'"),
        ("'}'", _) => None,
        ("'{'", TokenKind::Semi) => Some("a selector must be followed by a block"),
        ("'{'", _) => Some("blocks start with '{'"),

        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("']'", TokenKind::Eof) => Some("add ']' to close the attribute selector"),

        ("':'", TokenKind::Semi) => Some("declarations look like `name: value;`"),
        ("':'", _) => Some("separate the property name and value with ':'"),
        ("';'", _) => Some("end declarations with ';'"),

        ("selector", TokenKind::LBrace) => Some("a block needs a selector in front of it"),
        ("selector", _) => Some("try a tag, class, id, or '&'"),

        ("import path", _) => Some("syntax: @import (options) \"file.less\";"),
        ("import option", _) => {
            Some("valid options: reference, inline, less, css, once, multiple, optional")
        }
        ("property name", _) => Some("declarations look like `name: value;`"),

        _ => None,
    }
}
