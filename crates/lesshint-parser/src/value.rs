// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Value expressions: lists, space-separated terms, arithmetic and calls.
//!
//! Precedence, loosest first: `,` lists, space expressions, `+ -`, `* /`,
//! unary minus, primaries.

use lesshint_ast::token::{Token, TokenKind};
use lesshint_ast::value::{Color, Operator, Value};

/// A significant token and whether whitespace came before it.
struct Sig<'t> {
    kind: &'t TokenKind,
    spaced: bool,
}

struct ValueParser<'t> {
    toks: Vec<Sig<'t>>,
    pos: usize,
}

/// Parse value tokens. Returns `None` when any token is left over or the
/// grammar does not cover the input.
pub fn parse_value(tokens: &[Token]) -> Option<Value> {
    let mut toks = Vec::new();
    let mut spaced = false;
    for token in tokens {
        if token.kind.is_trivia() {
            spaced = true;
        } else {
            toks.push(Sig { kind: &token.kind, spaced });
            spaced = false;
        }
    }
    if toks.is_empty() {
        return None;
    }

    let mut parser = ValueParser { toks, pos: 0 };
    let value = parser.list()?;
    (parser.pos == parser.toks.len()).then_some(value)
}

impl<'t> ValueParser<'t> {
    fn peek(&self) -> Option<&TokenKind> {
        self.toks.get(self.pos).map(|s| s.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<&Sig<'t>> {
        self.toks.get(self.pos + offset)
    }

    fn spaced(&self) -> bool {
        self.toks.get(self.pos).is_some_and(|s| s.spaced)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_term_end(&self) -> bool {
        matches!(
            self.peek(),
            None | Some(TokenKind::Comma) | Some(TokenKind::RParen)
        )
    }

    fn list(&mut self) -> Option<Value> {
        let mut items = vec![self.expression()?];
        while self.eat(&TokenKind::Comma) {
            items.push(self.expression()?);
        }
        Some(if items.len() == 1 { items.remove(0) } else { Value::List(items) })
    }

    fn expression(&mut self) -> Option<Value> {
        let mut terms = vec![self.additive()?];
        while !self.at_term_end() {
            terms.push(self.additive()?);
        }
        Some(if terms.len() == 1 { terms.remove(0) } else { Value::Expression(terms) })
    }

    fn additive(&mut self) -> Option<Value> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => Operator::Add,
                Some(TokenKind::Minus) => {
                    // `a -b` starts a new term; `a - b` and `a-b` subtract.
                    let next_spaced = self.peek_at(1).is_some_and(|s| s.spaced);
                    if self.spaced() && !next_spaced {
                        break;
                    }
                    Operator::Sub
                }
                _ => break,
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = Value::Operation { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Some(lhs)
    }

    fn multiplicative(&mut self) -> Option<Value> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => Operator::Mul,
                Some(TokenKind::Slash) => Operator::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Value::Operation { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        Some(lhs)
    }

    fn unary(&mut self) -> Option<Value> {
        if self.peek() == Some(&TokenKind::Minus) {
            self.pos += 1;
            return match self.primary()? {
                Value::Dimension { value, unit } => Some(Value::Dimension { value: -value, unit }),
                other => Some(Value::Negative(Box::new(other))),
            };
        }
        self.primary()
    }

    fn primary(&mut self) -> Option<Value> {
        let sig = self.toks.get(self.pos)?;
        let kind = sig.kind;
        self.pos += 1;
        match kind {
            TokenKind::Number { value, unit } => Some(Value::Dimension {
                value: *value,
                unit: unit.clone(),
            }),
            TokenKind::Hash(digits) => Some(match Color::from_hex(digits) {
                Some(color) => Value::Color { color, raw: format!("#{}", digits) },
                None => Value::Keyword(format!("#{}", digits)),
            }),
            TokenKind::Ident(name) => {
                if self.immediate_paren() {
                    self.call(name.clone())
                } else {
                    Some(Value::Keyword(name.clone()))
                }
            }
            TokenKind::Percent if self.immediate_paren() => self.call("%".to_string()),
            TokenKind::String { value, quote } => Some(Value::Quoted {
                value: value.clone(),
                quote: *quote,
                escaped: false,
            }),
            TokenKind::Tilde => match self.toks.get(self.pos).map(|s| s.kind) {
                Some(TokenKind::String { value, quote }) => {
                    self.pos += 1;
                    Some(Value::Quoted { value: value.clone(), quote: *quote, escaped: true })
                }
                _ => None,
            },
            TokenKind::AtKeyword(name) => Some(Value::Variable(format!("@{}", name))),
            TokenKind::At => match self.toks.get(self.pos).map(|s| s.kind) {
                Some(TokenKind::AtKeyword(name)) => {
                    self.pos += 1;
                    Some(Value::Variable(format!("@@{}", name)))
                }
                _ => None,
            },
            TokenKind::Url(inner) => Some(Value::Url(inner.clone())),
            TokenKind::Interpolation(name) => Some(Value::Keyword(format!("@{{{}}}", name))),
            TokenKind::LParen => {
                let inner = self.list()?;
                self.eat(&TokenKind::RParen).then(|| Value::Paren(Box::new(inner)))
            }
            _ => None,
        }
    }

    /// The next token is `(` with no whitespace before it.
    fn immediate_paren(&self) -> bool {
        self.toks
            .get(self.pos)
            .is_some_and(|s| matches!(s.kind, TokenKind::LParen) && !s.spaced)
    }

    fn call(&mut self, name: String) -> Option<Value> {
        self.pos += 1;
        if name.eq_ignore_ascii_case("url") {
            if let Some(TokenKind::String { value, quote }) = self.peek() {
                let inner = format!("{quote}{value}{quote}");
                self.pos += 1;
                return self.eat(&TokenKind::RParen).then_some(Value::Url(inner));
            }
        }

        let mut args = Vec::new();
        if !self.eat(&TokenKind::RParen) {
            loop {
                args.push(self.expression()?);
                if self.eat(&TokenKind::Comma) {
                    continue;
                }
                if self.eat(&TokenKind::RParen) {
                    break;
                }
                return None;
            }
        }
        Some(Value::Call { name, args })
    }
}
