// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Value evaluation: variable substitution, interpolation and simple arithmetic.

use lesshint_ast::value::Operator;
use lesshint_ast::{FileId, Value};
use lesshint_lexer::Lexer;

use crate::scope::Scope;
use crate::CompileError;

/// Variables referring to variables deeper than this are left unresolved.
const MAX_EVAL_DEPTH: usize = 32;

/// Substitute variables in `value`. Unknown variables are kept as written.
pub fn eval(value: &Value, scope: &Scope<'_>) -> Value {
    eval_at(value, scope, 0)
}

fn eval_at(value: &Value, scope: &Scope<'_>, depth: usize) -> Value {
    if depth > MAX_EVAL_DEPTH {
        tracing::warn!(value = %value, "variable recursion too deep");
        return value.clone();
    }
    match value {
        Value::Variable(name) => lookup(name, scope)
            .map(|v| eval_at(&v, scope, depth + 1))
            .unwrap_or_else(|| {
                tracing::debug!(name = %name, "unresolved variable kept");
                value.clone()
            }),
        Value::Quoted { value: text, quote, escaped } => Value::Quoted {
            value: interpolate_lenient(text, scope),
            quote: *quote,
            escaped: *escaped,
        },
        Value::Keyword(word) if word.contains("@{") => Value::Keyword(interpolate_lenient(word, scope)),
        Value::Call { name, args } => Value::Call {
            name: name.clone(),
            args: args.iter().map(|a| eval_at(a, scope, depth)).collect(),
        },
        Value::Operation { op, lhs, rhs } => {
            let lhs = eval_at(lhs, scope, depth);
            let rhs = eval_at(rhs, scope, depth);
            arithmetic(*op, &lhs, &rhs).unwrap_or(Value::Operation {
                op: *op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })
        }
        Value::Negative(inner) => match eval_at(inner, scope, depth) {
            Value::Dimension { value, unit } => Value::Dimension { value: -value, unit },
            other => Value::Negative(Box::new(other)),
        },
        Value::Paren(inner) => match eval_at(inner, scope, depth) {
            dim @ Value::Dimension { .. } => dim,
            Value::Operation { op: Operator::Div, lhs, rhs } => {
                arithmetic_div(&lhs, &rhs).unwrap_or_else(|| {
                    Value::Paren(Box::new(Value::Operation { op: Operator::Div, lhs, rhs }))
                })
            }
            other => Value::Paren(Box::new(other)),
        },
        Value::Expression(items) => {
            Value::Expression(items.iter().map(|v| eval_at(v, scope, depth)).collect())
        }
        Value::List(items) => Value::List(items.iter().map(|v| eval_at(v, scope, depth)).collect()),
        _ => value.clone(),
    }
}

/// `@name` or `@@name`.
fn lookup(name: &str, scope: &Scope<'_>) -> Option<Value> {
    if let Some(indirect) = name.strip_prefix("@@") {
        let target = match scope.variable(&format!("@{}", indirect))? {
            Value::Quoted { value, .. } | Value::Keyword(value) => value.clone(),
            _ => return None,
        };
        return scope.variable(&format!("@{}", target)).cloned();
    }
    scope.variable(name).cloned()
}

/// `+ - *` on dimensions with compatible units. Division only inside parentheses.
fn arithmetic(op: Operator, lhs: &Value, rhs: &Value) -> Option<Value> {
    let (a, ua) = lhs.as_number()?;
    let (b, ub) = rhs.as_number()?;
    let unit = unify_units(ua, ub)?;
    let value = match op {
        Operator::Add => a + b,
        Operator::Sub => a - b,
        Operator::Mul => a * b,
        Operator::Div => return None,
    };
    Some(Value::Dimension { value, unit })
}

fn arithmetic_div(lhs: &Value, rhs: &Value) -> Option<Value> {
    let (a, ua) = lhs.as_number()?;
    let (b, ub) = rhs.as_number()?;
    if b == 0.0 {
        return None;
    }
    Some(Value::Dimension { value: a / b, unit: unify_units(ua, ub)? })
}

fn unify_units(a: &str, b: &str) -> Option<String> {
    match (a, b) {
        ("", u) | (u, "") => Some(u.to_string()),
        (x, y) if x == y => Some(x.to_string()),
        _ => None,
    }
}

/// Text of a value when spliced into a selector, query or string.
fn splice_text(value: &Value) -> String {
    match value {
        Value::Quoted { value, .. } => value.clone(),
        other => other.to_string(),
    }
}

/// Replace every `@{name}` in `text`. Undefined names are an error located
/// at `index` in `file`.
pub fn interpolate(
    text: &str,
    scope: &Scope<'_>,
    file: FileId,
    index: usize,
) -> Result<String, CompileError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("@{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after
            .find('}')
            .ok_or(CompileError::UnclosedInterpolation { file, index })?;
        let name = format!("@{}", &after[..close]);
        let value = lookup(&name, scope).ok_or_else(|| CompileError::UndefinedVariable {
            name: name.clone(),
            file,
            index,
        })?;
        out.push_str(&splice_text(&eval(&value, scope)));
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Like [`interpolate`] but leaves unknown names in place.
fn interpolate_lenient(text: &str, scope: &Scope<'_>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("@{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find('}') else {
            break;
        };
        let name = format!("@{}", &after[..close]);
        match lookup(&name, scope) {
            Some(value) => out.push_str(&splice_text(&eval(&value, scope))),
            None => out.push_str(&rest[open..open + close + 3]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Parse mixin argument or default text into a value.
pub fn parse_text(text: &str) -> Value {
    let lexed = Lexer::new(text).tokenize();
    if lexed.is_ok() {
        let end = lexed.tokens.len().saturating_sub(1);
        if let Some(value) = lesshint_parser::parse_value(&lexed.tokens[..end]) {
            return value;
        }
    }
    Value::Raw(text.trim().to_string())
}
