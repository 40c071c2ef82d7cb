// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lint report records and the reporters that print them.
//!
//! A [`Reporter`] receives the records of one linted file at a time and is
//! finished once at the end of a run. Three reporters ship with the crate:
//! the one-line text format, a JSON array, and a colored source view.

pub mod codes;
pub mod formatter;
pub mod json;
pub mod text;

use std::io::{self, Write};

use serde::Serialize;

pub use formatter::PrettyReporter;
pub use json::JsonReporter;
pub use text::TextReporter;

// ============================================================================
// Core Types
// ============================================================================

/// One reported violation, in the shape external tools consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub file: String,
    pub error: RecordError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordError {
    /// 1-based.
    pub line: usize,
    /// 1-based byte column.
    pub character: usize,
    pub code: String,
    pub reason: String,
}

impl Record {
    pub fn new(
        file: impl Into<String>,
        line: usize,
        character: usize,
        code: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            error: RecordError {
                line,
                character,
                code: code.into(),
                reason: reason.into(),
            },
        }
    }
}

// ============================================================================
// Reporter Trait
// ============================================================================

/// Receives lint results.
pub trait Reporter {
    /// Called once per linted file with that file's records, in order.
    fn report(&mut self, records: &[Record]) -> io::Result<()>;

    /// Called once after the last file.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Names accepted by [`reporter_by_name`].
pub const REPORTER_NAMES: &[&str] = &["text", "json", "pretty"];

/// Build a reporter by name, writing to `out`.
pub fn reporter_by_name(name: &str, out: Box<dyn Write>) -> Option<Box<dyn Reporter>> {
    match name {
        "text" => Some(Box::new(TextReporter::new(out))),
        "json" => Some(Box::new(JsonReporter::new(out))),
        "pretty" => Some(Box::new(PrettyReporter::new(out))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_in_reporter_shape() {
        let record = Record::new("a.less", 2, 3, "E01", "out of order");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "file": "a.less",
                "error": {"line": 2, "character": 3, "code": "E01", "reason": "out of order"}
            })
        );
    }

    #[test]
    fn reporters_by_name() {
        for name in REPORTER_NAMES {
            assert!(reporter_by_name(name, Box::new(io::sink())).is_some(), "{}", name);
        }
        assert!(reporter_by_name("xml", Box::new(io::sink())).is_none());
    }
}
