// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Output types for `khan-lesshint`.

use std::fmt;

use serde::Serialize;

use lesshint_diagnostics::Record;

/// Lint codes, in the order their checkers run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Code {
    /// The file could not be parsed or compiled.
    E0,
    /// Properties out of alphabetical order.
    E01,
    /// Ruleset nested too deeply.
    E02,
    /// Overqualified selector.
    E03,
    /// Inline color instead of a color variable.
    E04,
}

impl Code {
    pub fn as_str(self) -> &'static str {
        match self {
            Code::E0 => "E0",
            Code::E01 => "E01",
            Code::E02 => "E02",
            Code::E03 => "E03",
            Code::E04 => "E04",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// 1-based.
    pub line: usize,
    /// 1-based byte column.
    pub column: usize,
    pub code: Code,
    pub message: String,
}

impl Violation {
    pub fn new(line: usize, column: usize, code: Code, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            code,
            message: message.into(),
        }
    }

    /// A violation at byte `index` of `source`.
    pub fn at(source: &str, index: usize, code: Code, message: impl Into<String>) -> Self {
        let loc = lesshint_ast::index_to_location(source, index as i64);
        Self::new(loc.line, loc.column, code, message)
    }
}

/// Complete lint report for a file.
#[derive(Debug, Serialize)]
pub struct LintReport {
    pub file: String,
    pub violations: Vec<Violation>,
    /// The file failed to parse or compile; `violations` holds the single E0.
    pub fatal: bool,
}

impl LintReport {
    pub fn clean(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            violations: Vec::new(),
            fatal: false,
        }
    }

    pub fn fatal(file: impl Into<String>, violation: Violation) -> Self {
        Self {
            file: file.into(),
            violations: vec![violation],
            fatal: true,
        }
    }

    pub fn error_count(&self) -> usize {
        self.violations.len()
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// The report in the shape reporters consume.
    pub fn records(&self) -> Vec<Record> {
        self.violations
            .iter()
            .map(|v| Record::new(&self.file, v.line, v.column, v.code.as_str(), &v.message))
            .collect()
    }
}

/// Options for lint.
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    /// Directory names whose files never contribute color variables.
    pub ignore: Vec<String>,
    /// Include checkers matching these patterns (`E03`, `overqualified`, `*`).
    pub rules: Vec<String>,
    /// Exclude checkers matching these patterns.
    pub excludes: Vec<String>,
}
