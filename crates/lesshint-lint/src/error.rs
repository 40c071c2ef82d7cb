// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Internal faults.
//!
//! Bad input is never a [`LintError`]: it becomes an E0 violation in the
//! report. These errors mean the linter itself could not finish, and the
//! caller decides whether to stop.

use std::io;

use thiserror::Error;

use lesshint_parser::ParseError;

#[derive(Debug, Error)]
pub enum LintError {
    #[error("compiled CSS rule at {line}:{column} has no source mapping")]
    UnmappedRule { line: usize, column: usize },

    #[error("compiled CSS could not be parsed back: {0}")]
    InvalidCss(#[source] ParseError),

    #[error("failed to write report: {0}")]
    Report(#[from] io::Error),
}
