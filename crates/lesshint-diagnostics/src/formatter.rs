// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Rich terminal reporter.
//!
//! Produces multi-line, color-coded output with the offending source line:
//!
//! ```text
//! error[E03]: Selector "div#main" is overqualified
//!   --> styles/app.less:3:1
//!     |
//!   3 | div#main {
//!     | ^
//!     = note: overqualified selector (see `khan-lesshint explain E03`)
//! ```

use std::collections::HashMap;
use std::io::{self, Write};

use colored::Colorize;

use lesshint_ast::LineMap;

use crate::codes::CodeRegistry;
use crate::{Record, Reporter};

pub struct PrettyReporter<W: Write> {
    out: W,
    registry: CodeRegistry,
    /// Source text per file, read on first use.
    sources: HashMap<String, Option<String>>,
    total: usize,
    files_with_problems: usize,
}

impl<W: Write> PrettyReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            registry: CodeRegistry::default(),
            sources: HashMap::new(),
            total: 0,
            files_with_problems: 0,
        }
    }

    /// Use `text` as the content of `file` instead of reading it from disk.
    pub fn with_source(mut self, file: impl Into<String>, text: impl Into<String>) -> Self {
        self.sources.insert(file.into(), Some(text.into()));
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn source_for(&mut self, file: &str) -> Option<&str> {
        self.sources
            .entry(file.to_string())
            .or_insert_with(|| std::fs::read_to_string(file).ok())
            .as_deref()
    }
}

impl<W: Write> Reporter for PrettyReporter<W> {
    fn report(&mut self, records: &[Record]) -> io::Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        self.files_with_problems += 1;
        self.total += records.len();

        for record in records {
            let source = self.source_for(&record.file).map(str::to_owned);
            let text = format_record(record, source.as_deref(), &self.registry);
            self.out.write_all(text.as_bytes())?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.total == 0 {
            writeln!(self.out, "{}", "no problems found".green().bold())?;
        } else {
            let summary = format!(
                "{} problem{} in {} file{}",
                self.total,
                if self.total == 1 { "" } else { "s" },
                self.files_with_problems,
                if self.files_with_problems == 1 { "" } else { "s" },
            );
            writeln!(self.out, "{}", summary.red().bold())?;
        }
        self.out.flush()
    }
}

/// Render one record, with a source snippet when `source` is available.
pub fn format_record(record: &Record, source: Option<&str>, registry: &CodeRegistry) -> String {
    let mut out = String::new();
    let err = &record.error;

    out.push_str(&format!(
        "{}[{}]: {}\n",
        "error".red().bold(),
        err.code.as_str().red().bold(),
        err.reason.as_str().bold()
    ));
    out.push_str(&format!(
        "  {} {}:{}:{}\n",
        "-->".blue(),
        record.file,
        err.line,
        err.character
    ));

    let gutter_width = err.line.to_string().len().max(2);
    let line_text = source.and_then(|src| LineMap::new(src).line_text(src, err.line).map(str::to_owned));
    if let Some(line_text) = line_text {
        out.push_str(&format!("{} {}\n", " ".repeat(gutter_width + 1), "|".blue()));
        out.push_str(&format!(
            "{:>width$} {} {}\n",
            err.line.to_string().blue().bold(),
            "|".blue(),
            line_text,
            width = gutter_width + 1,
        ));
        out.push_str(&format!(
            "{} {} {}{}\n",
            " ".repeat(gutter_width + 1),
            "|".blue(),
            " ".repeat(err.character.saturating_sub(1)),
            "^".red().bold(),
        ));
    }

    if let Some(info) = registry.get(&err.code) {
        out.push_str(&format!(
            "{} {} {}: {} (see `khan-lesshint explain {}`)\n",
            " ".repeat(gutter_width + 1),
            "=".cyan(),
            "note".cyan().bold(),
            info.title,
            info.code
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn renders_snippet_and_caret() {
        plain();
        let record = Record::new("a.less", 2, 3, "E01", "Property out of order");
        let text = format_record(&record, Some("a {\n  margin: 0;\n}"), &CodeRegistry::default());
        let expected = "\
error[E01]: Property out of order
  --> a.less:2:3
    |
  2 |   margin: 0;
    |   ^
    = note: properties out of alphabetical order (see `khan-lesshint explain E01`)
";
        assert_eq!(text, expected);
    }

    #[test]
    fn missing_source_skips_snippet() {
        plain();
        let record = Record::new("gone.less", 1, 1, "E0", "'x' wasn't found");
        let text = format_record(&record, None, &CodeRegistry::default());
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("error[E0]: 'x' wasn't found"));
    }

    #[test]
    fn summary_counts_problems() {
        plain();
        let mut reporter = PrettyReporter::new(Vec::new()).with_source("a.less", "a{}");
        reporter
            .report(&[
                Record::new("a.less", 1, 1, "E03", "one"),
                Record::new("a.less", 1, 1, "E03", "two"),
            ])
            .unwrap();
        reporter.report(&[]).unwrap();
        reporter.finish().unwrap();
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(out.ends_with("2 problems in 1 file\n"));
    }
}
