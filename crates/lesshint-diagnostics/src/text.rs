// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The default one-line-per-violation output.

use std::io::{self, Write};

use crate::{Record, Reporter};

/// Writes `<file>:<line>:<column>: <code> <message>` lines.
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report(&mut self, records: &[Record]) -> io::Result<()> {
        for record in records {
            writeln!(
                self.out,
                "{}:{}:{}: {} {}",
                record.file,
                record.error.line,
                record.error.character,
                record.error.code,
                record.error.reason
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
