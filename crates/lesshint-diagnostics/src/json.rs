// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! JSON output for machine consumption.
//!
//! Records from every file of the run are buffered and written as one JSON
//! array when the run finishes, so the output is always a valid document.

use std::io::{self, Write};

use crate::{Record, Reporter};

pub struct JsonReporter<W: Write> {
    out: W,
    records: Vec<Record>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            records: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, records: &[Record]) -> io::Result<()> {
        self.records.extend_from_slice(records);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.records)?;
        writeln!(self.out, "{}", json)?;
        self.records.clear();
        self.out.flush()
    }
}
