// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source maps from generated CSS positions back to the Less sources.

use std::path::PathBuf;

use lesshint_ast::FileId;

/// One generated position and where it came from. Lines are 1-based,
/// columns 0-based, as in the source map format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub generated_line: usize,
    pub generated_column: usize,
    pub source: FileId,
    pub original_line: usize,
    pub original_column: usize,
}

/// Result of a source map lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition<'a> {
    pub file: FileId,
    pub source: &'a str,
    pub line: usize,
    /// 0-based.
    pub column: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    sources: Vec<String>,
    contents: Vec<String>,
    /// Sorted by generated position.
    mappings: Vec<Mapping>,
}

impl SourceMap {
    pub fn new(sources: impl IntoIterator<Item = (PathBuf, String)>) -> Self {
        let (sources, contents) = sources
            .into_iter()
            .map(|(path, text)| (path.display().to_string(), text))
            .unzip();
        Self { sources, contents, mappings: Vec::new() }
    }

    /// Append a mapping. Mappings must arrive in generated order.
    pub fn add(&mut self, mapping: Mapping) {
        debug_assert!(self
            .mappings
            .last()
            .map_or(true, |m| (m.generated_line, m.generated_column)
                <= (mapping.generated_line, mapping.generated_column)));
        self.mappings.push(mapping);
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// The closest mapping at or before `column` on generated `line`.
    pub fn original_position_for(&self, line: usize, column: usize) -> Option<OriginalPosition<'_>> {
        let end = self
            .mappings
            .partition_point(|m| (m.generated_line, m.generated_column) <= (line, column));
        let mapping = self.mappings[..end].last().filter(|m| m.generated_line == line)?;
        Some(OriginalPosition {
            file: mapping.source,
            source: self.sources.get(mapping.source.0 as usize).map(String::as_str).unwrap_or(""),
            line: mapping.original_line,
            column: mapping.original_column,
        })
    }

    /// Serialize as a version 3 source map.
    pub fn to_json(&self, file: Option<&str>) -> String {
        let map = serde_json::json!({
            "version": 3,
            "file": file,
            "sources": self.sources,
            "sourcesContent": self.contents,
            "names": [],
            "mappings": self.encode_mappings(),
        });
        map.to_string()
    }

    fn encode_mappings(&self) -> String {
        let mut out = String::new();
        let mut line = 1;
        let mut prev_column = 0i64;
        let mut prev_source = 0i64;
        let mut prev_line = 0i64;
        let mut prev_orig_column = 0i64;
        let mut first_in_line = true;

        for m in &self.mappings {
            while line < m.generated_line {
                out.push(';');
                line += 1;
                prev_column = 0;
                first_in_line = true;
            }
            if !first_in_line {
                out.push(',');
            }
            first_in_line = false;

            let source = i64::from(m.source.0);
            let orig_line = m.original_line as i64 - 1;
            let orig_column = m.original_column as i64;
            encode_vlq(&mut out, m.generated_column as i64 - prev_column);
            encode_vlq(&mut out, source - prev_source);
            encode_vlq(&mut out, orig_line - prev_line);
            encode_vlq(&mut out, orig_column - prev_orig_column);

            prev_column = m.generated_column as i64;
            prev_source = source;
            prev_line = orig_line;
            prev_orig_column = orig_column;
        }
        out
    }
}

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn encode_vlq(out: &mut String, value: i64) {
    let mut vlq = if value < 0 { ((-value) << 1) | 1 } else { value << 1 };
    loop {
        let mut digit = (vlq & 0b11111) as usize;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b100000;
        }
        out.push(BASE64[digit] as char);
        if vlq == 0 {
            break;
        }
    }
}
