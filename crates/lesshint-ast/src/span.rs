// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

/// A byte range in one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// A 1-based line/column position. Columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub const START: Location = Location { line: 1, column: 1 };

    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Resolve a flat offset into the text to a line/column pair.
///
/// The text is split on `\n`. Each line consumes its length plus one for the
/// terminator, so an index that lands on a `\n` resolves to column 1 of the
/// following line. Non-positive indices resolve to 1:1; indices past the end
/// of the text resolve to column 1 of the last line.
pub fn index_to_location(source: &str, index: i64) -> Location {
    if index <= 0 {
        return Location::START;
    }
    let mut remaining = index as usize;
    let mut lines = source.split('\n').peekable();
    let mut line = 1;
    while let Some(text) = lines.next() {
        if remaining < text.len() {
            return Location::new(line, remaining + 1);
        }
        if lines.peek().is_none() {
            break;
        }
        remaining -= (text.len() + 1).min(remaining);
        line += 1;
    }
    Location::new(line, 1)
}

/// Precomputed line-start offsets for O(log n) byte-offset → line:col lookup.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offset of the start of each line. line_starts[0] is always 0.
    line_starts: Vec<usize>,
}

impl LineMap {
    /// Build a line map by scanning source for newlines. O(n).
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineMap { line_starts }
    }

    /// Convert byte offset to a location, both parts 1-based. O(log n).
    ///
    /// A `\n` belongs to the line it terminates.
    pub fn location(&self, offset: usize) -> Location {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        Location::new(line_idx + 1, offset - self.line_starts[line_idx] + 1)
    }

    /// Get the source text of a 1-based line number. O(1).
    pub fn line_text<'a>(&self, source: &'a str, line: usize) -> Option<&'a str> {
        let idx = line.checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s.saturating_sub(1)) // exclude the \n
            .unwrap_or(source.len());
        source.get(start..end).map(|s| s.strip_suffix('\r').unwrap_or(s))
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
