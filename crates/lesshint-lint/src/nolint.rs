// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `@Nolint` line suppression.

use crate::types::{Code, Violation};

pub const NOLINT_MARKER: &str = "@Nolint";

/// Drop violations on lines of `source` that contain `@Nolint`. E0 is never
/// dropped.
pub fn filter(source: &str, violations: Vec<Violation>) -> Vec<Violation> {
    let marked: Vec<bool> = source.split('\n').map(|l| l.contains(NOLINT_MARKER)).collect();
    violations
        .into_iter()
        .filter(|v| {
            v.code == Code::E0 || !marked.get(v.line.wrapping_sub(1)).copied().unwrap_or(false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_lines_are_dropped() {
        let source = "a {\n  margin: 0; // @Nolint\n  color: #fff;\n}";
        let violations = vec![
            Violation::new(2, 3, Code::E01, "order"),
            Violation::new(3, 3, Code::E04, "color"),
            Violation::new(2, 1, Code::E0, "broken"),
        ];
        let kept: Vec<Code> = filter(source, violations).iter().map(|v| v.code).collect();
        assert_eq!(kept, vec![Code::E04, Code::E0]);
    }

    #[test]
    fn marker_is_case_sensitive() {
        let kept = filter("a { color: #fff; } // @nolint", vec![Violation::new(1, 5, Code::E04, "x")]);
        assert_eq!(kept.len(), 1);
    }
}
