// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Checker registry and selection.

use lesshint_ast::{FileId, SourceSet, Stylesheet};
use lesshint_compile::SourceMap;

use crate::error::LintError;
use crate::types::{Code, LintOptions, Violation};
use crate::{abc, color_variables, nesting, overqualified};

/// What the Less-level checkers see: the parsed import tree.
pub struct LessInput<'a> {
    pub sheet: &'a Stylesheet,
    pub sources: &'a SourceSet,
    pub options: &'a LintOptions,
}

impl LessInput<'_> {
    pub fn primary_text(&self) -> &str {
        self.sources.text(FileId::PRIMARY)
    }
}

/// What the CSS-level checkers see: compiled output and its source map.
pub struct CssInput<'a> {
    pub css: &'a str,
    pub source_map: &'a SourceMap,
}

pub type LessCheck = fn(&LessInput<'_>) -> Result<Vec<Violation>, LintError>;
pub type CssCheck = fn(&CssInput<'_>) -> Result<Vec<Violation>, LintError>;

#[derive(Clone, Copy)]
pub enum Check {
    Less(LessCheck),
    Css(CssCheck),
}

/// A lint rule: code, id, check function.
#[derive(Clone, Copy)]
pub struct Rule {
    pub code: Code,
    pub id: &'static str,
    pub check: Check,
}

/// All registered rules, in reporting order.
pub fn all_rules() -> Vec<Rule> {
    vec![
        Rule { code: Code::E01, id: "abc", check: Check::Less(abc::check) },
        Rule { code: Code::E02, id: "nesting", check: Check::Less(nesting::check) },
        Rule { code: Code::E03, id: "overqualified", check: Check::Css(overqualified::check) },
        Rule { code: Code::E04, id: "color", check: Check::Less(color_variables::check) },
    ]
}

/// The rules `opts` selects.
pub fn selected_rules(opts: &LintOptions) -> Vec<Rule> {
    all_rules().into_iter().filter(|rule| should_run(rule, opts)).collect()
}

/// Check if a rule should run based on include/exclude filters.
fn should_run(rule: &Rule, opts: &LintOptions) -> bool {
    // Exclude takes priority
    if opts.excludes.iter().any(|p| matches_rule(rule, p)) {
        return false;
    }

    // If no include filters, run all
    opts.rules.is_empty() || opts.rules.iter().any(|p| matches_rule(rule, p))
}

/// Match a rule against a pattern: its code, its id, or `*`.
fn matches_rule(rule: &Rule, pattern: &str) -> bool {
    pattern == "*" || pattern.eq_ignore_ascii_case(rule.code.as_str()) || pattern == rule.id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(opts: &LintOptions) -> Vec<&'static str> {
        selected_rules(opts).iter().map(|r| r.id).collect()
    }

    #[test]
    fn everything_runs_by_default() {
        assert_eq!(ids(&LintOptions::default()), vec!["abc", "nesting", "overqualified", "color"]);
    }

    #[test]
    fn include_by_code_or_id() {
        let opts = LintOptions {
            rules: vec!["E03".into(), "abc".into()],
            ..LintOptions::default()
        };
        assert_eq!(ids(&opts), vec!["abc", "overqualified"]);
    }

    #[test]
    fn exclude_wins() {
        let opts = LintOptions {
            rules: vec!["*".into()],
            excludes: vec!["color".into(), "e02".into()],
            ..LintOptions::default()
        };
        assert_eq!(ids(&opts), vec!["abc", "overqualified"]);
    }
}
