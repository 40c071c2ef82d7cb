// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `khan-lesshint` — Less style checks.
//!
//! A file is parsed once, imports included. Three checkers (E01 abc, E02
//! nesting, E04 color variables) run on the Less tree. The tree is also
//! compiled to CSS, and E03 (overqualified selectors) runs on that output,
//! mapped back through the source map. A file that fails to parse or compile
//! gets a single E0 instead.

pub mod abc;
pub mod color;
pub mod color_variables;
pub mod config;
pub mod error;
pub mod nesting;
pub mod nolint;
pub mod overqualified;
pub mod rules;
pub mod types;
pub mod walker;

use std::path::Path;

use futures::future::try_join_all;

use lesshint_ast::{Location, SourceSet};
use lesshint_compile::CompileError;
use lesshint_diagnostics::Reporter;
use lesshint_parser::{parse_file, FsLoader, ImportLoader, ParseFailure};

pub use config::{ConfigError, LintConfig};
pub use error::LintError;
pub use types::{Code, LintOptions, LintReport, Violation};

use rules::{Check, CssInput, LessInput};

/// Lint `source`, the contents of `filename`, reading imports from disk.
pub fn lint(filename: &str, source: &str, options: &LintOptions) -> Result<LintReport, LintError> {
    lint_with_loader(filename, source, options, &FsLoader)
}

/// Lint with imports read through `loader`.
pub fn lint_with_loader(
    filename: &str,
    source: &str,
    options: &LintOptions,
    loader: &dyn ImportLoader,
) -> Result<LintReport, LintError> {
    futures::executor::block_on(lint_async(filename, source, options, loader))
}

/// Lint and hand the report to `reporter`. Returns the number of violations.
pub fn lint_with_reporter(
    filename: &str,
    source: &str,
    options: &LintOptions,
    reporter: &mut dyn Reporter,
) -> Result<usize, LintError> {
    let report = lint(filename, source, options)?;
    reporter.report(&report.records())?;
    Ok(report.error_count())
}

pub async fn lint_async(
    filename: &str,
    source: &str,
    options: &LintOptions,
    loader: &dyn ImportLoader,
) -> Result<LintReport, LintError> {
    let parsed = match parse_file(Path::new(filename), source, loader) {
        Ok(parsed) => parsed,
        Err(failure) => {
            tracing::debug!(file = filename, error = %failure, "parse failed");
            return Ok(LintReport::fatal(filename, parse_violation(&failure)));
        }
    };
    tracing::debug!(file = filename, imports = parsed.sources.len() - 1, "parsed");

    let selected = rules::selected_rules(options);
    let input = LessInput {
        sheet: &parsed.root,
        sources: &parsed.sources,
        options,
    };
    let input = &input;

    let less = try_join_all(selected.iter().filter_map(|rule| match rule.check {
        Check::Less(check) => Some(async move { check(input).map(|found| (rule.code, found)) }),
        Check::Css(_) => None,
    }));

    let css = async {
        let output = match lesshint_compile::compile(&parsed.root, &parsed.sources) {
            Ok(output) => output,
            Err(error) => return Ok(Err(error)),
        };
        let css_input = CssInput {
            css: &output.css,
            source_map: &output.source_map,
        };
        let css_input = &css_input;
        let found = try_join_all(selected.iter().filter_map(|rule| match rule.check {
            Check::Css(check) => Some(async move { check(css_input).map(|found| (rule.code, found)) }),
            Check::Less(_) => None,
        }))
        .await?;
        Ok::<_, LintError>(Ok(found))
    };

    let (less, css) = futures::join!(less, css);
    let mut results = less?;
    match css? {
        Ok(found) => results.extend(found),
        Err(error) => {
            tracing::debug!(file = filename, error = %error, "compile failed");
            return Ok(LintReport::fatal(filename, compile_violation(&error, &parsed.sources)));
        }
    }

    results.sort_by_key(|(code, _)| *code);
    let violations = results.into_iter().flat_map(|(_, found)| found).collect();
    let violations = nolint::filter(source, violations);
    tracing::debug!(file = filename, violations = violations.len(), "linted");

    Ok(LintReport {
        file: filename.to_string(),
        violations,
        fatal: false,
    })
}

fn parse_violation(failure: &ParseFailure) -> Violation {
    let message = match failure.path() {
        Some(path) if !failure.error.file.is_primary() => {
            format!("{} (in {})", failure.error, path.display())
        }
        _ => failure.error.to_string(),
    };
    let Location { line, column } = failure.location();
    Violation::new(line, column, Code::E0, message)
}

fn compile_violation(error: &CompileError, sources: &SourceSet) -> Violation {
    let origin = error.origin();
    let location = sources
        .get(origin.file)
        .map(|file| file.location(origin.index))
        .unwrap_or(Location::START);
    let message = match sources.path(origin.file) {
        Some(path) if !origin.file.is_primary() => format!("{} (in {})", error, path.display()),
        _ => error.to_string(),
    };
    Violation::new(location.line, location.column, Code::E0, message)
}


#[cfg(test)]
mod tests {
    use super::*;
    use lesshint_diagnostics::TextReporter;
    use lesshint_parser::MemoryLoader;

    fn lint_str(source: &str) -> LintReport {
        lint_with_loader("test.less", source, &LintOptions::default(), &MemoryLoader::new()).unwrap()
    }

    fn codes(report: &LintReport) -> Vec<(Code, usize)> {
        report.violations.iter().map(|v| (v.code, v.line)).collect()
    }

    #[test]
    fn out_of_order_properties() {
        let report = lint_str("a {\n  margin: 0;\n  background-color: black;\n  color: white;\n}");
        assert_eq!(codes(&report), vec![(Code::E01, 2)]);
    }

    #[test]
    fn inline_color_without_variables() {
        let report = lint_str("a {\n  color: rgb(255, 0, 100);\n}");
        assert_eq!(codes(&report), vec![(Code::E04, 2)]);
        assert!(!report.violations[0].message.contains('@'));
    }

    #[test]
    fn overqualified_id() {
        let report = lint_str("div#main { color: black; }");
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].code, Code::E03);
        assert!(report.violations[0].message.contains("div#main"));
    }

    #[test]
    fn empty_input_is_clean() {
        for source in ["", "   \n\t\n"] {
            let report = lint_str(source);
            assert!(report.is_clean());
            assert!(!report.fatal);
        }
    }

    #[test]
    fn results_follow_checker_order() {
        let src = "@c: #123456;\ndiv.x {\n  z-index: 1;\n  color: #fff;\n}";
        let report = lint_str(src);
        let found: Vec<Code> = report.violations.iter().map(|v| v.code).collect();
        assert_eq!(found, vec![Code::E01, Code::E03, Code::E04]);
    }

    #[test]
    fn syntax_error_is_single_fatal_e0() {
        let report = lint_str("a {\n  color: red;\n");
        assert!(report.fatal);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].code, Code::E0);
    }

    #[test]
    fn undefined_selector_variable_is_e0() {
        let report = lint_str("div#main {}\n.@{missing} { color: red; }");
        assert!(report.fatal);
        assert_eq!(codes(&report), vec![(Code::E0, 2)]);
        assert!(report.violations[0].message.contains("@missing"));
    }

    #[test]
    fn missing_import_in_import_names_the_file() {
        let mut loader = MemoryLoader::new();
        loader.insert("lib.less", "\n@import \"gone\";");
        let report =
            lint_with_loader("main.less", "@import \"lib\";", &LintOptions::default(), &loader).unwrap();
        assert!(report.fatal);
        let v = &report.violations[0];
        assert_eq!((v.line, v.column), (2, 1));
        assert_eq!(v.message, "'gone' wasn't found (in lib.less)");
    }

    #[test]
    fn top_level_parent_selectors_are_not_fatal() {
        for source in ["& { a: b; }", "& + & { a: b; }"] {
            let report = lint_str(source);
            assert!(!report.fatal, "{source}");
            assert!(report.is_clean(), "{source}: {:?}", report.violations);
        }
    }

    #[test]
    fn overqualified_selector_ignores_extend_and_comments() {
        let report = lint_str("div.a:extend(.b) { x: y; }");
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].message, "Selector \"div.a\" is overqualified");

        let report = lint_str("div/* c */.x { a: b; }");
        assert_eq!(codes(&report), vec![(Code::E03, 1)]);
        assert!(report.violations[0].message.contains("div.x"));
    }

    #[test]
    fn nolint_suppresses_line() {
        let report = lint_str("a {\n  color: #f00; // @Nolint\n  background: #0f0;\n}");
        assert_eq!(codes(&report), vec![(Code::E04, 3)]);
    }

    #[test]
    fn excluded_rules_do_not_run() {
        let options = LintOptions {
            excludes: vec!["color".into(), "E03".into()],
            ..LintOptions::default()
        };
        let report =
            lint_with_loader("t.less", "div#a { color: #fff; }", &options, &MemoryLoader::new()).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn reporter_receives_records() {
        let mut reporter = TextReporter::new(Vec::new());
        let count = lint_with_reporter(
            "missing-dir/none.less",
            "div.a { x: y; }",
            &LintOptions::default(),
            &mut reporter,
        )
        .unwrap();
        assert_eq!(count, 1);
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(out, "missing-dir/none.less:1:1: E03 Selector \"div.a\" is overqualified\n");
    }
}
