// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! End-to-end lint runs over on-disk import trees.

use std::fs;
use std::path::Path;

use lesshint_lint::{lint, Code, LintOptions, LintReport};

fn write(root: &Path, name: &str, text: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn lint_file(root: &Path, name: &str, options: &LintOptions) -> LintReport {
    let path = root.join(name);
    let source = fs::read_to_string(&path).unwrap();
    lint(path.to_str().unwrap(), &source, options).unwrap()
}

fn summary(report: &LintReport) -> Vec<(Code, usize, usize)> {
    report
        .violations
        .iter()
        .map(|v| (v.code, v.line, v.column))
        .collect()
}

#[test]
fn imported_rules_and_variables() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "styles/colors.less", "@gray-light: #eeeeee;\n@link: #2a6ebb;\n");
    write(dir.path(), "styles/base.less", "div#chrome { margin: 0; }\n");
    write(
        dir.path(),
        "styles/page.less",
        "@import \"colors\";\n@import \"base.less\";\n\n.page {\n  a.more {\n    color: #2b6ebb;\n  }\n}\n",
    );

    let report = lint_file(dir.path(), "styles/page.less", &LintOptions::default());
    assert!(!report.fatal);
    assert_eq!(summary(&report), vec![(Code::E03, 5, 3), (Code::E04, 6, 5)]);

    let suggestion = &report.violations[1].message;
    assert!(suggestion.contains("@link"), "{}", suggestion);
    assert!(suggestion.contains("colors.less"), "{}", suggestion);
}

#[test]
fn ignored_directories_are_not_suggested() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "third_party/palette.less", "@vendor-red: #ff0000;\n");
    write(
        dir.path(),
        "app.less",
        "@import \"third_party/palette\";\n.alert { color: #ff0101; }\n",
    );

    let suggested = lint_file(dir.path(), "app.less", &LintOptions::default());
    assert!(suggested.violations[0].message.contains("@vendor-red"));

    let options = LintOptions {
        ignore: vec!["third_party".to_string()],
        ..LintOptions::default()
    };
    let report = lint_file(dir.path(), "app.less", &options);
    assert_eq!(summary(&report), vec![(Code::E04, 2, 10)]);
    assert!(!report.violations[0].message.contains("@vendor-red"));
}

#[test]
fn missing_import_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "main.less", ".a { color: red; }\n@import \"nowhere\";\n");

    let report = lint_file(dir.path(), "main.less", &LintOptions::default());
    assert!(report.fatal);
    assert_eq!(summary(&report), vec![(Code::E0, 2, 1)]);
    assert!(report.violations[0].message.contains("nowhere"));
}

#[test]
fn mixins_and_nesting() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "mixins.less",
        "\
.rounded(@r: 2px) {
  border-radius: @r;
}
.card {
  .rounded(4px);
  .header {
    .title {
      .icon {
        span.badge { display: block; }
      }
    }
  }
}
",
    );

    let report = lint_file(dir.path(), "mixins.less", &LintOptions::default());
    assert_eq!(summary(&report), vec![(Code::E02, 9, 9), (Code::E03, 9, 9)]);
}
