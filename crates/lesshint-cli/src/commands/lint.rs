// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The default command: lint files and directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lesshint_diagnostics::{reporter_by_name, Reporter, REPORTER_NAMES};
use lesshint_lint::{LintConfig, LintError, LintOptions};

use super::{EXIT_FAULT, EXIT_OK, EXIT_VIOLATIONS};
use crate::cli::LintArgs;
use crate::output;

const DEFAULT_REPORTER: &str = "text";

pub fn cmd_lint(args: &LintArgs) -> i32 {
    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", output::error_label(), e);
            return EXIT_FAULT;
        }
    };
    let options = merge_options(&config, args);

    let reporter_name = args
        .reporter
        .as_deref()
        .or(config.reporter.as_deref())
        .unwrap_or(DEFAULT_REPORTER);
    let Some(mut reporter) = reporter_by_name(reporter_name, Box::new(io::stdout())) else {
        eprintln!(
            "{}: unknown reporter `{}` (expected one of: {})",
            output::error_label(),
            reporter_name,
            REPORTER_NAMES.join(", ")
        );
        return EXIT_FAULT;
    };

    if args.paths.is_empty() {
        eprintln!("{}: no input files", output::error_label());
        return EXIT_FAULT;
    }

    let files: Vec<PathBuf> = args.paths.iter().flat_map(|p| collect_less_files(p)).collect();
    match lint_files(&files, &options, reporter.as_mut()) {
        Ok(0) => EXIT_OK,
        Ok(_) => EXIT_VIOLATIONS,
        Err(e) => {
            tracing::error!(error = %e, "lint aborted");
            EXIT_FAULT
        }
    }
}

/// Lint every file in turn. Returns the number of problems found.
fn lint_files(files: &[PathBuf], options: &LintOptions, reporter: &mut dyn Reporter) -> Result<usize, LintError> {
    let mut total = 0;
    for file in files {
        let name = file.display().to_string();
        let source = match fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("SKIPPING lint of {}: {}", name, e);
                total += 1;
                continue;
            }
        };
        total += lesshint_lint::lint_with_reporter(&name, &source, options, reporter)?;
    }
    reporter.finish()?;
    Ok(total)
}

fn load_config(args: &LintArgs) -> Result<LintConfig, lesshint_lint::ConfigError> {
    if let Some(path) = &args.config {
        return LintConfig::load(path);
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    Ok(LintConfig::discover(&cwd)?
        .map(|(_, config)| config)
        .unwrap_or_default())
}

/// Flags extend the config file's lists.
fn merge_options(config: &LintConfig, args: &LintArgs) -> LintOptions {
    let mut options = config.options();
    options.ignore.extend(args.ignore.iter().cloned());
    options.rules.extend(args.rules.iter().cloned());
    options.excludes.extend(args.excludes.iter().cloned());
    options
}

/// `path` itself, or every `.less` file below it when it is a directory.
/// A missing path is returned as is so that reading it reports the problem.
fn collect_less_files(path: &Path) -> Vec<PathBuf> {
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }

    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_less_files(&path));
            } else if path.extension().map(|e| e == "less").unwrap_or(false) {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_are_searched_for_less_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.less"), "").unwrap();
        fs::write(dir.path().join("nested/a.less"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = collect_less_files(dir.path());
        let names: Vec<String> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names, vec!["b.less", "nested/a.less"]);
    }

    #[test]
    fn flags_extend_config() {
        let config = LintConfig {
            ignore: vec!["vendor".into()],
            exclude: vec!["E02".into()],
            ..LintConfig::default()
        };
        let args = LintArgs {
            ignore: vec!["third_party".into()],
            excludes: vec!["color".into()],
            ..LintArgs::default()
        };
        let options = merge_options(&config, &args);
        assert_eq!(options.ignore, vec!["vendor", "third_party"]);
        assert_eq!(options.excludes, vec!["E02", "color"]);
    }

    #[test]
    fn unreadable_files_count_as_problems() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("ok.less");
        fs::write(&good, ".a { color: @c; }\n@c: red;\n").unwrap();
        let files = vec![dir.path().join("missing.less"), good];

        let mut reporter = lesshint_diagnostics::TextReporter::new(Vec::new());
        let total = lint_files(&files, &LintOptions::default(), &mut reporter).unwrap();
        assert_eq!(total, 1);
        assert!(reporter.into_inner().is_empty());
    }
}
