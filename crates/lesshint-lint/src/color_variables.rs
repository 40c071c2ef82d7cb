// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! E04: inline colors that should be color variables.
//!
//! Runs in two phases. [`collect_color_variables`] walks the whole import
//! tree and returns every color assigned to a variable. [`check_inline_colors`]
//! then walks the primary file and matches each inline color against that
//! list.

use std::path::{Component, Path, PathBuf};

use lesshint_ast::{Color, FileId, Node, SourceSet, Stylesheet};

use crate::color::{distance, extract_colors};
use crate::error::LintError;
use crate::rules::LessInput;
use crate::types::{Code, Violation};
use crate::walker;

/// Colors closer than this to a variable's color suggest that variable.
pub const COLOR_MATCH_THRESHOLD: f64 = 35.0;

/// A color assigned to a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredColor {
    /// Variable name with the `@`.
    pub name: String,
    /// Byte offset of the variable in its file.
    pub index: usize,
    /// Declaring file; `None` for the primary file.
    pub file: Option<PathBuf>,
    pub color: Color,
}

pub fn check(input: &LessInput<'_>) -> Result<Vec<Violation>, LintError> {
    let stored = collect_color_variables(input.sheet, input.sources, &input.options.ignore)?;
    check_inline_colors(input.sheet, input.sources, &stored)
}

/// Every color of every variable in `sheet` and its imports, skipping
/// imported files under a directory named in `ignore`.
pub fn collect_color_variables(
    sheet: &Stylesheet,
    sources: &SourceSet,
    ignore: &[String],
) -> Result<Vec<StoredColor>, LintError> {
    let mut stored = Vec::new();
    walker::walk(sheet, true, &mut |node: &Node, _| {
        let Node::Variable(var) = node else {
            return Ok(());
        };
        let file = if var.file.is_primary() {
            None
        } else {
            let path = sources.path(var.file).map(Path::to_path_buf);
            if path.as_deref().is_some_and(|p| is_ignored(p, ignore)) {
                return Ok(());
            }
            path
        };
        for color in extract_colors(&var.value) {
            stored.push(StoredColor {
                name: var.name.clone(),
                index: var.index,
                file: file.clone(),
                color,
            });
        }
        Ok::<_, LintError>(())
    })?;
    tracing::debug!(count = stored.len(), "collected color variables");
    Ok(stored)
}

/// One violation per inline color in the declarations of the primary file.
pub fn check_inline_colors(
    sheet: &Stylesheet,
    sources: &SourceSet,
    stored: &[StoredColor],
) -> Result<Vec<Violation>, LintError> {
    let source = sources.text(FileId::PRIMARY);
    let mut violations = Vec::new();
    walker::walk(sheet, false, &mut |node: &Node, _| {
        let Node::Declaration(decl) = node else {
            return Ok(());
        };
        for color in extract_colors(&decl.value) {
            let message = match closest(stored, &color) {
                Some(var) => suggestion(var, &color, source),
                None => format!("Inline color {} should be declared as a color variable", color),
            };
            violations.push(Violation::at(source, decl.index, Code::E04, message));
        }
        Ok::<_, LintError>(())
    })?;
    Ok(violations)
}

/// The nearest stored color under the threshold; the earliest one on ties.
fn closest<'a>(stored: &'a [StoredColor], color: &Color) -> Option<&'a StoredColor> {
    let mut best: Option<(&StoredColor, f64)> = None;
    for candidate in stored {
        let d = distance(&candidate.color, color);
        if best.map_or(true, |(_, min)| d < min) {
            best = Some((candidate, d));
        }
    }
    best.filter(|(_, d)| *d < COLOR_MATCH_THRESHOLD).map(|(var, _)| var)
}

fn suggestion(var: &StoredColor, color: &Color, source: &str) -> String {
    match &var.file {
        None => {
            let line = lesshint_ast::index_to_location(source, var.index as i64).line;
            format!(
                "Use the color variable {} (declared on line {}) instead of the inline color {}",
                var.name, line, color
            )
        }
        // TODO: report the declaring line for variables from imported files.
        Some(path) => format!(
            "Use the color variable {} (from {}) instead of the inline color {}",
            var.name,
            path.display(),
            color
        ),
    }
}

fn is_ignored(path: &Path, ignore: &[String]) -> bool {
    path.components().any(|c| match c {
        Component::Normal(part) => ignore.iter().any(|dir| part == dir.as_str()),
        _ => false,
    })
}
