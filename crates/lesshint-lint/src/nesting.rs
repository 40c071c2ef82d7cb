// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! E02: rulesets nested too deeply.

use lesshint_ast::Node;

use crate::error::LintError;
use crate::rules::LessInput;
use crate::types::{Code, Violation};
use crate::walker;

pub const MAX_NESTING_DEPTH: usize = 4;

pub fn check(input: &LessInput<'_>) -> Result<Vec<Violation>, LintError> {
    let source = input.primary_text();
    let mut violations = Vec::new();
    walker::walk_rules(input.sheet, false, &mut |node: &Node, depth| {
        if depth <= MAX_NESTING_DEPTH {
            return Ok(());
        }
        // Synthetic @media bodies have no element to point at.
        let first = node
            .selectors()
            .and_then(|selectors| selectors.first())
            .and_then(|selector| selector.elements.first());
        if let Some(element) = first {
            violations.push(Violation::at(
                source,
                element.index,
                Code::E02,
                format!(
                    "Ruleset is nested {} levels deep; the maximum is {}",
                    depth, MAX_NESTING_DEPTH
                ),
            ));
        }
        Ok::<_, LintError>(())
    })?;
    Ok(violations)
}
