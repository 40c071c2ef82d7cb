// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! E01: declarations in alphabetical order.

use lesshint_ast::node::Declaration;
use lesshint_ast::Node;

use crate::error::LintError;
use crate::rules::LessInput;
use crate::types::{Code, Violation};
use crate::walker;

pub fn check(input: &LessInput<'_>) -> Result<Vec<Violation>, LintError> {
    let source = input.primary_text();
    let mut violations = Vec::new();
    walker::walk_rules(input.sheet, false, &mut |node: &Node, _| {
        if let Some(prev) = first_out_of_order(node.children()) {
            violations.push(Violation::at(
                source,
                prev.index,
                Code::E01,
                format!("Property \"{}\" is out of alphabetical order", prev.name),
            ));
        }
        Ok::<_, LintError>(())
    })?;
    Ok(violations)
}

/// The earlier declaration of the first adjacent pair that decreases.
///
/// Anything that is not a declaration is skipped without resetting the
/// comparison.
fn first_out_of_order(nodes: &[Node]) -> Option<&Declaration> {
    let mut declarations = nodes.iter().filter_map(|node| match node {
        Node::Declaration(decl) => Some(decl),
        _ => None,
    });
    let mut prev = declarations.next()?;
    for next in declarations {
        if prev.name > next.name {
            return Some(prev);
        }
        prev = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::less_check;

    #[test]
    fn ordered_rule_is_clean() {
        let v = less_check(check, "a {\n  background: red;\n  color: blue;\n  margin: 0;\n}");
        assert!(v.is_empty());
    }

    #[test]
    fn points_at_earlier_declaration() {
        let v = less_check(
            check,
            "a {\n  margin: 0;\n  background-color: black;\n  color: white;\n}",
        );
        assert_eq!(v.len(), 1);
        assert_eq!((v[0].line, v[0].column), (2, 3));
        assert!(v[0].message.contains("margin"));
    }

    #[test]
    fn one_violation_per_rule() {
        let v = less_check(check, "a { z: 1; y: 2; x: 3; }");
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn variables_and_nested_rules_do_not_reset() {
        let src = "a {\n  color: red;\n  @x: 1;\n  .b { z: 1; a: 2; }\n  background: blue;\n}";
        let v = less_check(check, src);
        let lines: Vec<usize> = v.iter().map(|v| v.line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn order_is_case_sensitive() {
        assert!(less_check(check, "a { Z: 1; a: 2; }").is_empty());
        assert_eq!(less_check(check, "a { a: 1; Z: 2; }").len(), 1);
    }
}
