// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! E03: element names qualifying an id or class.
//!
//! Runs on the compiled CSS so that nesting, `&` and mixins are already
//! resolved into full selectors. Each generated rule is mapped back to the
//! Less source through the source map.

use lesshint_ast::selector::{compound_text, Element, ElementKind};
use lesshint_ast::{FileId, LineMap, Node};
use lesshint_parser::parse_source;

use crate::error::LintError;
use crate::rules::CssInput;
use crate::types::{Code, Violation};
use crate::walker;

pub fn check(input: &CssInput<'_>) -> Result<Vec<Violation>, LintError> {
    let sheet = parse_source(input.css, FileId::PRIMARY).map_err(LintError::InvalidCss)?;
    let lines = LineMap::new(input.css);
    let mut violations = Vec::new();

    walker::walk_rules(&sheet, false, &mut |node: &Node, _| -> Result<(), LintError> {
        let Some(selectors) = node.selectors() else {
            return Ok(());
        };
        if selectors.iter().all(|s| s.is_implicit()) {
            return Ok(());
        }
        let generated = lines.location(node.index());
        let original = input
            .source_map
            .original_position_for(generated.line, generated.column - 1)
            .ok_or(LintError::UnmappedRule {
                line: generated.line,
                column: generated.column,
            })?;
        if !original.file.is_primary() {
            tracing::trace!(source = original.source, "skipping imported rule");
            return Ok(());
        }
        for selector in selectors {
            for part in selector.compounds() {
                if is_overqualified(part) {
                    violations.push(Violation::new(
                        original.line,
                        original.column + 1,
                        Code::E03,
                        format!("Selector \"{}\" is overqualified", compound_text(part)),
                    ));
                }
            }
        }
        Ok(())
    })?;
    Ok(violations)
}

fn is_overqualified(part: &[Element]) -> bool {
    let kinds: Vec<ElementKind> = part.iter().map(Element::kind).collect();
    kinds.contains(&ElementKind::Tag)
        && kinds
            .iter()
            .any(|k| matches!(k, ElementKind::Id | ElementKind::Class))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{css_check, parse_tree};

    fn messages(src: &str) -> Vec<String> {
        css_check(src).into_iter().map(|v| v.message).collect()
    }

    #[test]
    fn element_with_id() {
        let v = css_check("div#main { color: black; }");
        assert_eq!(v.len(), 1);
        assert!(v[0].message.contains("div#main"));
        assert_eq!((v[0].line, v[0].column), (1, 1));
    }

    #[test]
    fn one_violation_per_part() {
        assert_eq!(messages("a.button.primary:hover { x: y; }").len(), 1);
        assert_eq!(messages("ul.nav > li.item { x: y; }").len(), 2);
    }

    #[test]
    fn plain_selectors_pass() {
        assert!(messages("#main .nav { x: y; }").is_empty());
        assert!(messages("div span { x: y; }").is_empty());
        assert!(messages("div .a { x: y; }").is_empty());
    }

    #[test]
    fn nested_selectors_are_resolved_first() {
        let src = ".page {\n  span {\n    &.active { color: red; }\n  }\n}";
        let v = css_check(src);
        assert_eq!(v.len(), 1);
        assert!(v[0].message.contains("span.active"));
        assert_eq!((v[0].line, v[0].column), (3, 5));
    }

    #[test]
    fn keyframe_steps_never_qualify() {
        let src = "@keyframes spin {\n  0% { x: y; }\n  100% { x: z; }\n}";
        assert!(messages(src).is_empty());
    }

    #[test]
    fn rules_in_media_are_checked() {
        let src = "@media print {\n  div.ad { display: none; }\n}";
        let v = css_check(src);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].line, 2);
    }

    #[test]
    fn imported_rules_are_skipped() {
        let (parsed, _) = parse_tree(
            "main.less",
            "@import \"lib\";\np.intro { x: y; }",
            &[("lib.less", "div#header { x: y; }")],
        );
        let output = lesshint_compile::compile(&parsed.root, &parsed.sources).unwrap();
        let v = check(&CssInput {
            css: &output.css,
            source_map: &output.source_map,
        })
        .unwrap();
        assert_eq!(v.len(), 1);
        assert!(v[0].message.contains("p.intro"));
    }

    #[test]
    fn unmapped_rule_is_a_fault() {
        let map = lesshint_compile::SourceMap::default();
        let err = check(&CssInput { css: "a.b { x: y; }\n", source_map: &map }).unwrap_err();
        assert!(matches!(err, LintError::UnmappedRule { line: 1, .. }));
    }
}
