// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Joining nested selectors onto their parents.

/// Resolve `children` against `parents`.
///
/// A child containing `&` has every `&` replaced by the parent; any other
/// child is appended to the parent as a descendant. Lists multiply out.
pub fn join(parents: &[String], children: &[String]) -> Vec<String> {
    if parents.is_empty() {
        let mut joined: Vec<String> = Vec::with_capacity(children.len());
        for selector in children.iter().filter_map(|child| without_parent(child)) {
            if !joined.contains(&selector) {
                joined.push(selector);
            }
        }
        return joined;
    }

    let mut joined = Vec::with_capacity(parents.len() * children.len());
    for child in children {
        for parent in parents {
            let selector = if child.contains('&') {
                child.replace('&', parent)
            } else {
                format!("{} {}", parent, child)
            };
            if !joined.contains(&selector) {
                joined.push(selector);
            }
        }
    }
    joined
}

/// A top-level selector with `&` resolved to nothing. Combinators left
/// without an operand on either side are dropped; `None` when nothing
/// selectable remains.
fn without_parent(child: &str) -> Option<String> {
    let text = child.replace('&', "");
    let mut parts: Vec<&str> = Vec::new();
    for part in text.split_whitespace() {
        if is_combinator(part) {
            match parts.last() {
                None => continue,
                Some(last) if is_combinator(last) => {
                    parts.pop();
                }
                Some(_) => {}
            }
        }
        parts.push(part);
    }
    while parts.last().is_some_and(|last| is_combinator(last)) {
        parts.pop();
    }
    let selector = parts
        .join(" ")
        .trim_matches(|c: char| is_combinator_char(c) || c.is_whitespace())
        .to_string();
    (!selector.is_empty()).then_some(selector)
}

fn is_combinator_char(c: char) -> bool {
    matches!(c, '>' | '+' | '~')
}

fn is_combinator(part: &str) -> bool {
    !part.is_empty() && part.chars().all(is_combinator_char)
}

/// Remove `:extend(...)` pseudo-classes, which never reach the output.
pub fn strip_extend(selector: &str) -> String {
    const EXTEND: &str = ":extend(";
    let mut out = String::with_capacity(selector.len());
    let mut rest = selector;
    while let Some(start) = rest.find(EXTEND) {
        out.push_str(&rest[..start]);
        let mut depth = 0usize;
        let mut end = rest.len();
        for (i, c) in rest[start..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        end = start + i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn descendant_join() {
        assert_eq!(join(&strings(&[".a"]), &strings(&["span"])), strings(&[".a span"]));
        assert_eq!(join(&strings(&[".a"]), &strings(&["> li"])), strings(&[".a > li"]));
    }

    #[test]
    fn parent_reference() {
        assert_eq!(join(&strings(&["div"]), &strings(&["&.active"])), strings(&["div.active"]));
        assert_eq!(join(&strings(&[".btn"]), &strings(&["&-primary"])), strings(&[".btn-primary"]));
        assert_eq!(
            join(&strings(&[".a"]), &strings(&[".no-js &"])),
            strings(&[".no-js .a"])
        );
    }

    #[test]
    fn lists_multiply() {
        let joined = join(&strings(&[".a", ".b"]), &strings(&["p", "&:hover"]));
        assert_eq!(joined, strings(&[".a p", ".b p", ".a:hover", ".b:hover"]));
    }

    #[test]
    fn top_level_parent_reference_is_dropped() {
        assert_eq!(join(&[], &strings(&["&.x", "ul"])), strings(&[".x", "ul"]));
    }

    #[test]
    fn top_level_parent_only_selectors_vanish() {
        assert!(join(&[], &strings(&["&"])).is_empty());
        assert!(join(&[], &strings(&["& + &"])).is_empty());
        assert_eq!(join(&[], &strings(&["& + & .x", "& > li"])), strings(&[".x", "li"]));
        assert_eq!(join(&[], &strings(&[".a + &", ".a ~ & > .b"])), strings(&[".a", ".a > .b"]));
    }

    #[test]
    fn extend_is_stripped() {
        assert_eq!(strip_extend("div.a:extend(.b)"), "div.a");
        assert_eq!(strip_extend(".a:extend(.b all):hover"), ".a:hover");
        assert_eq!(strip_extend(".a:extend(:not(.c)) p"), ".a p");
        assert_eq!(strip_extend("ul li"), "ul li");
    }
}
