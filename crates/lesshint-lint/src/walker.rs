// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Depth-first stylesheet traversal.
//!
//! Top-level nodes are at depth 1. Children sit one level below their
//! parent. An import's stylesheet counts as a level of its own, so the rules
//! of a file imported at depth `d` are visited at `d + 2`.
//!
//! A walk returns once every reachable node has been visited. The first
//! error returned by the visitor stops it and is handed back to the caller.

use lesshint_ast::{Node, Stylesheet};

/// Visit every node of `sheet`, descending into imported stylesheets when
/// `traverse_imports` is set.
pub fn walk<E, F>(sheet: &Stylesheet, traverse_imports: bool, visit: &mut F) -> Result<(), E>
where
    F: FnMut(&Node, usize) -> Result<(), E>,
{
    walk_nodes(&sheet.rules, 1, traverse_imports, visit)
}

/// Like [`walk`], but only rule-like nodes (those with selectors) reach the
/// visitor. Depths are the same as for a full walk.
pub fn walk_rules<E, F>(sheet: &Stylesheet, traverse_imports: bool, visit: &mut F) -> Result<(), E>
where
    F: FnMut(&Node, usize) -> Result<(), E>,
{
    walk(sheet, traverse_imports, &mut |node: &Node, depth| {
        if node.selectors().is_some() {
            visit(node, depth)
        } else {
            Ok(())
        }
    })
}

fn walk_nodes<E, F>(nodes: &[Node], depth: usize, traverse_imports: bool, visit: &mut F) -> Result<(), E>
where
    F: FnMut(&Node, usize) -> Result<(), E>,
{
    for node in nodes {
        visit(node, depth)?;
        walk_nodes(node.children(), depth + 1, traverse_imports, visit)?;
        if traverse_imports {
            if let Some(root) = node.import_root() {
                walk_nodes(&root.rules, depth + 2, traverse_imports, visit)?;
            }
        }
    }
    Ok(())
}
