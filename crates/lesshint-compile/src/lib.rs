// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Less to CSS compilation with source maps.
//!
//! The compiler resolves nesting, parent selectors, variables in selectors
//! and queries, media bubbling and mixin calls. It only needs to be faithful
//! enough for selector-level checks on the output; functions such as
//! `darken()` are emitted unevaluated.

mod compiler;
mod eval;
mod scope;
mod selectors;
mod sourcemap;
mod writer;

use lesshint_ast::{FileId, SourceSet, Stylesheet};
use thiserror::Error;

pub use compiler::{Compiler, CssBlock, CssDeclaration, CssItem, CssRule};
pub use sourcemap::{Mapping, OriginalPosition, SourceMap};

/// Where a compiled construct came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub file: FileId,
    pub index: usize,
}

impl Origin {
    pub fn new(file: FileId, index: usize) -> Self {
        Self { file, index }
    }
}

#[derive(Debug, Clone, Error)]
pub enum CompileError {
    #[error("variable {name} is undefined")]
    UndefinedVariable { name: String, file: FileId, index: usize },
    #[error("missing '}}' in variable interpolation")]
    UnclosedInterpolation { file: FileId, index: usize },
}

impl CompileError {
    pub fn origin(&self) -> Origin {
        match self {
            CompileError::UndefinedVariable { file, index, .. }
            | CompileError::UnclosedInterpolation { file, index } => Origin::new(*file, *index),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub css: String,
    pub source_map: SourceMap,
}

/// Compile a parsed stylesheet. `sources` must be the set it was parsed from.
pub fn compile(sheet: &Stylesheet, sources: &SourceSet) -> Result<CompileOutput, CompileError> {
    let items = Compiler::new().compile(sheet)?;
    let mut writer = writer::Writer::new(sources);
    writer.items(&items, 0);
    let (css, source_map) = writer.finish();
    tracing::debug!(
        items = items.len(),
        bytes = css.len(),
        mappings = source_map.mappings().len(),
        "compiled"
    );
    Ok(CompileOutput { css, source_map })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesshint_parser::{parse_file, MemoryLoader};
    use std::path::Path;

    fn compile_str(src: &str) -> CompileOutput {
        let parsed = parse_file(Path::new("test.less"), src, &MemoryLoader::new()).unwrap();
        compile(&parsed.root, &parsed.sources).unwrap()
    }

    #[test]
    fn writes_css() {
        let out = compile_str(".a {\n  color: red;\n  .b { top: 0 }\n}\n");
        assert_eq!(out.css, ".a {\n  color: red;\n}\n.a .b {\n  top: 0;\n}\n");
    }

    #[test]
    fn maps_rules_back_to_their_selectors() {
        let out = compile_str("@x: 1;\n.a {\n  .b {\n    top: @x;\n  }\n}\n");
        assert_eq!(out.css, ".a .b {\n  top: 1;\n}\n");

        let rule = out.source_map.original_position_for(1, 0).unwrap();
        assert_eq!((rule.line, rule.column), (3, 2));
        assert_eq!(rule.source, "test.less");
        let decl = out.source_map.original_position_for(2, 2).unwrap();
        assert_eq!((decl.line, decl.column), (4, 4));
    }

    #[test]
    fn media_blocks_are_indented() {
        let out = compile_str("@media print { a { color: red; } }");
        assert_eq!(out.css, "@media print {\n  a {\n    color: red;\n  }\n}\n");
        let inner = out.source_map.original_position_for(2, 2).unwrap();
        assert_eq!(inner.column, 15);
    }

    #[test]
    fn imported_rules_map_to_their_file() {
        let mut loader = MemoryLoader::new();
        loader.insert("lib.less", "\n.lib { top: 0; }");
        let parsed = parse_file(Path::new("main.less"), "@import \"lib\";\n.own { top: 1px; }", &loader)
            .unwrap();
        let out = compile(&parsed.root, &parsed.sources).unwrap();

        let lib = out.source_map.original_position_for(1, 0).unwrap();
        assert_eq!((lib.file, lib.source, lib.line), (FileId(1), "lib.less", 2));
        let own = out.source_map.original_position_for(4, 0).unwrap();
        assert!(own.file.is_primary());
    }

    #[test]
    fn reference_imports_only_contribute_definitions() {
        let mut loader = MemoryLoader::new();
        loader.insert("mixins.less", ".hidden { top: 0; } .m() { left: 0; }");
        let parsed = parse_file(
            Path::new("main.less"),
            "@import (reference) \"mixins\";\n.a { .m(); }",
            &loader,
        )
        .unwrap();
        let out = compile(&parsed.root, &parsed.sources).unwrap();
        assert_eq!(out.css, ".a {\n  left: 0;\n}\n");
    }

    #[test]
    fn css_imports_pass_through() {
        let out = compile_str("@import url(reset.css);\n@charset \"utf-8\";");
        assert_eq!(out.css, "@import url(reset.css);\n@charset \"utf-8\";\n");
    }

    #[test]
    fn undefined_variable_error_has_origin() {
        let parsed =
            parse_file(Path::new("t.less"), "a {}\n@media @{q} { a { top: 0 } }", &MemoryLoader::new())
                .unwrap();
        let err = compile(&parsed.root, &parsed.sources).unwrap_err();
        assert_eq!(err.origin(), Origin::new(FileId::PRIMARY, 5));
    }
}
