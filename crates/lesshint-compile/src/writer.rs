// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CSS text output with source map recording.

use lesshint_ast::SourceSet;

use crate::compiler::{CssDeclaration, CssItem};
use crate::sourcemap::{Mapping, SourceMap};
use crate::Origin;

const INDENT: &str = "  ";

pub struct Writer<'s> {
    sources: &'s SourceSet,
    out: String,
    /// 1-based
    line: usize,
    /// 0-based, in bytes
    column: usize,
    map: SourceMap,
}

impl<'s> Writer<'s> {
    pub fn new(sources: &'s SourceSet) -> Self {
        let map = SourceMap::new(sources.iter().map(|f| (f.path.clone(), f.text.clone())));
        Self { sources, out: String::new(), line: 1, column: 0, map }
    }

    pub fn finish(self) -> (String, SourceMap) {
        (self.out, self.map)
    }

    fn write(&mut self, text: &str) {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.line += 1;
                self.column = 0;
            }
            self.column += part.len();
        }
        self.out.push_str(text);
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.write(INDENT);
        }
    }

    fn mark(&mut self, origin: Origin) {
        let Some(file) = self.sources.get(origin.file) else {
            return;
        };
        let loc = file.location(origin.index);
        self.map.add(Mapping {
            generated_line: self.line,
            generated_column: self.column,
            source: origin.file,
            original_line: loc.line,
            original_column: loc.column.saturating_sub(1),
        });
    }

    pub fn items(&mut self, items: &[CssItem], depth: usize) {
        for item in items {
            if item.is_empty() {
                continue;
            }
            match item {
                CssItem::Rule(rule) => {
                    self.indent(depth);
                    self.mark(rule.origin);
                    self.write(&rule.selectors.join(", "));
                    self.write(" {\n");
                    self.declarations(&rule.declarations, depth + 1);
                    self.indent(depth);
                    self.write("}\n");
                }
                CssItem::Block(block) => {
                    self.indent(depth);
                    self.mark(block.origin);
                    self.write("@");
                    self.write(&block.name);
                    if !block.prelude.is_empty() {
                        self.write(" ");
                        self.write(&block.prelude);
                    }
                    self.write(" {\n");
                    self.declarations(&block.declarations, depth + 1);
                    self.items(&block.items, depth + 1);
                    self.indent(depth);
                    self.write("}\n");
                }
                CssItem::Statement { text, origin } => {
                    self.indent(depth);
                    self.mark(*origin);
                    self.write(text);
                    self.write("\n");
                }
            }
        }
    }

    fn declarations(&mut self, declarations: &[CssDeclaration], depth: usize) {
        for decl in declarations {
            self.indent(depth);
            self.mark(decl.origin);
            self.write(&decl.name);
            self.write(": ");
            self.write(&decl.value);
            if decl.important {
                self.write(" !important");
            }
            self.write(";\n");
        }
    }
}
