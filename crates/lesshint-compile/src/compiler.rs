// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Less tree to CSS items.
//!
//! Nested rulesets are flattened with their joined selectors, `@media` blocks
//! bubble out of rulesets, and mixin calls are expanded in place. Every item
//! keeps the [`Origin`] of the Less construct that produced it.

use lesshint_ast::node::{
    Declaration, Directive, Import, Media, MixinCall, Node, RuleSet,
};
use lesshint_ast::selector::Selector;
use lesshint_ast::{Stylesheet, Value};

use crate::eval::{self, eval, interpolate};
use crate::scope::{Frame, Mixin, Scope};
use crate::selectors;
use crate::{CompileError, Origin};

/// Mixin expansions nested deeper than this are skipped.
const MAX_MIXIN_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct CssDeclaration {
    pub name: String,
    pub value: String,
    pub important: bool,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CssRule {
    pub selectors: Vec<String>,
    pub declarations: Vec<CssDeclaration>,
    pub origin: Origin,
}

/// An at-rule with a block: `@media`, `@keyframes`, `@font-face`, ...
#[derive(Debug, Clone, PartialEq)]
pub struct CssBlock {
    pub name: String,
    pub prelude: String,
    pub declarations: Vec<CssDeclaration>,
    pub items: Vec<CssItem>,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CssItem {
    Rule(CssRule),
    Block(CssBlock),
    /// A complete at-rule statement such as `@charset "utf-8";`.
    Statement { text: String, origin: Origin },
}

impl CssItem {
    /// True when the item would print nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            CssItem::Rule(rule) => rule.declarations.is_empty(),
            CssItem::Block(block) => {
                block.declarations.is_empty() && block.items.iter().all(CssItem::is_empty)
            }
            CssItem::Statement { .. } => false,
        }
    }
}

/// Output collected while compiling one block.
#[derive(Debug, Default)]
struct Sink {
    declarations: Vec<CssDeclaration>,
    items: Vec<CssItem>,
}

impl Sink {
    fn push_declaration(&mut self, decl: CssDeclaration, merge: Option<&str>) {
        if let Some(sep) = merge {
            if let Some(existing) = self.declarations.iter_mut().find(|d| d.name == decl.name) {
                existing.value.push_str(if sep == "+_" { " " } else { ", " });
                existing.value.push_str(&decl.value);
                existing.important |= decl.important;
                return;
            }
        }
        self.declarations.push(decl);
    }
}

#[derive(Debug, Clone, Default)]
struct Context {
    /// Fully joined selectors of the enclosing ruleset.
    selectors: Vec<String>,
    /// Name and combined query of the enclosing conditional block.
    media: Option<(String, String)>,
}

pub struct Compiler<'a> {
    scope: Scope<'a>,
    mixin_depth: usize,
}

impl<'a> Compiler<'a> {
    pub fn new() -> Self {
        Self { scope: Scope::default(), mixin_depth: 0 }
    }

    pub fn compile(&mut self, sheet: &'a Stylesheet) -> Result<Vec<CssItem>, CompileError> {
        let mut sink = Sink::default();
        self.scope.push(Frame::from_nodes(&sheet.rules));
        let result = self.body(&sheet.rules, &Context::default(), &mut sink);
        self.scope.pop();
        result?;

        if !sink.declarations.is_empty() {
            tracing::warn!(
                count = sink.declarations.len(),
                "dropping declarations outside any ruleset"
            );
        }
        Ok(sink.items)
    }

    fn body(&mut self, nodes: &'a [Node], ctx: &Context, sink: &mut Sink) -> Result<(), CompileError> {
        for node in nodes {
            match node {
                Node::Rule(rule) => self.ruleset(rule, ctx, sink)?,
                Node::Declaration(decl) => {
                    let css = self.declaration(decl)?;
                    sink.push_declaration(css, decl.merge.as_deref());
                }
                Node::Media(media) => self.media(media, ctx, sink)?,
                Node::Directive(directive) => self.directive(directive, sink)?,
                Node::MixinCall(call) => self.mixin_call(call, ctx, sink)?,
                Node::Import(import) => self.import(import, ctx, sink)?,
                Node::Extend(extend) => {
                    tracing::trace!(target = %extend.target, "extend not applied");
                }
                Node::Variable(_)
                | Node::MixinDefinition(_)
                | Node::DetachedRuleset(_)
                | Node::Comment(_) => {}
            }
        }
        Ok(())
    }

    /// Compile `nodes` inside a fresh frame.
    fn scoped_body(
        &mut self,
        nodes: &'a [Node],
        ctx: &Context,
        sink: &mut Sink,
    ) -> Result<(), CompileError> {
        self.scope.push(Frame::from_nodes(nodes));
        let result = self.body(nodes, ctx, sink);
        self.scope.pop();
        result
    }

    fn ruleset(&mut self, rule: &'a RuleSet, ctx: &Context, sink: &mut Sink) -> Result<(), CompileError> {
        let selectors = if rule.selectors.iter().all(Selector::is_implicit) {
            ctx.selectors.clone()
        } else {
            let own = rule
                .selectors
                .iter()
                .map(|s| {
                    interpolate(&s.raw, &self.scope, rule.file, s.index).map(|raw| selectors::strip_extend(&raw))
                })
                .filter(|s| s.as_ref().map_or(true, |raw| !raw.is_empty()))
                .collect::<Result<Vec<_>, _>>()?;
            if own.is_empty() {
                ctx.selectors.clone()
            } else {
                selectors::join(&ctx.selectors, &own)
            }
        };

        let inner_ctx = Context { selectors, media: ctx.media.clone() };
        let mut inner = Sink::default();
        self.scoped_body(&rule.rules, &inner_ctx, &mut inner)?;

        if inner_ctx.selectors.is_empty() {
            sink.declarations.extend(inner.declarations);
        } else if !inner.declarations.is_empty() {
            sink.items.push(CssItem::Rule(CssRule {
                selectors: inner_ctx.selectors,
                declarations: inner.declarations,
                origin: Origin::new(rule.file, rule.index),
            }));
        }
        sink.items.extend(inner.items);
        Ok(())
    }

    fn declaration(&self, decl: &Declaration) -> Result<CssDeclaration, CompileError> {
        let name = if decl.name.contains("@{") {
            interpolate(&decl.name, &self.scope, decl.file, decl.index)?
        } else {
            decl.name.clone()
        };
        Ok(CssDeclaration {
            name,
            value: eval(&decl.value, &self.scope).to_string(),
            important: decl.important,
            origin: Origin::new(decl.file, decl.index),
        })
    }

    /// `@media` and friends bubble to the top with the enclosing selectors.
    fn media(&mut self, media: &'a Media, ctx: &Context, sink: &mut Sink) -> Result<(), CompileError> {
        let own = interpolate(&media.query, &self.scope, media.file, media.index)?;
        let query = match &ctx.media {
            Some((name, outer)) if *name == media.name => format!("{} and {}", outer, own),
            _ => own,
        };

        let inner_ctx = Context {
            selectors: ctx.selectors.clone(),
            media: Some((media.name.clone(), query.clone())),
        };
        let mut inner = Sink::default();
        self.body(&media.rules, &inner_ctx, &mut inner)?;

        let (hoisted, items): (Vec<_>, Vec<_>) = inner.items.into_iter().partition(|item| {
            matches!(item, CssItem::Block(block) if block.name == media.name && block.prelude.starts_with(&query))
        });
        sink.items.push(CssItem::Block(CssBlock {
            name: media.name.clone(),
            prelude: query,
            declarations: inner.declarations,
            items,
            origin: Origin::new(media.file, media.index),
        }));
        sink.items.extend(hoisted);
        Ok(())
    }

    fn directive(&mut self, directive: &'a Directive, sink: &mut Sink) -> Result<(), CompileError> {
        let prelude = interpolate(&directive.prelude, &self.scope, directive.file, directive.index)?;
        let origin = Origin::new(directive.file, directive.index);
        match &directive.rules {
            None => {
                let text = if prelude.is_empty() {
                    format!("@{};", directive.name)
                } else {
                    format!("@{} {};", directive.name, prelude)
                };
                sink.items.push(CssItem::Statement { text, origin });
            }
            Some(rules) => {
                let mut inner = Sink::default();
                self.scoped_body(rules, &Context::default(), &mut inner)?;
                sink.items.push(CssItem::Block(CssBlock {
                    name: directive.name.clone(),
                    prelude,
                    declarations: inner.declarations,
                    items: inner.items,
                    origin,
                }));
            }
        }
        Ok(())
    }

    fn import(&mut self, import: &'a Import, ctx: &Context, sink: &mut Sink) -> Result<(), CompileError> {
        if let Some(root) = &import.root {
            if import.options.reference {
                return Ok(());
            }
            return self.body(&root.rules, ctx, sink);
        }
        if import.is_css() {
            let target = if import.is_url {
                format!("url({})", import.path)
            } else {
                format!("\"{}\"", import.path)
            };
            let text = match &import.media {
                Some(media) => format!("@import {} {};", target, media),
                None => format!("@import {};", target),
            };
            sink.items.push(CssItem::Statement { text, origin: Origin::new(import.file, import.index) });
        } else if import.options.inline {
            tracing::debug!(path = %import.path, "inline import not emitted");
        }
        Ok(())
    }

    fn mixin_call(&mut self, call: &'a MixinCall, ctx: &Context, sink: &mut Sink) -> Result<(), CompileError> {
        if self.mixin_depth >= MAX_MIXIN_DEPTH {
            tracing::warn!(mixin = %call.path.join(" > "), "mixin expansion too deep, skipping");
            return Ok(());
        }

        if let [name] = call.path.as_slice() {
            if name.starts_with('@') {
                return match self.scope.detached(name) {
                    Some(rules) => self.expand(rules, Frame::default(), call.important, ctx, sink),
                    None => {
                        tracing::debug!(name = %name, "unresolved detached ruleset");
                        Ok(())
                    }
                };
            }
        }

        let candidates: Vec<Mixin<'a>> = self
            .resolve(&call.path)
            .into_iter()
            .filter(|m| m.accepts(call.args.len()))
            .collect();
        if candidates.is_empty() {
            tracing::debug!(mixin = %call.path.join(" > "), "unresolved mixin call skipped");
            return Ok(());
        }
        tracing::trace!(mixin = %call.path.join(" > "), matches = candidates.len(), "expanding mixin");

        for mixin in candidates {
            let params = self.bind(mixin, call);
            self.expand(mixin.rules(), params, call.important, ctx, sink)?;
        }
        Ok(())
    }

    /// Find the mixins a call path names; `#ns > .m` looks inside `#ns`.
    fn resolve(&self, path: &[String]) -> Vec<Mixin<'a>> {
        let Some((first, rest)) = path.split_first() else {
            return Vec::new();
        };
        let mut found = self.scope.mixins(first);
        for segment in rest {
            found = found
                .iter()
                .flat_map(|m| Frame::from_nodes(m.rules()).mixins(segment).to_vec())
                .collect();
        }
        found
    }

    /// Bind call arguments to the mixin's parameters.
    fn bind(&self, mixin: Mixin<'a>, call: &MixinCall) -> Frame<'a> {
        let mut frame = Frame::default();
        let Mixin::Definition(def) = mixin else {
            return frame;
        };

        let args: Vec<(Option<&str>, Value)> = call
            .args
            .iter()
            .map(|a| (a.name.as_deref(), eval(&eval::parse_text(&a.value), &self.scope)))
            .collect();
        let mut positional = args.iter().filter(|(name, _)| name.is_none()).map(|(_, v)| v);
        let mut all = Vec::new();

        for param in &def.params {
            match &param.name {
                Some(name) => {
                    let named = args
                        .iter()
                        .find(|(n, _)| *n == Some(name.as_str()))
                        .map(|(_, v)| v.clone());
                    let value = named.or_else(|| positional.next().cloned()).or_else(|| {
                        param
                            .default
                            .as_deref()
                            .map(|d| eval(&eval::parse_text(d), &self.scope))
                    });
                    if let Some(value) = value {
                        all.push(value.clone());
                        frame.set_variable(name.clone(), value);
                    }
                }
                // A literal pattern parameter consumes one argument.
                None => {
                    if let Some(value) = positional.next() {
                        all.push(value.clone());
                    }
                }
            }
        }
        if def.variadic {
            all.extend(positional.cloned());
        }
        frame.set_variable("@arguments", Value::Expression(all));
        frame
    }

    fn expand(
        &mut self,
        rules: &'a [Node],
        params: Frame<'a>,
        important: bool,
        ctx: &Context,
        sink: &mut Sink,
    ) -> Result<(), CompileError> {
        self.mixin_depth += 1;
        self.scope.push(params);
        let mut inner = Sink::default();
        let result = self.scoped_body(rules, ctx, &mut inner);
        self.scope.pop();
        self.mixin_depth -= 1;
        result?;

        for mut decl in inner.declarations {
            decl.important |= important;
            sink.push_declaration(decl, None);
        }
        sink.items.extend(inner.items);
        Ok(())
    }
}

impl Default for Compiler<'_> {
    fn default() -> Self {
        Self::new()
    }
}
