// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexical scopes: the variables, mixins and detached rulesets visible from a block.

use std::borrow::Cow;
use std::collections::HashMap;

use lesshint_ast::node::{MixinDefinition, Node, RuleSet};
use lesshint_ast::selector::ElementKind;
use lesshint_ast::Value;

/// Something a mixin call can expand.
#[derive(Debug, Clone, Copy)]
pub enum Mixin<'a> {
    Definition(&'a MixinDefinition),
    /// A plain ruleset with a single class or id selector.
    Rule(&'a RuleSet),
}

impl<'a> Mixin<'a> {
    pub fn rules(&self) -> &'a [Node] {
        match self {
            Mixin::Definition(def) => &def.rules,
            Mixin::Rule(rule) => &rule.rules,
        }
    }

    /// Whether a call with `args` arguments can bind to this mixin.
    pub fn accepts(&self, args: usize) -> bool {
        match self {
            Mixin::Definition(def) => {
                let required = def
                    .params
                    .iter()
                    .filter(|p| p.name.is_some() && p.default.is_none())
                    .count();
                args >= required && (def.variadic || args <= def.params.len())
            }
            Mixin::Rule(_) => args == 0,
        }
    }
}

/// One block's worth of definitions.
#[derive(Debug, Default)]
pub struct Frame<'a> {
    variables: HashMap<String, Cow<'a, Value>>,
    detached: HashMap<String, &'a [Node]>,
    mixins: HashMap<String, Vec<Mixin<'a>>>,
}

impl<'a> Frame<'a> {
    /// Collect the definitions made directly in `nodes`, including the top
    /// level of any imported stylesheet. Later definitions win.
    pub fn from_nodes(nodes: &'a [Node]) -> Self {
        let mut frame = Frame::default();
        frame.collect(nodes);
        frame
    }

    fn collect(&mut self, nodes: &'a [Node]) {
        for node in nodes {
            match node {
                Node::Variable(var) => {
                    self.variables.insert(var.name.clone(), Cow::Borrowed(&var.value));
                }
                Node::DetachedRuleset(detached) => {
                    self.detached.insert(detached.name.clone(), &detached.rules);
                }
                Node::MixinDefinition(def) => {
                    self.mixins.entry(def.name.clone()).or_default().push(Mixin::Definition(def));
                }
                Node::Rule(rule) => {
                    if let [selector] = rule.selectors.as_slice() {
                        if let [element] = selector.elements.as_slice() {
                            if matches!(element.kind(), ElementKind::Class | ElementKind::Id) {
                                self.mixins
                                    .entry(element.value.clone())
                                    .or_default()
                                    .push(Mixin::Rule(rule));
                            }
                        }
                    }
                }
                Node::Import(import) if !import.options.inline => {
                    if let Some(root) = &import.root {
                        self.collect(&root.rules);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), Cow::Owned(value));
    }

    pub fn mixins(&self, name: &str) -> &[Mixin<'a>] {
        self.mixins.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The stack of frames, innermost last.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> Scope<'a> {
    pub fn push(&mut self, frame: Frame<'a>) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|f| f.variables.get(name))
            .map(|v| v.as_ref())
    }

    pub fn detached(&self, name: &str) -> Option<&'a [Node]> {
        self.frames.iter().rev().find_map(|f| f.detached.get(name).copied())
    }

    /// Every mixin named `name` in the innermost frame that defines any.
    pub fn mixins(&self, name: &str) -> Vec<Mixin<'a>> {
        self.frames
            .iter()
            .rev()
            .find_map(|f| f.mixins.get(name))
            .cloned()
            .unwrap_or_default()
    }
}
