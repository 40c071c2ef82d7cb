// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Stylesheet nodes.
//!
//! Every node records the byte `index` where it starts and the `file` it was
//! parsed from, so positions stay meaningful after imports are inlined.

use crate::selector::Selector;
use crate::source::FileId;
use crate::value::Value;

/// A parsed file (or an imported one).
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    pub file: FileId,
    pub rules: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Rule(RuleSet),
    MixinDefinition(MixinDefinition),
    Declaration(Declaration),
    Variable(VariableDecl),
    DetachedRuleset(DetachedRuleset),
    MixinCall(MixinCall),
    Extend(Extend),
    Media(Media),
    Directive(Directive),
    Import(Import),
    Comment(Comment),
}

/// `selectors { rules }`
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub selectors: Vec<Selector>,
    pub rules: Vec<Node>,
    /// Raw `when ...` condition of a guarded ruleset.
    pub guard: Option<String>,
    pub index: usize,
    pub file: FileId,
}

/// `.name(params) when (guard) { rules }`
#[derive(Debug, Clone, PartialEq)]
pub struct MixinDefinition {
    /// `.name` or `#name`.
    pub name: String,
    pub params: Vec<MixinParam>,
    pub variadic: bool,
    pub guard: Option<String>,
    pub selectors: Vec<Selector>,
    pub rules: Vec<Node>,
    pub index: usize,
    pub file: FileId,
}

/// A mixin parameter: `@name`, `@name: default`, or a literal pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct MixinParam {
    pub name: Option<String>,
    pub default: Option<String>,
}

/// `name: value;`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub value: Value,
    pub important: bool,
    /// `+` or `+_` merge suffix.
    pub merge: Option<String>,
    pub index: usize,
    pub file: FileId,
}

/// `@name: value;`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    /// Name with the leading `@`.
    pub name: String,
    pub value: Value,
    pub index: usize,
    pub file: FileId,
}

/// `@name: { rules }`
#[derive(Debug, Clone, PartialEq)]
pub struct DetachedRuleset {
    pub name: String,
    pub rules: Vec<Node>,
    pub index: usize,
    pub file: FileId,
}

/// `.mixin(args);`, `#ns > .mixin();`, or a detached ruleset call `@name();`.
#[derive(Debug, Clone, PartialEq)]
pub struct MixinCall {
    /// Selector path: `[".mixin"]`, `["#ns", ".mixin"]`, `["@detached"]`.
    pub path: Vec<String>,
    pub args: Vec<MixinArg>,
    pub important: bool,
    pub index: usize,
    pub file: FileId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MixinArg {
    pub name: Option<String>,
    pub value: String,
}

/// `&:extend(target all);`
#[derive(Debug, Clone, PartialEq)]
pub struct Extend {
    pub target: String,
    pub all: bool,
    pub index: usize,
    pub file: FileId,
}

/// `@media query { ... }` and other conditional group rules.
///
/// The body is held by a single synthetic [`RuleSet`] whose only selector is
/// [`Selector::implicit`], standing for the enclosing selectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    /// `media`, `supports`, `document`.
    pub name: String,
    pub query: String,
    pub rules: Vec<Node>,
    pub index: usize,
    pub file: FileId,
}

impl Media {
    /// Nodes of the synthetic body rule.
    pub fn body(&self) -> &[Node] {
        match self.rules.first() {
            Some(Node::Rule(rule)) => &rule.rules,
            _ => &[],
        }
    }
}

/// Any other at-rule: `@keyframes`, `@font-face`, `@charset`, ...
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Name without the `@`.
    pub name: String,
    pub prelude: String,
    pub rules: Option<Vec<Node>>,
    pub index: usize,
    pub file: FileId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    pub reference: bool,
    pub inline: bool,
    pub less: bool,
    pub css: bool,
    pub once: bool,
    pub multiple: bool,
    pub optional: bool,
}

/// `@import (options) "path" media;`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    /// The path as written (quotes removed).
    pub path: String,
    /// Whether the path came from `url(...)`.
    pub is_url: bool,
    pub options: ImportOptions,
    pub media: Option<String>,
    /// The imported stylesheet, once resolved. `None` for CSS imports,
    /// repeated imports and missing optional ones.
    pub root: Option<Box<Stylesheet>>,
    pub index: usize,
    pub file: FileId,
}

impl Import {
    /// True when the import stays a plain CSS `@import`.
    pub fn is_css(&self) -> bool {
        if self.options.less {
            return false;
        }
        self.options.css
            || self.is_url && !self.path.ends_with(".less")
            || self.path.ends_with(".css")
            || self.path.starts_with("http://")
            || self.path.starts_with("https://")
            || self.path.starts_with("//")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub index: usize,
    pub file: FileId,
}

impl Node {
    pub fn index(&self) -> usize {
        match self {
            Node::Rule(n) => n.index,
            Node::MixinDefinition(n) => n.index,
            Node::Declaration(n) => n.index,
            Node::Variable(n) => n.index,
            Node::DetachedRuleset(n) => n.index,
            Node::MixinCall(n) => n.index,
            Node::Extend(n) => n.index,
            Node::Media(n) => n.index,
            Node::Directive(n) => n.index,
            Node::Import(n) => n.index,
            Node::Comment(n) => n.index,
        }
    }

    pub fn file(&self) -> FileId {
        match self {
            Node::Rule(n) => n.file,
            Node::MixinDefinition(n) => n.file,
            Node::Declaration(n) => n.file,
            Node::Variable(n) => n.file,
            Node::DetachedRuleset(n) => n.file,
            Node::MixinCall(n) => n.file,
            Node::Extend(n) => n.file,
            Node::Media(n) => n.file,
            Node::Directive(n) => n.file,
            Node::Import(n) => n.file,
            Node::Comment(n) => n.file,
        }
    }

    /// Selectors of rule-like nodes.
    pub fn selectors(&self) -> Option<&[Selector]> {
        match self {
            Node::Rule(n) => Some(&n.selectors),
            Node::MixinDefinition(n) => Some(&n.selectors),
            _ => None,
        }
    }

    /// Nested nodes, not counting an import's root.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Rule(n) => &n.rules,
            Node::MixinDefinition(n) => &n.rules,
            Node::DetachedRuleset(n) => &n.rules,
            Node::Media(n) => &n.rules,
            Node::Directive(n) => n.rules.as_deref().unwrap_or(&[]),
            _ => &[],
        }
    }

    pub fn import_root(&self) -> Option<&Stylesheet> {
        match self {
            Node::Import(n) => n.root.as_deref(),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Rule(_) => "rule",
            Node::MixinDefinition(_) => "mixin definition",
            Node::Declaration(_) => "declaration",
            Node::Variable(_) => "variable",
            Node::DetachedRuleset(_) => "detached ruleset",
            Node::MixinCall(_) => "mixin call",
            Node::Extend(_) => "extend",
            Node::Media(_) => "media",
            Node::Directive(_) => "directive",
            Node::Import(_) => "import",
            Node::Comment(_) => "comment",
        }
    }
}
