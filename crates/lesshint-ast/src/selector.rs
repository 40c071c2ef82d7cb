// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Selectors and their elements.

/// How an element attaches to the element before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Same compound selector (`div.a`), or the first element.
    None,
    /// Whitespace.
    Descendant,
    /// `>`
    Child,
    /// `+`
    Adjacent,
    /// `~`
    Sibling,
}

impl Combinator {
    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::None => "",
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
            Combinator::Adjacent => " + ",
            Combinator::Sibling => " ~ ",
        }
    }
}

/// What an element selects, derived from its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Tag,
    Universal,
    Id,
    Class,
    Attribute,
    Pseudo,
    /// `&`, possibly with a suffix (`&-item`).
    Parent,
    /// Keyframe steps (`50%`).
    Percentage,
    /// Contains `@{...}`; unknown until compiled.
    Interpolated,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub combinator: Combinator,
    pub value: String,
    /// Byte offset of the element text.
    pub index: usize,
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        let v = self.value.as_str();
        let Some(first) = v.chars().next() else {
            return ElementKind::Other;
        };
        match first {
            '&' => ElementKind::Parent,
            '*' => ElementKind::Universal,
            '#' => ElementKind::Id,
            '.' => ElementKind::Class,
            '[' => ElementKind::Attribute,
            ':' => ElementKind::Pseudo,
            _ if v.contains("@{") => ElementKind::Interpolated,
            c if c.is_ascii_digit() && v.ends_with('%') => ElementKind::Percentage,
            c if c.is_alphabetic() || c == '-' || c == '_' || !c.is_ascii() => ElementKind::Tag,
            _ => ElementKind::Other,
        }
    }
}

/// One complex selector of a selector list.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub elements: Vec<Element>,
    /// Source text, whitespace-normalised.
    pub raw: String,
    pub index: usize,
}

impl Selector {
    /// A selector with no elements; stands for the enclosing selectors.
    pub fn implicit(index: usize) -> Self {
        Self {
            elements: Vec::new(),
            raw: String::new(),
            index,
        }
    }

    pub fn is_implicit(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn has_parent_ref(&self) -> bool {
        self.elements.iter().any(|e| e.value.contains('&'))
    }

    /// Split into compound selectors at every combinator.
    pub fn compounds(&self) -> Vec<&[Element]> {
        let mut parts = Vec::new();
        let mut start = 0;
        for (i, el) in self.elements.iter().enumerate() {
            if i > start && el.combinator != Combinator::None {
                parts.push(&self.elements[start..i]);
                start = i;
            }
        }
        if start < self.elements.len() {
            parts.push(&self.elements[start..]);
        }
        parts
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Render a compound selector's elements back to text.
pub fn compound_text(elements: &[Element]) -> String {
    elements.iter().map(|e| e.value.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(combinator: Combinator, value: &str) -> Element {
        Element {
            combinator,
            value: value.to_string(),
            index: 0,
        }
    }

    #[test]
    fn classifies_elements() {
        assert_eq!(el(Combinator::None, "div").kind(), ElementKind::Tag);
        assert_eq!(el(Combinator::None, "#main").kind(), ElementKind::Id);
        assert_eq!(el(Combinator::None, ".a").kind(), ElementKind::Class);
        assert_eq!(el(Combinator::None, "*").kind(), ElementKind::Universal);
        assert_eq!(el(Combinator::None, "&-x").kind(), ElementKind::Parent);
        assert_eq!(el(Combinator::None, "50%").kind(), ElementKind::Percentage);
        assert_eq!(el(Combinator::None, "::before").kind(), ElementKind::Pseudo);
        assert_eq!(el(Combinator::None, "[type=text]").kind(), ElementKind::Attribute);
        assert_eq!(el(Combinator::None, "h@{n}").kind(), ElementKind::Interpolated);
    }

    #[test]
    fn splits_compounds_at_combinators() {
        let sel = Selector {
            elements: vec![
                el(Combinator::None, "ul"),
                el(Combinator::None, ".nav"),
                el(Combinator::Child, "li"),
                el(Combinator::Descendant, "a"),
                el(Combinator::None, ":hover"),
            ],
            raw: "ul.nav > li a:hover".to_string(),
            index: 0,
        };
        let parts: Vec<String> = sel.compounds().into_iter().map(compound_text).collect();
        assert_eq!(parts, vec!["ul.nav", "li", "a:hover"]);
    }
}
