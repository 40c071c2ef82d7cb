//! Lint code registry.
//!
//! Maps codes (E0, E01, ...) to titles, categories and explanations.
//! Used by `khan-lesshint explain <code>` and the pretty reporter.

use std::collections::BTreeMap;

/// Registry of all known lint codes.
pub struct CodeRegistry {
    codes: BTreeMap<&'static str, CodeInfo>,
}

/// Information about a single code.
pub struct CodeInfo {
    pub code: &'static str,
    /// Short rule id, usable in `--rule`/`--exclude`.
    pub id: &'static str,
    pub title: &'static str,
    pub category: CodeCategory,
    pub explanation: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCategory {
    Syntax,
    Style,
    Specificity,
    Theming,
}

impl std::fmt::Display for CodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeCategory::Syntax => write!(f, "Syntax"),
            CodeCategory::Style => write!(f, "Style"),
            CodeCategory::Specificity => write!(f, "Specificity"),
            CodeCategory::Theming => write!(f, "Theming"),
        }
    }
}

macro_rules! register_codes {
    ($($code:literal => ($id:literal, $title:literal, $cat:expr, $explanation:expr)),* $(,)?) => {{
        let mut map = BTreeMap::new();
        $(
            map.insert($code, CodeInfo {
                code: $code,
                id: $id,
                title: $title,
                category: $cat,
                explanation: $explanation,
            });
        )*
        map
    }};
}

impl Default for CodeRegistry {
    fn default() -> Self {
        use CodeCategory::*;

        Self {
            codes: register_codes! {
                "E0" => ("parse", "stylesheet could not be parsed or compiled", Syntax,
                    "The file is not valid Less, an @import could not be found, or the \
                     compiled output references an undefined variable. No other checks \
                     run on a file that fails to parse."),
                "E01" => ("abc", "properties out of alphabetical order", Style,
                    "Declarations within one ruleset must appear in alphabetical order \
                     by property name. Nested rulesets are checked on their own; \
                     variables and mixin calls are ignored."),
                "E02" => ("nesting", "ruleset nested too deeply", Style,
                    "Rulesets may be nested at most 4 levels deep. Deep nesting \
                     produces long, overly specific selectors. An @media block and its \
                     body count as levels, but the body itself is never reported."),
                "E03" => ("overqualified", "overqualified selector", Specificity,
                    "A compound selector combines an element name with an id or class, \
                     as in `div#main` or `a.button`. Drop the element name."),
                "E04" => ("color", "inline color instead of a color variable", Theming,
                    "Colors should come from shared color variables. When a declared \
                     variable has a close enough color, the message names it."),
            },
        }
    }
}

impl CodeRegistry {
    pub fn get(&self, code: &str) -> Option<&CodeInfo> {
        self.codes.get(code)
    }

    /// Look up by rule id as well as by code.
    pub fn find(&self, code_or_id: &str) -> Option<&CodeInfo> {
        self.get(code_or_id)
            .or_else(|| self.codes.values().find(|info| info.id == code_or_id))
    }

    pub fn all(&self) -> impl Iterator<Item = &CodeInfo> {
        self.codes.values()
    }
}
