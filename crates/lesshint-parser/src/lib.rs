//! Parser for Less stylesheets.
//!
//! Transforms a token stream into a syntax tree and resolves `@import`s.

mod hints;
mod imports;
mod parser;
mod value;

pub use imports::{
    parse_file, parse_source, FsLoader, ImportLoader, MemoryLoader, ParseFailure, ParsedStylesheet,
};
pub use parser::{ParseError, ParseResult, Parser};
pub use value::parse_value;

#[cfg(test)]
mod tests {
    use super::*;
    use lesshint_ast::node::Node;
    use lesshint_ast::selector::{Combinator, ElementKind};
    use lesshint_ast::{FileId, Value};
    use std::path::Path;

    fn parse(src: &str) -> ParseResult {
        let lex_result = lesshint_lexer::Lexer::new(src).tokenize();
        assert!(lex_result.is_ok(), "Lex errors: {:?}", lex_result.errors);
        Parser::new(src, lex_result.tokens, FileId::PRIMARY).parse()
    }

    fn parse_ok(src: &str) -> Vec<Node> {
        let result = parse(src);
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        result.stylesheet.rules
    }

    #[test]
    fn parse_ruleset_with_declarations() {
        let rules = parse_ok("a { color: red; margin: 0 auto }");
        assert_eq!(rules.len(), 1);
        let Node::Rule(rule) = &rules[0] else { panic!("expected rule") };
        assert_eq!(rule.selectors[0].raw, "a");
        assert_eq!(rule.rules.len(), 2);

        let Node::Declaration(decl) = &rule.rules[1] else { panic!("expected declaration") };
        assert_eq!(decl.name, "margin");
        assert_eq!(decl.index, 16);
        assert_eq!(decl.value.to_string(), "0 auto");
    }

    #[test]
    fn parse_selectors_and_combinators() {
        let rules = parse_ok("div#main > .item:hover, ul li { }");
        let Node::Rule(rule) = &rules[0] else { panic!() };
        assert_eq!(rule.selectors.len(), 2);

        let first = &rule.selectors[0];
        assert_eq!(first.raw, "div#main > .item:hover");
        let kinds: Vec<_> = first.elements.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Tag, ElementKind::Id, ElementKind::Class, ElementKind::Pseudo]
        );
        assert_eq!(first.elements[2].combinator, Combinator::Child);
        assert_eq!(rule.selectors[1].elements[1].combinator, Combinator::Descendant);
    }

    #[test]
    fn comments_inside_a_compound_keep_it_whole() {
        let rules = parse_ok("div/* c */.x, ul /* c */ li { }");
        let Node::Rule(rule) = &rules[0] else { panic!() };
        assert_eq!(rule.selectors[0].raw, "div.x");
        assert_eq!(rule.selectors[0].elements[1].combinator, Combinator::None);
        assert_eq!(rule.selectors[1].raw, "ul li");
    }

    #[test]
    fn parse_nested_parent_references() {
        let rules = parse_ok(".a { &-b { } &:hover { } }");
        let Node::Rule(outer) = &rules[0] else { panic!() };
        let values: Vec<_> = outer
            .rules
            .iter()
            .filter_map(|n| n.selectors())
            .map(|s| s[0].raw.clone())
            .collect();
        assert_eq!(values, vec!["&-b", "&:hover"]);
    }

    #[test]
    fn parse_variables_and_detached_rulesets() {
        let rules = parse_ok("@brand: #ff0064;\n@block: { color: red; };\n");
        let Node::Variable(var) = &rules[0] else { panic!() };
        assert_eq!(var.name, "@brand");
        assert!(matches!(var.value, Value::Color { .. }));
        assert!(matches!(&rules[1], Node::DetachedRuleset(d) if d.name == "@block"));
    }

    #[test]
    fn parse_mixin_definition_and_calls() {
        let rules = parse_ok(
            ".border(@width: 1px; @color) when (@width > 0) { border: @width solid @color; }\n\
             .box { .border(2px; red); #ns > .helper; }",
        );
        let Node::MixinDefinition(mixin) = &rules[0] else { panic!("expected mixin") };
        assert_eq!(mixin.name, ".border");
        assert_eq!(mixin.params.len(), 2);
        assert_eq!(mixin.params[0].default.as_deref(), Some("1px"));
        assert_eq!(mixin.guard.as_deref(), Some("(@width > 0)"));

        let Node::Rule(rule) = &rules[1] else { panic!() };
        let Node::MixinCall(call) = &rule.rules[0] else { panic!() };
        assert_eq!(call.path, vec![".border"]);
        assert_eq!(call.args.len(), 2);
        let Node::MixinCall(ns) = &rule.rules[1] else { panic!() };
        assert_eq!(ns.path, vec!["#ns", ".helper"]);
    }

    #[test]
    fn parse_media_wraps_body_in_implicit_rule() {
        let rules = parse_ok("@media screen and (max-width: 600px) { a { color: red } }");
        let Node::Media(media) = &rules[0] else { panic!() };
        assert_eq!(media.query, "screen and (max-width: 600px)");
        let Node::Rule(wrapper) = &media.rules[0] else { panic!() };
        assert!(wrapper.selectors[0].is_implicit());
        assert_eq!(media.body().len(), 1);
    }

    #[test]
    fn parse_import_options() {
        let rules = parse_ok("@import (reference, optional) \"mixins\";\n@import url(print.css) print;");
        let Node::Import(first) = &rules[0] else { panic!() };
        assert!(first.options.reference && first.options.optional);
        assert_eq!(first.path, "mixins");
        let Node::Import(second) = &rules[1] else { panic!() };
        assert!(second.is_url && second.is_css());
        assert_eq!(second.media.as_deref(), Some("print"));
    }

    #[test]
    fn parse_directives_and_keyframes() {
        let rules = parse_ok("@charset \"utf-8\";\n@keyframes spin { from { top: 0 } 50% { top: 1px } }");
        assert!(matches!(&rules[0], Node::Directive(d) if d.rules.is_none()));
        let Node::Directive(frames) = &rules[1] else { panic!() };
        assert_eq!(frames.prelude, "spin");
        let body = frames.rules.as_ref().unwrap();
        let Node::Rule(step) = &body[1] else { panic!() };
        assert_eq!(step.selectors[0].elements[0].kind(), ElementKind::Percentage);
    }

    #[test]
    fn parse_important_and_merge() {
        let rules = parse_ok("a { color: red !important; box-shadow+: 1px 1px; }");
        let Node::Rule(rule) = &rules[0] else { panic!() };
        let Node::Declaration(color) = &rule.rules[0] else { panic!() };
        assert!(color.important);
        assert_eq!(color.value.to_string(), "red");
        let Node::Declaration(shadow) = &rule.rules[1] else { panic!() };
        assert_eq!(shadow.name, "box-shadow");
        assert_eq!(shadow.merge.as_deref(), Some("+"));
    }

    #[test]
    fn unparseable_values_fall_back_to_raw() {
        let rules = parse_ok("a { filter: progid:DXImageTransform.Microsoft.gradient(enabled=false); }");
        let Node::Rule(rule) = &rules[0] else { panic!() };
        let Node::Declaration(decl) = &rule.rules[0] else { panic!() };
        assert!(matches!(&decl.value, Value::Raw(text) if text.starts_with("progid:")));
    }

    #[test]
    fn parse_extend() {
        let rules = parse_ok(".a { &:extend(.b all); }");
        let Node::Rule(rule) = &rules[0] else { panic!() };
        assert!(matches!(&rule.rules[0], Node::Extend(e) if e.target == ".b" && e.all));
    }

    #[test]
    fn comments_are_kept() {
        let rules = parse_ok("/* header */\na { /* @Nolint */ color: red; }");
        assert!(matches!(&rules[0], Node::Comment(c) if c.text == "/* header */"));
        let Node::Rule(rule) = &rules[1] else { panic!() };
        assert!(matches!(&rule.rules[0], Node::Comment(_)));
    }

    #[test]
    fn missing_closing_brace_is_an_error() {
        let result = parse("a { color: red;");
        assert!(!result.is_ok());
        assert_eq!(result.errors[0].message, "Missing closing '}'");
    }

    #[test]
    fn stray_closing_brace_is_an_error() {
        let result = parse("a { } }");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].span.start, 6);
    }

    #[test]
    fn missing_colon_reports_position() {
        let result = parse("a {\n  color red;\n}");
        assert_eq!(result.errors[0].span.start, 15);
        assert!(result.errors[0].hint.is_some());
    }

    #[test]
    fn resolves_imports_relative_to_importer() {
        let mut loader = MemoryLoader::new();
        loader.insert("styles/vars.less", "@import \"shared/colors\";\n@x: 1px;");
        loader.insert("styles/shared/colors.less", "@red: #f00;");

        let parsed = parse_file(
            Path::new("styles/main.less"),
            "@import \"vars\";\n@import \"vars.less\";\na { color: @red; }",
            &loader,
        )
        .unwrap();

        assert_eq!(parsed.sources.len(), 3);
        let Node::Import(first) = &parsed.root.rules[0] else { panic!() };
        let vars = first.root.as_ref().expect("vars resolved");
        let Node::Import(nested) = &vars.rules[0] else { panic!() };
        assert!(nested.root.is_some());

        let Node::Import(second) = &parsed.root.rules[1] else { panic!() };
        assert!(second.root.is_none(), "imported once by default");
    }

    #[test]
    fn missing_import_is_fatal_unless_optional() {
        let loader = MemoryLoader::new();
        let failure = parse_file(Path::new("a.less"), "\n@import \"nope\";", &loader).unwrap_err();
        assert_eq!(failure.error.message, "'nope' wasn't found");
        assert_eq!(failure.error.span.start, 1);
        assert!(failure.error.file.is_primary());
        assert_eq!((failure.location().line, failure.location().column), (2, 1));

        let ok = parse_file(Path::new("a.less"), "@import (optional) \"nope\";", &loader);
        assert!(ok.is_ok());
    }

    #[test]
    fn unreadable_import_reports_the_io_error() {
        struct Locked;
        impl ImportLoader for Locked {
            fn load(&self, _path: &Path) -> std::io::Result<String> {
                Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"))
            }
        }

        let failure = parse_file(Path::new("a.less"), "@import \"secret\";", &Locked).unwrap_err();
        assert_eq!(failure.error.message, "'secret' could not be read: permission denied");
    }

    #[test]
    fn css_imports_are_not_followed() {
        let loader = MemoryLoader::new();
        let parsed = parse_file(
            Path::new("a.less"),
            "@import \"reset.css\";\n@import (css) \"x\";",
            &loader,
        )
        .unwrap();
        assert_eq!(parsed.sources.len(), 1);
    }

    #[test]
    fn errors_in_imported_files_carry_their_file() {
        let mut loader = MemoryLoader::new();
        loader.insert("broken.less", "a { color: red;");
        let failure = parse_file(Path::new("main.less"), "@import \"broken\";", &loader).unwrap_err();
        assert_eq!(failure.error.file, FileId(1));
        assert_eq!(failure.path(), Some(Path::new("broken.less")));
        assert_eq!(failure.location().line, 1);
    }

    #[test]
    fn loads_imports_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("base.less"), "@gray: #eee;").unwrap();
        let main = dir.path().join("main.less");
        let parsed = parse_file(&main, "@import 'base';", &FsLoader).unwrap();
        assert_eq!(parsed.sources.len(), 2);
    }
}
