// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation: recursive descent over significant tokens.
//!
//! Statements are classified by scanning ahead to the first `{`, `;` or `}`
//! outside parentheses: a `{` means a ruleset (or mixin definition), anything
//! else a declaration, mixin call, or extend.

use lesshint_ast::node::{
    Comment, Declaration, DetachedRuleset, Directive, Extend, Import, ImportOptions, Media,
    MixinArg, MixinCall, MixinDefinition, MixinParam, Node, RuleSet, Stylesheet, VariableDecl,
};
use lesshint_ast::selector::{Combinator, Element, Selector};
use lesshint_ast::token::{Token, TokenKind};
use lesshint_ast::value::Value;
use lesshint_ast::{FileId, Span};
use lesshint_lexer::LexError;
use thiserror::Error;

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// At-rules that wrap a block applying to the enclosing selectors.
const CONDITIONAL_AT_RULES: &[&str] = &["media", "supports", "document", "-moz-document"];

/// At-rule names that are never variables even when followed by `:`.
const KNOWN_AT_RULES: &[&str] = &[
    "import", "media", "supports", "document", "-moz-document", "charset", "namespace",
    "keyframes", "-webkit-keyframes", "-moz-keyframes", "-o-keyframes", "-ms-keyframes",
    "font-face", "page", "viewport", "-ms-viewport", "counter-style", "font-feature-values",
    "plugin", "layer", "container", "property",
];

/// The parser for Less source text.
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    file: FileId,
    /// Collected errors during parsing
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, mut tokens: Vec<Token>, file: FileId) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            tokens.push(Token {
                kind: TokenKind::Eof,
                span: Span::new(source.len(), source.len()),
            });
        }
        Self { source, tokens, pos: 0, file, errors: Vec::new() }
    }

    /// Record error, return if should continue.
    fn record_error(&mut self, error: ParseError) -> bool {
        self.errors.push(error);
        self.errors.len() < MAX_ERRORS
    }

    /// Skip past the statement or block that failed.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while !self.at_end() {
            match self.current_kind() {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace if depth == 0 => return,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                TokenKind::Semi if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn kind_at(&self, index: usize) -> &TokenKind {
        self.tokens.get(index).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected(kind.display_name()))
        }
    }

    fn skip_trivia(&mut self) {
        while self.current_kind().is_trivia() {
            self.advance();
        }
    }

    /// Index of the first significant token at or after `from`.
    fn significant_from(&self, from: usize) -> usize {
        let mut i = from;
        while self.kind_at(i).is_trivia() {
            i += 1;
        }
        i
    }

    /// End offset of the previously consumed token.
    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span.end)
            .unwrap_or(0)
    }

    fn text(&self, start: usize, end: usize) -> &'a str {
        self.source.get(start..end.max(start)).unwrap_or("")
    }

    fn expected(&self, what: &str) -> ParseError {
        ParseError::expected(what, self.current_kind(), self.current().span, self.file)
    }

    /// Index of the first `{`, `;` or `}` outside parentheses and brackets.
    fn scan_statement_end(&self, from: usize) -> usize {
        let mut depth = 0usize;
        let mut i = from;
        loop {
            match self.kind_at(i) {
                TokenKind::Eof => return i.min(self.tokens.len() - 1),
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::LBrace | TokenKind::Semi | TokenKind::RBrace if depth == 0 => return i,
                _ => {}
            }
            i += 1;
        }
    }

    /// Index of the token closing the `(` or `[` at `open`.
    fn matching_close(&self, open: usize) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        let mut i = open;
        loop {
            match self.kind_at(i) {
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                TokenKind::Eof => {
                    let close = match self.kind_at(open) {
                        TokenKind::LBracket => "']'",
                        _ => "')'",
                    };
                    return Err(ParseError::expected(
                        close,
                        &TokenKind::Eof,
                        self.tokens[open].span,
                        self.file,
                    ));
                }
                _ => {}
            }
            i += 1;
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Parse a whole stylesheet.
    pub fn parse(&mut self) -> ParseResult {
        let rules = self.parse_nodes(true);
        ParseResult {
            stylesheet: Stylesheet { file: self.file, rules },
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn parse_nodes(&mut self, top_level: bool) -> Vec<Node> {
        let mut nodes = Vec::new();
        loop {
            while matches!(self.current_kind(), TokenKind::Whitespace) {
                self.advance();
            }
            match self.current_kind().clone() {
                TokenKind::Eof => break,
                TokenKind::RBrace if !top_level => break,
                TokenKind::RBrace => {
                    let err = ParseError::new(self.file, self.current().span, "Unexpected '}'");
                    if !self.record_error(err) {
                        break;
                    }
                    self.advance();
                }
                TokenKind::Semi => self.advance(),
                TokenKind::Comment(text) => {
                    nodes.push(Node::Comment(Comment {
                        text,
                        index: self.current().span.start,
                        file: self.file,
                    }));
                    self.advance();
                }
                _ => match self.parse_statement() {
                    Ok(node) => nodes.push(node),
                    Err(e) => {
                        if !self.record_error(e) {
                            self.pos = self.tokens.len() - 1;
                            break;
                        }
                        self.synchronize();
                    }
                },
            }
        }
        nodes
    }

    fn parse_block(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let nodes = self.parse_nodes(false);
        if !self.check(&TokenKind::RBrace) {
            return Err(self.expected("'}'"));
        }
        self.advance();
        Ok(nodes)
    }

    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.current().span.start;
        match self.current_kind().clone() {
            TokenKind::AtKeyword(name) => self.parse_at_rule(name, start),
            _ => self.parse_rule_or_declaration(start),
        }
    }

    fn parse_at_rule(&mut self, name: String, start: usize) -> Result<Node, ParseError> {
        let lower = name.to_ascii_lowercase();
        if lower == "import" {
            return self.parse_import(start);
        }
        if CONDITIONAL_AT_RULES.contains(&lower.as_str()) {
            return self.parse_media(lower, start);
        }
        if !KNOWN_AT_RULES.contains(&lower.as_str()) {
            let next = self.significant_from(self.pos + 1);
            if matches!(self.kind_at(next), TokenKind::Colon) {
                return self.parse_variable(name, start);
            }
            if matches!(self.kind_at(self.pos + 1), TokenKind::LParen) {
                return self.parse_detached_call(name, start);
            }
        }
        self.parse_directive(name, start)
    }

    fn parse_variable(&mut self, name: String, start: usize) -> Result<Node, ParseError> {
        self.advance();
        self.skip_trivia();
        self.expect(&TokenKind::Colon)?;
        self.skip_trivia();
        let name = format!("@{}", name);

        if self.check(&TokenKind::LBrace) {
            let rules = self.parse_block()?;
            return Ok(Node::DetachedRuleset(DetachedRuleset {
                name,
                rules,
                index: start,
                file: self.file,
            }));
        }

        let (value, _important) = self.parse_value_to_end(false)?;
        Ok(Node::Variable(VariableDecl { name, value, index: start, file: self.file }))
    }

    /// `@detached();`
    fn parse_detached_call(&mut self, name: String, start: usize) -> Result<Node, ParseError> {
        self.advance();
        let close = self.matching_close(self.pos)?;
        self.pos = close + 1;
        self.expect_statement_end()?;
        Ok(Node::MixinCall(MixinCall {
            path: vec![format!("@{}", name)],
            args: Vec::new(),
            important: false,
            index: start,
            file: self.file,
        }))
    }

    fn parse_media(&mut self, name: String, start: usize) -> Result<Node, ParseError> {
        self.advance();
        let query_start = self.current().span.start;
        let end = self.scan_statement_end(self.pos);
        if !matches!(self.kind_at(end), TokenKind::LBrace) {
            self.pos = end;
            return Err(self.expected("'{'"));
        }
        let query = normalize_space(self.text(query_start, self.tokens[end].span.start));
        self.pos = end;
        let body = self.parse_block()?;

        let wrapper = RuleSet {
            selectors: vec![Selector::implicit(start)],
            rules: body,
            guard: None,
            index: start,
            file: self.file,
        };
        Ok(Node::Media(Media {
            name,
            query,
            rules: vec![Node::Rule(wrapper)],
            index: start,
            file: self.file,
        }))
    }

    fn parse_directive(&mut self, name: String, start: usize) -> Result<Node, ParseError> {
        self.advance();
        let prelude_start = self.current().span.start;
        let end = self.scan_statement_end(self.pos);
        let prelude = normalize_space(self.text(prelude_start, self.tokens[end].span.start));
        self.pos = end;

        let rules = if self.check(&TokenKind::LBrace) {
            Some(self.parse_block()?)
        } else {
            self.expect_statement_end()?;
            None
        };
        Ok(Node::Directive(Directive { name, prelude, rules, index: start, file: self.file }))
    }

    fn parse_import(&mut self, start: usize) -> Result<Node, ParseError> {
        self.advance();
        self.skip_trivia();

        let mut options = ImportOptions::default();
        if self.check(&TokenKind::LParen) {
            self.advance();
            loop {
                self.skip_trivia();
                match self.current_kind().clone() {
                    TokenKind::RParen => {
                        self.advance();
                        break;
                    }
                    TokenKind::Comma => self.advance(),
                    TokenKind::Ident(option) => {
                        match option.as_str() {
                            "reference" => options.reference = true,
                            "inline" => options.inline = true,
                            "less" => options.less = true,
                            "css" => options.css = true,
                            "once" => options.once = true,
                            "multiple" => options.multiple = true,
                            "optional" => options.optional = true,
                            _ => return Err(self.expected("import option")),
                        }
                        self.advance();
                    }
                    _ => return Err(self.expected("import option")),
                }
            }
            self.skip_trivia();
        }

        let (path, is_url) = match self.current_kind().clone() {
            TokenKind::String { value, .. } => {
                self.advance();
                (value, false)
            }
            TokenKind::Url(inner) => {
                self.advance();
                (inner, true)
            }
            TokenKind::Ident(word) if word.eq_ignore_ascii_case("url") => {
                self.advance();
                self.expect(&TokenKind::LParen)?;
                self.skip_trivia();
                let value = match self.current_kind().clone() {
                    TokenKind::String { value, .. } => value,
                    _ => return Err(self.expected("import path")),
                };
                self.advance();
                self.skip_trivia();
                self.expect(&TokenKind::RParen)?;
                (value, true)
            }
            _ => return Err(self.expected("import path")),
        };

        let media_start = self.current().span.start;
        let end = self.scan_statement_end(self.pos);
        let media = normalize_space(self.text(media_start, self.tokens[end].span.start));
        self.pos = end;
        self.expect_statement_end()?;

        Ok(Node::Import(Import {
            path,
            is_url,
            options,
            media: (!media.is_empty()).then_some(media),
            root: None,
            index: start,
            file: self.file,
        }))
    }

    fn parse_rule_or_declaration(&mut self, start: usize) -> Result<Node, ParseError> {
        let end = self.scan_statement_end(self.pos);
        if matches!(self.kind_at(end), TokenKind::LBrace) {
            if self.at_mixin_definition() {
                self.parse_mixin_definition(start)
            } else {
                self.parse_ruleset(start)
            }
        } else if self.at_extend() {
            self.parse_extend(start)
        } else if matches!(self.current_kind(), TokenKind::Dot | TokenKind::Hash(_)) {
            self.parse_mixin_call(start)
        } else {
            self.parse_declaration(start)
        }
    }

    /// `;` ends a statement; a following `}` or end of input does too.
    fn expect_statement_end(&mut self) -> Result<(), ParseError> {
        self.skip_trivia();
        match self.current_kind() {
            TokenKind::Semi => {
                self.advance();
                Ok(())
            }
            TokenKind::RBrace | TokenKind::Eof => Ok(()),
            _ => Err(self.expected("';'")),
        }
    }

    // =========================================================================
    // Rulesets and selectors
    // =========================================================================

    fn parse_ruleset(&mut self, start: usize) -> Result<Node, ParseError> {
        let selectors = self.parse_selector_list()?;
        let guard = self.parse_guard();
        let rules = self.parse_block()?;
        Ok(Node::Rule(RuleSet { selectors, rules, guard, index: start, file: self.file }))
    }

    /// Raw `when ...` text up to the block.
    fn parse_guard(&mut self) -> Option<String> {
        self.skip_trivia();
        match self.current_kind() {
            TokenKind::Ident(word) if word == "when" => {}
            _ => return None,
        }
        self.advance();
        let guard_start = self.current().span.start;
        let end = self.scan_statement_end(self.pos);
        let guard = normalize_space(self.text(guard_start, self.tokens[end].span.start));
        self.pos = end;
        Some(guard)
    }

    fn parse_selector_list(&mut self) -> Result<Vec<Selector>, ParseError> {
        let mut selectors = vec![self.parse_selector()?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            selectors.push(self.parse_selector()?);
        }
        Ok(selectors)
    }

    fn parse_selector(&mut self) -> Result<Selector, ParseError> {
        self.skip_trivia();
        let index = self.current().span.start;
        let mut elements: Vec<Element> = Vec::new();
        let mut pending: Option<Combinator> = None;
        let mut spaced = false;

        loop {
            match self.current_kind() {
                TokenKind::Whitespace => {
                    spaced = true;
                    self.advance();
                }
                TokenKind::Comment(_) => self.advance(),
                TokenKind::Gt => {
                    pending = Some(Combinator::Child);
                    self.advance();
                }
                TokenKind::Plus => {
                    pending = Some(Combinator::Adjacent);
                    self.advance();
                }
                TokenKind::Tilde => {
                    pending = Some(Combinator::Sibling);
                    self.advance();
                }
                TokenKind::LBrace | TokenKind::Comma | TokenKind::Eof => break,
                TokenKind::Ident(word) if word == "when" && spaced && !elements.is_empty() => break,
                TokenKind::Semi | TokenKind::RBrace => return Err(self.expected("'{'")),
                _ => {
                    let combinator = match pending.take() {
                        Some(c) => c,
                        None if spaced && !elements.is_empty() => Combinator::Descendant,
                        None => Combinator::None,
                    };
                    spaced = false;
                    elements.push(self.parse_element(combinator)?);
                }
            }
        }

        if elements.is_empty() {
            return Err(self.expected("selector"));
        }
        let raw = render_selector(&elements);
        Ok(Selector { elements, raw, index })
    }

    fn parse_element(&mut self, combinator: Combinator) -> Result<Element, ParseError> {
        let start = self.current().span.start;
        match self.current_kind() {
            TokenKind::Dot => {
                self.advance();
                if !matches!(
                    self.current_kind(),
                    TokenKind::Ident(_) | TokenKind::Interpolation(_) | TokenKind::Minus
                ) {
                    return Err(self.expected("selector"));
                }
                self.advance();
                self.glue_name_parts();
            }
            TokenKind::Hash(_)
            | TokenKind::Ident(_)
            | TokenKind::Interpolation(_)
            | TokenKind::Amp => {
                self.advance();
                self.glue_name_parts();
            }
            TokenKind::Colon => {
                self.advance();
                if self.check(&TokenKind::Colon) {
                    self.advance();
                }
                if !matches!(self.current_kind(), TokenKind::Ident(_) | TokenKind::Interpolation(_)) {
                    return Err(self.expected("selector"));
                }
                self.advance();
                self.glue_name_parts();
                if self.check(&TokenKind::LParen) {
                    self.pos = self.matching_close(self.pos)? + 1;
                }
            }
            TokenKind::LBracket => {
                self.pos = self.matching_close(self.pos)? + 1;
            }
            TokenKind::Star | TokenKind::Number { .. } | TokenKind::Percent => self.advance(),
            TokenKind::Backslash => {
                self.advance();
                self.advance();
            }
            _ => return Err(self.expected("selector")),
        }
        let value = self.text(start, self.prev_end()).to_string();
        Ok(Element { combinator, value, index: start })
    }

    /// Consume name pieces written without spaces: `col-@{n}`, `&-item`.
    fn glue_name_parts(&mut self) {
        while matches!(
            self.current_kind(),
            TokenKind::Ident(_) | TokenKind::Interpolation(_) | TokenKind::Minus | TokenKind::Number { .. }
        ) {
            self.advance();
        }
    }

    // =========================================================================
    // Mixins
    // =========================================================================

    /// `.name(` or `#name(` with no space before the parenthesis.
    fn at_mixin_definition(&self) -> bool {
        match self.current_kind() {
            TokenKind::Dot => {
                matches!(self.kind_at(self.pos + 1), TokenKind::Ident(_))
                    && matches!(self.kind_at(self.pos + 2), TokenKind::LParen)
            }
            TokenKind::Hash(_) => matches!(self.kind_at(self.pos + 1), TokenKind::LParen),
            _ => false,
        }
    }

    fn parse_mixin_definition(&mut self, start: usize) -> Result<Node, ParseError> {
        if self.check(&TokenKind::Dot) {
            self.advance();
        }
        self.advance();
        let name = self.text(start, self.prev_end()).to_string();

        let close = self.matching_close(self.pos)?;
        let raw_params = self.text(self.current().span.end, self.tokens[close].span.start);
        let (params, variadic) = parse_params(raw_params);
        self.pos = close + 1;

        let guard = self.parse_guard();
        self.skip_trivia();
        let rules = self.parse_block()?;

        let selector = Selector {
            elements: vec![Element {
                combinator: Combinator::None,
                value: name.clone(),
                index: start,
            }],
            raw: name.clone(),
            index: start,
        };
        Ok(Node::MixinDefinition(MixinDefinition {
            name,
            params,
            variadic,
            guard,
            selectors: vec![selector],
            rules,
            index: start,
            file: self.file,
        }))
    }

    fn parse_mixin_call(&mut self, start: usize) -> Result<Node, ParseError> {
        let mut path = Vec::new();
        loop {
            let seg_start = self.current().span.start;
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    if !matches!(self.current_kind(), TokenKind::Ident(_)) {
                        return Err(self.expected("mixin name"));
                    }
                    self.advance();
                }
                TokenKind::Hash(_) => self.advance(),
                _ => break,
            }
            path.push(self.text(seg_start, self.prev_end()).to_string());

            let next = self.significant_from(self.pos);
            match self.kind_at(next) {
                TokenKind::Gt => self.pos = self.significant_from(next + 1),
                TokenKind::Dot | TokenKind::Hash(_) => self.pos = next,
                _ => break,
            }
        }
        if path.is_empty() {
            return Err(self.expected("mixin name"));
        }

        self.skip_trivia();
        let mut args = Vec::new();
        if self.check(&TokenKind::LParen) {
            let close = self.matching_close(self.pos)?;
            let raw = self.text(self.current().span.end, self.tokens[close].span.start);
            args = parse_args(raw);
            self.pos = close + 1;
        }

        let important = self.parse_important();
        self.expect_statement_end()?;
        Ok(Node::MixinCall(MixinCall { path, args, important, index: start, file: self.file }))
    }

    fn parse_important(&mut self) -> bool {
        let bang = self.significant_from(self.pos);
        if !matches!(self.kind_at(bang), TokenKind::Bang) {
            return false;
        }
        let word = self.significant_from(bang + 1);
        match self.kind_at(word) {
            TokenKind::Ident(w) if w.eq_ignore_ascii_case("important") => {
                self.pos = word + 1;
                true
            }
            _ => false,
        }
    }

    /// `&:extend(...)`
    fn at_extend(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Amp)
            && matches!(self.kind_at(self.pos + 1), TokenKind::Colon)
            && matches!(self.kind_at(self.pos + 2), TokenKind::Ident(w) if w == "extend")
            && matches!(self.kind_at(self.pos + 3), TokenKind::LParen)
    }

    fn parse_extend(&mut self, start: usize) -> Result<Node, ParseError> {
        self.pos += 3;
        let close = self.matching_close(self.pos)?;
        let inner = normalize_space(self.text(self.current().span.end, self.tokens[close].span.start));
        self.pos = close + 1;
        self.expect_statement_end()?;

        let (target, all) = match inner.strip_suffix(" all") {
            Some(target) => (target.to_string(), true),
            None => (inner, false),
        };
        Ok(Node::Extend(Extend { target, all, index: start, file: self.file }))
    }

    // =========================================================================
    // Declarations and values
    // =========================================================================

    fn parse_declaration(&mut self, start: usize) -> Result<Node, ParseError> {
        loop {
            match self.current_kind() {
                TokenKind::Colon => break,
                TokenKind::Semi | TokenKind::RBrace | TokenKind::LBrace | TokenKind::Eof => {
                    return Err(self.expected("':'"));
                }
                _ => self.advance(),
            }
        }
        let mut name = self.text(start, self.current().span.start).trim();
        let mut merge = None;
        for suffix in ["+_", "+"] {
            if let Some(stripped) = name.strip_suffix(suffix) {
                merge = Some(suffix.to_string());
                name = stripped.trim_end();
                break;
            }
        }
        if name.is_empty() {
            return Err(self.expected("property name"));
        }
        let name = name.to_string();
        self.advance();
        self.skip_trivia();

        let raw_only = name.starts_with("--");
        let (value, important) = self.parse_value_to_end(raw_only)?;
        Ok(Node::Declaration(Declaration {
            name,
            value,
            important,
            merge,
            index: start,
            file: self.file,
        }))
    }

    /// Parse a value up to the end of the statement, consuming a `;`.
    fn parse_value_to_end(&mut self, raw_only: bool) -> Result<(Value, bool), ParseError> {
        let end = self.scan_statement_end(self.pos);
        if matches!(self.kind_at(end), TokenKind::LBrace) {
            self.pos = end;
            return Err(self.expected("';'"));
        }

        let mut value_end = end;
        let mut important = false;
        let last = self.last_significant_before(end);
        if let Some(last) = last {
            if matches!(self.kind_at(last), TokenKind::Ident(w) if w.eq_ignore_ascii_case("important")) {
                if let Some(bang) = self.last_significant_before(last) {
                    if bang >= self.pos && matches!(self.kind_at(bang), TokenKind::Bang) {
                        important = true;
                        value_end = bang;
                    }
                }
            }
        }

        let text = self
            .text(self.current().span.start, self.tokens[value_end].span.start)
            .trim();
        let value = if raw_only {
            Value::Raw(text.to_string())
        } else {
            crate::value::parse_value(&self.tokens[self.pos..value_end])
                .unwrap_or_else(|| Value::Raw(normalize_space(text)))
        };

        self.pos = end;
        if self.check(&TokenKind::Semi) {
            self.advance();
        }
        Ok((value, important))
    }

    fn last_significant_before(&self, end: usize) -> Option<usize> {
        (self.pos..end).rev().find(|&i| !self.kind_at(i).is_trivia())
    }
}

/// Collapse runs of whitespace to single spaces and trim.
pub(crate) fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn render_selector(elements: &[Element]) -> String {
    let mut raw = String::new();
    for (i, el) in elements.iter().enumerate() {
        match el.combinator {
            Combinator::None => {}
            Combinator::Descendant => raw.push(' '),
            other if i == 0 => {
                raw.push_str(other.as_str().trim_start());
            }
            other => raw.push_str(other.as_str()),
        }
        raw.push_str(&el.value);
    }
    raw
}

/// Split mixin arguments or parameters: on `;` when any is present at the top
/// level, otherwise on `,`.
pub(crate) fn split_arguments(raw: &str) -> Vec<&str> {
    let top_level = |sep: char| {
        let mut parts = Vec::new();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut last = 0;
        let mut found = false;
        for (i, c) in raw.char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '(' | '[' | '{') => depth += 1,
                (None, ')' | ']' | '}') => depth = depth.saturating_sub(1),
                (None, c) if c == sep && depth == 0 => {
                    parts.push(&raw[last..i]);
                    last = i + 1;
                    found = true;
                }
                _ => {}
            }
        }
        parts.push(&raw[last..]);
        (parts, found)
    };

    let (parts, found) = top_level(';');
    let parts = if found { parts } else { top_level(',').0 };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Split `@name: value` into its name and value.
fn named(part: &str) -> Option<(&str, &str)> {
    if !part.starts_with('@') {
        return None;
    }
    let colon = part.find(':')?;
    let name = part[..colon].trim();
    if name.contains(|c: char| c.is_whitespace() || c == '(') {
        return None;
    }
    Some((name, part[colon + 1..].trim()))
}

fn parse_params(raw: &str) -> (Vec<MixinParam>, bool) {
    let mut params = Vec::new();
    let mut variadic = false;
    for part in split_arguments(raw) {
        if part == "..." {
            variadic = true;
        } else if let Some(rest) = part.strip_suffix("...") {
            variadic = true;
            params.push(MixinParam { name: Some(rest.trim().to_string()), default: None });
        } else if let Some((name, default)) = named(part) {
            params.push(MixinParam {
                name: Some(name.to_string()),
                default: Some(default.to_string()),
            });
        } else if part.starts_with('@') {
            params.push(MixinParam { name: Some(part.to_string()), default: None });
        } else {
            params.push(MixinParam { name: None, default: Some(part.to_string()) });
        }
    }
    (params, variadic)
}

fn parse_args(raw: &str) -> Vec<MixinArg> {
    split_arguments(raw)
        .into_iter()
        .map(|part| match named(part) {
            Some((name, value)) => MixinArg {
                name: Some(name.to_string()),
                value: value.to_string(),
            },
            None => MixinArg { name: None, value: part.to_string() },
        })
        .collect()
}

/// Result of parsing: the stylesheet plus any errors found.
#[derive(Debug)]
pub struct ParseResult {
    pub stylesheet: Stylesheet,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseError {
    /// File the error occurred in.
    pub file: FileId,
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl ParseError {
    pub fn new(file: FileId, span: Span, message: impl Into<String>) -> Self {
        Self { file, span, message: message.into(), hint: None }
    }

    pub fn from_lex(error: LexError, file: FileId) -> Self {
        Self { file, span: error.span, message: error.message, hint: error.hint }
    }

    fn expected(expected: &str, found: &TokenKind, span: Span, file: FileId) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { file, span, message, hint }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "'}'" if matches!(found, TokenKind::Eof) => "Missing closing '}'".to_string(),
        "'}'" => format!("Expected '}}' to close block, found {}", found.display_name()),
        "'{'" => format!("Expected '{{' to start block, found {}", found.display_name()),
        "')'" if matches!(found, TokenKind::Eof) => "Unclosed '(' - missing ')'".to_string(),
        "']'" if matches!(found, TokenKind::Eof) => "Unclosed '[' - missing ']'".to_string(),
        "';'" => format!("Expected ';' after declaration, found {}", found.display_name()),
        "':'" => format!("Expected ':' after property name, found {}", found.display_name()),
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}
