// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Import resolution: loading and parsing `@import`ed stylesheets.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Component, Path, PathBuf};

use lesshint_ast::node::{Import, Node};
use lesshint_ast::{FileId, Location, SourceSet, Span, Stylesheet};
use lesshint_lexer::Lexer;
use thiserror::Error;

use crate::parser::{ParseError, Parser};

/// Source of stylesheet text for the root file and its imports.
pub trait ImportLoader {
    fn load(&self, path: &Path) -> io::Result<String>;
}

/// Reads files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl ImportLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Serves files from memory; used by tests and editor integrations.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> &mut Self {
        self.files.insert(normalize(&path.into()), text.into());
        self
    }
}

impl ImportLoader for MemoryLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

/// A parsed root stylesheet with every imported file resolved in place.
#[derive(Debug)]
pub struct ParsedStylesheet {
    pub root: Stylesheet,
    pub sources: SourceSet,
}

/// A failed parse: the first error plus every file read up to that point.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ParseFailure {
    #[source]
    pub error: ParseError,
    pub sources: SourceSet,
}

impl ParseFailure {
    /// Line and column of the error in the file it occurred in.
    pub fn location(&self) -> Location {
        self.sources
            .get(self.error.file)
            .map(|f| f.location(self.error.span.start))
            .unwrap_or(Location::START)
    }

    pub fn path(&self) -> Option<&Path> {
        self.sources.path(self.error.file)
    }
}

/// Parse `source` (the text of `path`) and resolve its imports through `loader`.
///
/// The first error in any file aborts the parse.
pub fn parse_file(
    path: &Path,
    source: &str,
    loader: &dyn ImportLoader,
) -> Result<ParsedStylesheet, ParseFailure> {
    let mut resolver = Resolver {
        loader,
        sources: SourceSet::new(),
        seen: HashSet::new(),
    };
    let path = normalize(path);
    resolver.seen.insert(path.clone());
    let file = resolver.sources.add(path, source.to_string());
    match resolver.parse_and_resolve(file) {
        Ok(root) => Ok(ParsedStylesheet { root, sources: resolver.sources }),
        Err(error) => Err(ParseFailure { error, sources: resolver.sources }),
    }
}

/// Lex and parse a single file without touching its imports.
pub fn parse_source(source: &str, file: FileId) -> Result<Stylesheet, ParseError> {
    let lexed = Lexer::new(source).tokenize();
    if let Some(error) = lexed.errors.into_iter().next() {
        return Err(ParseError::from_lex(error, file));
    }
    let result = Parser::new(source, lexed.tokens, file).parse();
    match result.errors.into_iter().next() {
        Some(error) => Err(error),
        None => Ok(result.stylesheet),
    }
}

struct Resolver<'l> {
    loader: &'l dyn ImportLoader,
    sources: SourceSet,
    seen: HashSet<PathBuf>,
}

impl Resolver<'_> {
    fn parse_and_resolve(&mut self, file: FileId) -> Result<Stylesheet, ParseError> {
        let mut sheet = parse_source(self.sources.text(file), file)?;
        tracing::trace!(file = file.0, nodes = sheet.rules.len(), "parsed");
        self.resolve_nodes(&mut sheet.rules, file)?;
        Ok(sheet)
    }

    fn resolve_nodes(&mut self, nodes: &mut [Node], file: FileId) -> Result<(), ParseError> {
        for node in nodes.iter_mut() {
            match node {
                Node::Import(import) => self.resolve_import(import, file)?,
                Node::Rule(rule) => self.resolve_nodes(&mut rule.rules, file)?,
                Node::MixinDefinition(mixin) => self.resolve_nodes(&mut mixin.rules, file)?,
                Node::DetachedRuleset(detached) => self.resolve_nodes(&mut detached.rules, file)?,
                Node::Media(media) => self.resolve_nodes(&mut media.rules, file)?,
                Node::Directive(directive) => {
                    if let Some(rules) = directive.rules.as_mut() {
                        self.resolve_nodes(rules, file)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn resolve_import(&mut self, import: &mut Import, file: FileId) -> Result<(), ParseError> {
        if import.is_css() || is_remote(&import.path) {
            return Ok(());
        }
        if import.path.contains("@{") {
            tracing::warn!(path = %import.path, "skipping import with interpolated path");
            return Ok(());
        }

        let importer_dir = self
            .sources
            .path(file)
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mut target = importer_dir.join(&import.path);
        if target.extension().is_none() {
            target.set_extension("less");
        }
        let target = normalize(&target);

        if !import.options.multiple && !self.seen.insert(target.clone()) {
            tracing::debug!(path = %target.display(), "already imported");
            return Ok(());
        }

        let text = match self.loader.load(&target) {
            Ok(text) => text,
            Err(_) if import.options.optional => {
                tracing::debug!(path = %target.display(), "optional import not found");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(path = %target.display(), error = %e, "import failed");
                let message = if e.kind() == io::ErrorKind::NotFound {
                    format!("'{}' wasn't found", import.path)
                } else {
                    format!("'{}' could not be read: {}", import.path, e)
                };
                return Err(ParseError::new(file, Span::new(import.index, import.index), message));
            }
        };

        let id = self.sources.add(target, text);
        if import.options.inline {
            return Ok(());
        }
        let sheet = self.parse_and_resolve(id)?;
        import.root = Some(Box::new(sheet));
        Ok(())
    }
}

fn is_remote(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
