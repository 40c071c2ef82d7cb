// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax tree types for Less stylesheets.
//!
//! This crate defines the tokens, nodes, selectors and values shared between
//! the lexer, parser, compiler, and linter.

pub mod node;
pub mod selector;
pub mod source;
pub mod span;
pub mod token;
pub mod value;

pub use node::{Node, Stylesheet};
pub use source::{FileId, SourceFile, SourceSet};
pub use span::{index_to_location, LineMap, Location, Span};
pub use value::{Color, Value};
