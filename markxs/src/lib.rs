//! Parser for MarkXS documents: a line-oriented structured-text format with
//! a typed header, a metadata block, and a body of nested numbered sections,
//! paragraphs, bullet lists, tables, fenced code blocks, and comments.
//!
//! The parse is a single pass over the input lines and never fails; all
//! irregularities surface as [`parser::Diagnostic`]s on the returned
//! [`document::Document`], each anchored to a 1-based line/column
//! [`location::Location`].

pub mod document;
pub mod location;
pub mod parser;

pub use document::{Block, Document, Header, InlineNode};
pub use location::{Location, Position};
pub use parser::{Diagnostic, DiagnosticCode, Parser, Severity};
