pub mod diagnostic;
mod grammar;
mod inline;
mod structural;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};

use crate::document::Document;

/// Parser entry point. Holds the document as discrete lines; splitting the
/// source on newline boundaries is the caller's responsibility.
pub struct Parser {
    lines: Vec<String>,
}

impl Parser {
    pub fn new(lines: Vec<String>) -> Self {
        Parser { lines }
    }

    /// Parse the lines into a complete [`Document`]. Parsing never fails:
    /// malformed constructs degrade to diagnostics plus best-effort nodes,
    /// all carried on the returned document.
    pub fn parse(&self) -> Document {
        structural::parse_lines(&self.lines)
    }
}

/// Parse a borrowed line sequence without constructing a [`Parser`].
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Document {
    let owned: Vec<String> = lines.iter().map(|l| l.as_ref().to_string()).collect();
    structural::parse_lines(&owned)
}
