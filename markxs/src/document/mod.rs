use serde::Serialize;

use crate::location::Location;
use crate::parser::Diagnostic;

/// A fully parsed MarkXS document.
///
/// The root of the AST: a typed header (when the first non-blank line matched
/// the header grammar), the metadata block, and the body tree. Diagnostics
/// collected during the parse ride along; the `diagnostics` key is omitted
/// from the canonical serialization when the list is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Serialized as `null` when the header line was invalid or missing.
    pub header: Option<Header>,
    pub metadata: Vec<MetadataEntry>,
    pub body: Vec<Block>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// The document header: an uppercase tag followed by free text,
/// e.g. `STATUS: draft`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub tag: String,
    pub text: String,
    pub loc: Location,
}

/// One `key: value` line of the metadata block. Duplicate keys are legal and
/// kept in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
    pub loc: Location,
}

/// A body-level node. `Section` bodies nest further `Block`s, so the body is
/// a tree; every other variant is a leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Block {
    BlankLine {
        loc: Location,
    },
    WholeLineComment {
        text: String,
        loc: Location,
    },
    FencedCodeBlock {
        /// Trimmed text after the opening fence; `null` when blank.
        #[serde(rename = "infoString")]
        info_string: Option<String>,
        /// Leading whitespace width of the opening fence line.
        indent: usize,
        /// Raw content lines, captured verbatim.
        content: Vec<String>,
        loc: Location,
    },
    Table {
        header: TableRow,
        #[serde(skip_serializing_if = "Option::is_none")]
        align: Option<TableRow>,
        rows: Vec<TableRow>,
        loc: Location,
    },
    Section {
        /// Dot-split heading label, e.g. `2.1.3` -> `[2, 1, 3]`. Never empty.
        number: Vec<u32>,
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Nesting depth; always `number.len()`.
        level: usize,
        body: Vec<Block>,
        loc: Location,
    },
    BulletList {
        items: Vec<BulletItem>,
        loc: Location,
    },
    Paragraph {
        inline: Vec<InlineNode>,
        loc: Location,
    },
}

/// One row of a table. Cells are trimmed; the outer pipes are structural
/// delimiters, not cell content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulletItem {
    pub marker: char,
    pub inline: Vec<InlineNode>,
    /// Trimmed continuation lines, omitted when the item fit on one line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<Vec<String>>,
    pub loc: Location,
}

/// Inline elements produced by lexing one logical line of flowing text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum InlineNode {
    Text {
        value: String,
        loc: Location,
    },
    InlineCode {
        code: String,
        loc: Location,
    },
    InlineLabel {
        identifier: String,
        /// Annotation text up to the next label; omitted when trimming
        /// leaves nothing.
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        loc: Location,
    },
    InlineComment {
        text: String,
        loc: Location,
    },
}
