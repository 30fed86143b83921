//! Single-pass line scanner: consumes the header and metadata block, then
//! dispatches each body line to a block extractor in fixed precedence order
//! (blank, fence, table, section heading, whole-line comment, bullet,
//! paragraph fallback).
//!
//! Sections are held in an arena during the scan; the open-ancestor stack
//! stores arena indices, so a section recovered to the document root can
//! still sit on the stack and parent its own descendants. The tree is
//! materialized once at the end, preserving creation order.

use crate::document::{Block, BulletItem, Document, Header, MetadataEntry, TableRow};
use crate::location::Location;
use crate::parser::diagnostic::{Diagnostic, DiagnosticCode};
use crate::parser::grammar::{BULLET, COMMENT, FENCE, HEADER, METADATA, SECTION, TABLE};
use crate::parser::inline::{lex_inline, strip_comment_for_probe, strip_illegal_comment};

pub(crate) fn parse_lines(lines: &[String]) -> Document {
    let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return Document {
            header: None,
            metadata: Vec::new(),
            body: Vec::new(),
            diagnostics: vec![Diagnostic::error(
                "Empty document",
                DiagnosticCode::Empty,
                Location::point(1, 1),
            )],
        };
    };

    let mut state = ParseState::new(lines, first);
    let header = state.parse_header();
    let metadata = state.parse_metadata();
    state.parse_body();
    state.into_document(header, metadata)
}

/// A section still under construction. Children and other body blocks
/// accumulate as [`BodyItem`]s until the whole document has been scanned.
struct OpenSection {
    number: Vec<u32>,
    title: String,
    description: Option<String>,
    loc: Location,
    body: Vec<BodyItem>,
}

/// Body slot contents during the scan: either a finished leaf block or a
/// handle to a section in the arena.
enum BodyItem {
    Block(Block),
    Section(usize),
}

struct ParseState<'a> {
    lines: &'a [String],
    idx: usize,
    diagnostics: Vec<Diagnostic>,
    /// Every section ever opened; `None` once moved into the finished tree.
    arena: Vec<Option<OpenSection>>,
    /// Open ancestors, innermost last (arena indices).
    stack: Vec<usize>,
    root: Vec<BodyItem>,
}

impl<'a> ParseState<'a> {
    fn new(lines: &'a [String], start: usize) -> Self {
        ParseState {
            lines,
            idx: start,
            diagnostics: Vec::new(),
            arena: Vec::new(),
            stack: Vec::new(),
            root: Vec::new(),
        }
    }

    fn section(&self, index: usize) -> &OpenSection {
        self.arena[index].as_ref().expect("section still open")
    }

    fn section_mut(&mut self, index: usize) -> &mut OpenSection {
        self.arena[index].as_mut().expect("section still open")
    }

    /// Route a finished block to the innermost open section, or to the
    /// document root when no section is open.
    fn add_block(&mut self, block: Block) {
        match self.stack.last().copied() {
            Some(top) => self.section_mut(top).body.push(BodyItem::Block(block)),
            None => self.root.push(BodyItem::Block(block)),
        }
    }

    // -----------------------------------------------------------------
    // Header and metadata
    // -----------------------------------------------------------------

    /// The first non-blank line is the header candidate. It is consumed
    /// whether or not it matches; inline comments are never legal here.
    fn parse_header(&mut self) -> Option<Header> {
        let line_no = self.idx + 1;
        let cleaned = strip_illegal_comment(&self.lines[self.idx], line_no, &mut self.diagnostics);
        self.idx += 1;
        match HEADER.captures(&cleaned) {
            Some(caps) => Some(Header {
                tag: caps[1].to_string(),
                text: caps[2].to_string(),
                loc: Location::span(line_no, 1, line_no, cleaned.chars().count() + 1),
            }),
            None => {
                self.diagnostics.push(Diagnostic::error(
                    "Invalid or missing header line",
                    DiagnosticCode::HeaderInvalid,
                    Location::point(line_no, 1),
                ));
                None
            }
        }
    }

    /// Metadata lines follow the header until a blank line (consumed) or a
    /// line that fails the grammar (left for body parsing).
    fn parse_metadata(&mut self) -> Vec<MetadataEntry> {
        let mut entries = Vec::new();
        while self.idx < self.lines.len() {
            let line = &self.lines[self.idx];
            if line.trim().is_empty() {
                self.idx += 1;
                break;
            }
            if !METADATA.is_match(line) {
                break;
            }
            let line_no = self.idx + 1;
            let cleaned = strip_illegal_comment(line, line_no, &mut self.diagnostics);
            // The stripped line must still match; if the comment was the
            // whole value side, fall through to body parsing.
            let Some(caps) = METADATA.captures(&cleaned) else {
                break;
            };
            entries.push(MetadataEntry {
                key: caps[1].to_string(),
                value: caps[2].to_string(),
                loc: Location::span(line_no, 1, line_no, line.chars().count() + 1),
            });
            self.idx += 1;
        }
        entries
    }

    // -----------------------------------------------------------------
    // Body dispatch
    // -----------------------------------------------------------------

    fn parse_body(&mut self) {
        while self.idx < self.lines.len() {
            let line = &self.lines[self.idx];
            if line.trim().is_empty() {
                let line_no = self.idx + 1;
                let block = Block::BlankLine {
                    loc: Location::span(line_no, 1, line_no, line.chars().count() + 1),
                };
                self.add_block(block);
                self.idx += 1;
                continue;
            }
            if FENCE.is_match(line) {
                self.extract_fence();
                continue;
            }
            if TABLE.is_match(line) {
                self.extract_table();
                continue;
            }
            if self.try_section() {
                continue;
            }
            if COMMENT.is_match(line) {
                self.extract_comment();
                continue;
            }
            if BULLET.is_match(line) {
                self.extract_bullet_list();
                continue;
            }
            self.extract_paragraph();
        }
    }

    fn extract_comment(&mut self) {
        let line = &self.lines[self.idx];
        let line_no = self.idx + 1;
        let text = line
            .trim_start()
            .strip_prefix('#')
            .unwrap_or_default()
            .trim_start()
            .to_string();
        let block = Block::WholeLineComment {
            text,
            loc: Location::span(line_no, 1, line_no, line.chars().count() + 1),
        };
        self.add_block(block);
        self.idx += 1;
    }

    // -----------------------------------------------------------------
    // Fenced code blocks
    // -----------------------------------------------------------------

    fn extract_fence(&mut self) {
        let caps = FENCE
            .captures(&self.lines[self.idx])
            .expect("fence trigger checked");
        let start_line = self.idx + 1;
        let indent = caps[1].chars().count();
        let info = caps[2].trim();
        let info_string = (!info.is_empty()).then(|| info.to_string());
        self.idx += 1;

        let mut content: Vec<String> = Vec::new();
        let mut closing: Option<&str> = None;
        while self.idx < self.lines.len() {
            let line = &self.lines[self.idx];
            if closes_fence(line, indent) {
                closing = Some(line);
                self.idx += 1;
                break;
            }
            content.push(line.clone());
            self.idx += 1;
        }

        let end_line = start_line + content.len() + usize::from(closing.is_some());
        let end_col = match closing {
            Some(line) => line.chars().count() + 1,
            None => content.last().map_or(1, |l| l.chars().count() + 1),
        };
        if closing.is_none() {
            self.diagnostics.push(Diagnostic::error(
                "Unterminated fenced code block",
                DiagnosticCode::FenceUnterminated,
                Location::point(start_line + content.len(), 1),
            ));
        }
        let block = Block::FencedCodeBlock {
            info_string,
            indent,
            content,
            loc: Location::span(start_line, 1, end_line, end_col),
        };
        self.add_block(block);
    }

    // -----------------------------------------------------------------
    // Tables
    // -----------------------------------------------------------------

    fn extract_table(&mut self) {
        let start_line = self.idx + 1;
        let mut raw: Vec<&str> = Vec::new();
        while self.idx < self.lines.len() && TABLE.is_match(&self.lines[self.idx]) {
            raw.push(&self.lines[self.idx]);
            self.idx += 1;
        }

        let mut parsed: Vec<TableRow> = Vec::new();
        for (offset, row) in raw.iter().enumerate() {
            let line_no = start_line + offset;
            if let Some(pos) = row.find("```") {
                // Advisory: keep collecting the table.
                self.diagnostics.push(Diagnostic::error(
                    "Fenced code block delimiter inside table is not allowed.",
                    DiagnosticCode::FenceInTable,
                    Location::point(line_no, row[..pos].chars().count() + 1),
                ));
            }
            let parts: Vec<&str> = row.trim().split('|').collect();
            let cells = parts[1..parts.len() - 1]
                .iter()
                .map(|cell| cell.trim().to_string())
                .collect();
            parsed.push(TableRow {
                cells,
                loc: Location::span(line_no, 1, line_no, row.trim_end().chars().count() + 1),
            });
        }

        let end_line = start_line + raw.len() - 1;
        let end_col = raw.last().map_or(1, |r| r.trim_end().chars().count() + 1);
        let mut rows = parsed.into_iter();
        let header = rows.next().expect("table has at least one row");
        let align = rows.next();
        let block = Block::Table {
            header,
            align,
            rows: rows.collect(),
            loc: Location::span(start_line, 1, end_line, end_col),
        };
        self.add_block(block);
    }

    // -----------------------------------------------------------------
    // Section headings
    // -----------------------------------------------------------------

    /// Returns true when the current line was consumed as a section heading.
    /// A line whose number component does not fit `u32` is not a heading and
    /// reads as paragraph text.
    fn try_section(&mut self) -> bool {
        let line = &self.lines[self.idx];
        let probe = strip_comment_for_probe(line);
        let Some(number) = heading_numbers(&probe) else {
            return false;
        };
        let line_no = self.idx + 1;
        let cleaned = strip_illegal_comment(line, line_no, &mut self.diagnostics);
        // Stripping was already applied to the probe, so the grammar still
        // matches here.
        let caps = SECTION.captures(&cleaned).expect("probe and cleaned line agree");
        let section = OpenSection {
            number,
            title: caps[2].to_string(),
            description: caps
                .get(3)
                .map(|m| m.as_str())
                .filter(|d| !d.is_empty())
                .map(String::from),
            loc: Location::span(line_no, 1, line_no, line.trim_end().chars().count() + 1),
            body: Vec::new(),
        };
        self.place_section(section, line_no);
        self.idx += 1;
        true
    }

    /// Pop anything at the same or deeper nesting depth (a depth comparison
    /// only), then attach under the stack entry whose number equals the
    /// incoming section's numeric parent. When that parent was never
    /// declared, warn and attach at the root; the section is still pushed so
    /// its own descendants nest correctly.
    fn place_section(&mut self, section: OpenSection, line_no: usize) {
        while let Some(&top) = self.stack.last() {
            if self.section(top).number.len() >= section.number.len() {
                self.stack.pop();
            } else {
                break;
            }
        }

        let parent_number = &section.number[..section.number.len() - 1];
        let mut parent = None;
        if !parent_number.is_empty() {
            parent = self
                .stack
                .iter()
                .rev()
                .copied()
                .find(|&i| self.section(i).number == parent_number);
            if parent.is_none() {
                let dotted = parent_number
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(".");
                self.diagnostics.push(Diagnostic::warning(
                    format!("Missing parent section {dotted}; attached to document root."),
                    DiagnosticCode::SectionParentMissing,
                    Location::point(line_no, 1),
                ));
            }
        }

        let index = self.arena.len();
        self.arena.push(Some(section));
        match parent {
            Some(p) => self.section_mut(p).body.push(BodyItem::Section(index)),
            None => self.root.push(BodyItem::Section(index)),
        }
        self.stack.push(index);
    }

    // -----------------------------------------------------------------
    // Bullet lists
    // -----------------------------------------------------------------

    fn extract_bullet_list(&mut self) {
        let list_start = self.idx + 1;
        let mut items: Vec<BulletItem> = Vec::new();
        while self.idx < self.lines.len() {
            let Some(caps) = BULLET.captures(&self.lines[self.idx]) else {
                break;
            };
            let indent = caps[1].chars().count();
            let marker = caps[2].chars().next().expect("single marker char");
            let text = caps[3].to_string();

            // Continuation lines: non-blank, not a bullet or block opener,
            // indented at least two columns past the marker.
            let base_indent = indent + 2;
            let mut continuation: Vec<String> = Vec::new();
            let mut lookahead = self.idx + 1;
            while lookahead < self.lines.len() {
                let next = &self.lines[lookahead];
                if next.trim().is_empty() || BULLET.is_match(next) {
                    break;
                }
                let probe = strip_comment_for_probe(next);
                if FENCE.is_match(next) || TABLE.is_match(next) || heading_numbers(&probe).is_some()
                {
                    break;
                }
                if leading_spaces(next) < base_indent {
                    break;
                }
                continuation.push(next.trim().to_string());
                lookahead += 1;
            }

            let mut logical = text;
            for cont in &continuation {
                logical.push(' ');
                logical.push_str(cont);
            }
            // Positions inside the joined text stay anchored to the first
            // physical line; content drawn from continuation lines keeps
            // that coordinate space. Known quirk, kept for compatibility.
            let inline = lex_inline(&logical, true, self.idx + 1, indent + 3);

            let last = lookahead - 1;
            items.push(BulletItem {
                marker,
                inline,
                continuation: (!continuation.is_empty()).then_some(continuation),
                loc: Location::span(
                    self.idx + 1,
                    indent + 1,
                    last + 1,
                    self.lines[last].trim_end().chars().count() + 1,
                ),
            });
            self.idx = lookahead;
        }

        let (end_line, end_col) = items
            .last()
            .map_or((list_start, 1), |item| (item.loc.end.line, item.loc.end.column));
        let block = Block::BulletList {
            items,
            loc: Location::span(list_start, 1, end_line, end_col),
        };
        self.add_block(block);
    }

    // -----------------------------------------------------------------
    // Paragraphs (fallback)
    // -----------------------------------------------------------------

    fn extract_paragraph(&mut self) {
        let start = self.idx;
        while self.idx < self.lines.len() {
            let line = &self.lines[self.idx];
            if line.trim().is_empty() {
                break;
            }
            let probe = strip_comment_for_probe(line);
            if FENCE.is_match(line)
                || TABLE.is_match(line)
                || heading_numbers(&probe).is_some()
                || COMMENT.is_match(line)
                || BULLET.is_match(line)
            {
                break;
            }
            self.idx += 1;
        }
        debug_assert!(self.idx > start, "dispatch guarantees the fallback consumes a line");

        let logical = self.lines[start..self.idx]
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join(" ");
        let inline = lex_inline(&logical, true, start + 1, 1);
        let last = self.idx - 1;
        let block = Block::Paragraph {
            inline,
            loc: Location::span(
                start + 1,
                1,
                last + 1,
                self.lines[last].trim_end().chars().count() + 1,
            ),
        };
        self.add_block(block);
    }

    // -----------------------------------------------------------------
    // Tree materialization
    // -----------------------------------------------------------------

    fn into_document(mut self, header: Option<Header>, metadata: Vec<MetadataEntry>) -> Document {
        let root = std::mem::take(&mut self.root);
        let body = build_blocks(&mut self.arena, root);
        Document {
            header,
            metadata,
            body,
            diagnostics: self.diagnostics,
        }
    }
}

/// Recursively convert body items into owned blocks, taking each section out
/// of the arena exactly once.
fn build_blocks(arena: &mut Vec<Option<OpenSection>>, items: Vec<BodyItem>) -> Vec<Block> {
    items
        .into_iter()
        .map(|item| match item {
            BodyItem::Block(block) => block,
            BodyItem::Section(index) => {
                let section = arena[index].take().expect("section placed exactly once");
                let body = build_blocks(arena, section.body);
                Block::Section {
                    level: section.number.len(),
                    number: section.number,
                    title: section.title,
                    description: section.description,
                    body,
                    loc: section.loc,
                }
            }
        })
        .collect()
}

/// The number path of a heading line, `None` when the line is not a heading
/// or a component does not fit `u32`. Every heading probe goes through this
/// so the extractors and the lookahead checks agree on what a heading is.
fn heading_numbers(probe: &str) -> Option<Vec<u32>> {
    let caps = SECTION.captures(probe)?;
    caps[1]
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect()
}

/// A closing fence starts with exactly `indent` spaces followed by the
/// marker, and trims to the bare marker (no info string on the close).
fn closes_fence(line: &str, indent: usize) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < indent || !bytes[..indent].iter().all(|&b| b == b' ') {
        return false;
    }
    line[indent..].starts_with("```") && line.trim() == "```"
}

fn leading_spaces(line: &str) -> usize {
    line.chars().take_while(|&c| c == ' ').count()
}
