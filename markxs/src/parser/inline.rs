//! Inline lexer: turns one logical line of flowing text into code spans,
//! labeled runs, inline comments, and plain text with column-accurate spans.
//!
//! The lexer is purely functional over a string slice plus an anchoring
//! (line, start column) for offset 0; it advances no cursor. Columns are
//! counted in chars. A literal backtick cannot be escaped; every backtick
//! toggles code-span state. That is a grammar limitation, kept as-is.

use std::borrow::Cow;

use crate::document::InlineNode;
use crate::location::Location;
use crate::parser::diagnostic::{Diagnostic, DiagnosticCode};
use crate::parser::grammar::LABEL;

/// The two-character inline comment marker.
pub(crate) const COMMENT_MARKER: &str = "i#";

/// Lex a logical text line into inline nodes.
///
/// When `allow_comment` is set, the first `i#` found outside a backtick span
/// splits the text: everything before it is lexed normally and the remainder
/// becomes a single trailing `InlineComment`.
pub(crate) fn lex_inline(
    text: &str,
    allow_comment: bool,
    line: usize,
    start_col: usize,
) -> Vec<InlineNode> {
    if allow_comment {
        if let Some((byte_pos, col)) = find_comment_marker(text) {
            let mut nodes = lex_code_and_labels(&text[..byte_pos], line, start_col);
            nodes.push(InlineNode::InlineComment {
                text: text[byte_pos + COMMENT_MARKER.len()..].trim_start().to_string(),
                loc: Location::span(
                    line,
                    start_col + col,
                    line,
                    start_col + text.chars().count(),
                ),
            });
            return nodes;
        }
    }
    lex_code_and_labels(text, line, start_col)
}

/// Find the first `i#` outside any backtick span. Returns (byte, char) offsets.
fn find_comment_marker(text: &str) -> Option<(usize, usize)> {
    let mut in_code = false;
    for (col, (i, ch)) in text.char_indices().enumerate() {
        if ch == '`' {
            in_code = !in_code;
            continue;
        }
        if !in_code && text[i..].starts_with(COMMENT_MARKER) {
            return Some((i, col));
        }
    }
    None
}

/// Scan for backtick-delimited code spans; text outside them goes to label
/// extraction. An unmatched trailing opening backtick is reprocessed as plain
/// text, stray backtick included.
fn lex_code_and_labels(text: &str, line: usize, start_col: usize) -> Vec<InlineNode> {
    let mut nodes = Vec::new();
    let mut in_code = false;
    // Byte offset and char column move in lockstep; the backtick is one byte.
    let mut code_start = 0;
    let mut code_start_col = 0;
    let mut plain_start = 0;
    let mut plain_start_col = 0;
    for (col, (i, ch)) in text.char_indices().enumerate() {
        if ch != '`' {
            continue;
        }
        if in_code {
            nodes.push(InlineNode::InlineCode {
                code: text[code_start..i].to_string(),
                loc: Location::span(line, start_col + code_start_col, line, start_col + col),
            });
            plain_start = i + 1;
            plain_start_col = col + 1;
            in_code = false;
        } else {
            if plain_start < i {
                lex_labels_into(
                    &text[plain_start..i],
                    &mut nodes,
                    line,
                    start_col + plain_start_col,
                );
            }
            code_start = i + 1;
            code_start_col = col + 1;
            in_code = true;
        }
    }
    if in_code {
        // Backtrack over the unmatched opener.
        plain_start = code_start - 1;
        plain_start_col = code_start_col - 1;
    }
    if plain_start < text.len() {
        lex_labels_into(
            &text[plain_start..],
            &mut nodes,
            line,
            start_col + plain_start_col,
        );
    }
    nodes
}

/// Extract `identifier:` labels from a non-code text run. Text before the
/// first label becomes a `Text` node; each label owns the text up to the next
/// label (or end of run) as its optional annotation.
fn lex_labels_into(text: &str, out: &mut Vec<InlineNode>, line: usize, base_col: usize) {
    let col_at = |byte: usize| base_col + text[..byte].chars().count();
    let mut pos = 0;
    loop {
        let Some(m) = LABEL.find_at(text, pos) else {
            if pos < text.len() {
                out.push(InlineNode::Text {
                    value: text[pos..].to_string(),
                    loc: Location::span(line, col_at(pos), line, col_at(text.len())),
                });
            }
            return;
        };
        if m.start() > pos {
            out.push(InlineNode::Text {
                value: text[pos..m.start()].to_string(),
                loc: Location::span(line, col_at(pos), line, col_at(m.start())),
            });
        }
        // The match always ends in the colon; strip it to get the identifier.
        let identifier = &text[m.start()..m.end() - 1];
        let end = LABEL
            .find_at(text, m.end())
            .map(|next| next.start())
            .unwrap_or(text.len());
        let trailing = text[m.end()..end].trim();
        out.push(InlineNode::InlineLabel {
            identifier: identifier.to_string(),
            text: (!trailing.is_empty()).then(|| trailing.to_string()),
            loc: Location::span(line, col_at(m.start()), line, col_at(end)),
        });
        pos = end;
    }
}

/// Strip an inline comment from a context where it is not legal (header,
/// metadata, section heading), recording a warning. The prefix keeps its
/// trailing whitespace trimmed.
pub(crate) fn strip_illegal_comment<'a>(
    line: &'a str,
    line_no: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Cow<'a, str> {
    match find_comment_marker(line) {
        Some((byte_pos, col)) => {
            diagnostics.push(Diagnostic::warning(
                "Inline comment not allowed in this context; stripped before parsing.",
                DiagnosticCode::InlineCommentIllegal,
                Location::point(line_no, col + 1),
            ));
            Cow::Owned(line[..byte_pos].trim_end().to_string())
        }
        None => Cow::Borrowed(line),
    }
}

/// Silent variant of [`strip_illegal_comment`] used for lookahead probes.
pub(crate) fn strip_comment_for_probe(line: &str) -> Cow<'_, str> {
    match find_comment_marker(line) {
        Some((byte_pos, _)) => Cow::Owned(line[..byte_pos].trim_end().to_string()),
        None => Cow::Borrowed(line),
    }
}
