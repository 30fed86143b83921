use codespan_reporting::diagnostic::{Diagnostic as ReportDiagnostic, Label, Severity as ReportSeverity};
use serde::Serialize;

use crate::location::{Location, Position};

/// A non-fatal structured report attached to the parsed document.
/// Diagnostics never abort parsing; errors mark structural problems the
/// parser could not resolve, warnings mark recovered irregularities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub code: DiagnosticCode,
    pub loc: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Stable machine-readable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    Empty,
    HeaderInvalid,
    InlineCommentIllegal,
    SectionParentMissing,
    FenceUnterminated,
    FenceInTable,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::Empty => "EMPTY",
            DiagnosticCode::HeaderInvalid => "HEADER_INVALID",
            DiagnosticCode::InlineCommentIllegal => "INLINE_COMMENT_ILLEGAL",
            DiagnosticCode::SectionParentMissing => "SECTION_PARENT_MISSING",
            DiagnosticCode::FenceUnterminated => "FENCE_UNTERMINATED",
            DiagnosticCode::FenceInTable => "FENCE_IN_TABLE",
        }
    }
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, code: DiagnosticCode, loc: Location) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            code,
            loc,
        }
    }

    pub fn warning(message: impl Into<String>, code: DiagnosticCode, loc: Location) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            code,
            loc,
        }
    }

    /// Convert to a codespan-reporting diagnostic for terminal display.
    /// `source` must be the text the document was parsed from; it is used to
    /// map line/column positions back to byte offsets.
    pub fn to_report(&self, file_id: usize, source: &str) -> ReportDiagnostic<usize> {
        let severity = match self.severity {
            Severity::Error => ReportSeverity::Error,
            Severity::Warning => ReportSeverity::Warning,
        };
        let start = byte_offset(source, self.loc.start);
        let end = byte_offset(source, self.loc.end).max(start);
        ReportDiagnostic::new(severity)
            .with_message(&self.message)
            .with_code(self.code.as_str())
            .with_labels(vec![Label::primary(file_id, start..end)])
    }
}

/// Map a 1-based (line, char column) position to a byte offset in `source`,
/// clamping past-the-end positions to the nearest valid offset.
fn byte_offset(source: &str, pos: Position) -> usize {
    let mut line_no = 1;
    let mut line_start = 0;
    for (i, b) in source.bytes().enumerate() {
        if line_no == pos.line {
            break;
        }
        if b == b'\n' {
            line_no += 1;
            line_start = i + 1;
        }
    }
    if line_no < pos.line {
        return source.len();
    }
    let line = source[line_start..]
        .split(['\n', '\r'])
        .next()
        .unwrap_or("");
    let within = line
        .char_indices()
        .nth(pos.column.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    line_start + within
}
