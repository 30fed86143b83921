use serde::Serialize;

/// A 1-based (line, column) position. Columns count Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A half-open source span: `end` is the position immediately after the last
/// included character. Point locations have `end == start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn span(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Location {
            start: Position {
                line: start_line,
                column: start_col,
            },
            end: Position {
                line: end_line,
                column: end_col,
            },
        }
    }

    /// A zero-width location at a single position.
    pub fn point(line: usize, column: usize) -> Self {
        Self::span(line, column, line, column)
    }
}
