//! Block- and inline-level line grammars.
//!
//! Each grammar is a compiled regex behind a `Lazy`; callers use them as pure
//! predicates or extractors over a single line. No parser state lives here.

use once_cell::sync::Lazy;
use regex::Regex;

/// Header line: uppercase space-joined words, a colon, then free text.
pub(crate) static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]+(?: [A-Z]+)*): (.+)$").unwrap());

/// Metadata line: looser key (letters/digits/`_`/`-`, space-joined words).
pub(crate) static METADATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z0-9_-]+(?: [A-Za-z0-9_-]+)*): (.*)$").unwrap());

/// Section heading: dotted integer label, uppercase title, optional
/// description after a colon.
pub(crate) static SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)*)\.? ([A-Z](?:[A-Z ]*[A-Z])?)(?:: (.*))?$").unwrap());

/// Bullet line: indent, one of `-`/`*`/`+`, a space, then item text.
pub(crate) static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)([-*+]) (.+)$").unwrap());

/// Table trigger: optional leading whitespace then a pipe.
pub(crate) static TABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\|").unwrap());

/// Fence opener: optional indent, three backticks, optional info string.
pub(crate) static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)```(.*)$").unwrap());

/// Whole-line comment trigger.
pub(crate) static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*#").unwrap());

/// Inline label marker: a contiguous identifier immediately followed by a
/// colon. Searched (not anchored) within a text run.
pub(crate) static LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Za-z0-9_-]+):").unwrap());
