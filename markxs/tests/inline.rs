//! Inline lexing behavior, exercised through paragraph and bullet parsing.

use markxs::document::{Block, Document};
use markxs::InlineNode;

fn parse(source: &str) -> Document {
    let lines: Vec<String> = source.lines().map(str::to_string).collect();
    markxs::Parser::new(lines).parse()
}

/// Parse `line` as the sole paragraph of a minimal document and return its
/// inline nodes. The paragraph starts on line 3, column 1.
fn lex(line: &str) -> Vec<InlineNode> {
    let doc = parse(&format!("DOC: t\n\n{}", line));
    assert!(doc.diagnostics.is_empty(), "unexpected diagnostics: {:?}", doc.diagnostics);
    match doc.body.into_iter().next() {
        Some(Block::Paragraph { inline, .. }) => inline,
        other => panic!("expected paragraph, got {:?}", other),
    }
}

#[test]
fn plain_text_is_one_node() {
    let nodes = lex("just plain words");
    assert_eq!(nodes.len(), 1);
    let InlineNode::Text { ref value, ref loc } = nodes[0] else {
        panic!("expected text");
    };
    assert_eq!(value, "just plain words");
    assert_eq!(loc.start.column, 1);
    assert_eq!(loc.end.column, 17);
}

#[test]
fn adjacent_labels_own_their_trailing_text() {
    let nodes = lex("intent: refactor module auth: tighten validation");
    assert_eq!(nodes.len(), 2, "no text node before the first label: {:?}", nodes);
    let InlineNode::InlineLabel { ref identifier, ref text, ref loc } = nodes[0] else {
        panic!("expected label");
    };
    assert_eq!(identifier, "intent");
    assert_eq!(text.as_deref(), Some("refactor module"));
    assert_eq!(loc.start.column, 1);
    assert_eq!(loc.end.column, 25);
    let InlineNode::InlineLabel { ref identifier, ref text, .. } = nodes[1] else {
        panic!("expected label");
    };
    assert_eq!(identifier, "auth");
    assert_eq!(text.as_deref(), Some("tighten validation"));
}

#[test]
fn label_without_trailing_text_omits_it() {
    let nodes = lex("see also ref:");
    assert_eq!(nodes.len(), 2);
    let InlineNode::InlineLabel { ref identifier, ref text, .. } = nodes[1] else {
        panic!("expected label");
    };
    assert_eq!(identifier, "ref");
    assert!(text.is_none());
}

#[test]
fn comment_marker_inside_code_span_is_code() {
    let nodes = lex("`i#notacomment`");
    assert_eq!(nodes.len(), 1);
    let InlineNode::InlineCode { ref code, ref loc } = nodes[0] else {
        panic!("expected code, got {:?}", nodes[0]);
    };
    assert_eq!(code, "i#notacomment");
    // The span covers the content, not the backticks.
    assert_eq!(loc.start.column, 2);
    assert_eq!(loc.end.column, 15);
}

#[test]
fn code_spans_and_labels_interleave() {
    let nodes = lex("run `cargo test` then status: done");
    assert_eq!(nodes.len(), 4);
    let InlineNode::Text { ref value, .. } = nodes[0] else {
        panic!("expected text");
    };
    assert_eq!(value, "run ");
    let InlineNode::InlineCode { ref code, ref loc } = nodes[1] else {
        panic!("expected code");
    };
    assert_eq!(code, "cargo test");
    assert_eq!(loc.start.column, 6);
    assert_eq!(loc.end.column, 16);
    let InlineNode::Text { ref value, .. } = nodes[2] else {
        panic!("expected text");
    };
    assert_eq!(value, " then ");
    let InlineNode::InlineLabel { ref identifier, ref text, .. } = nodes[3] else {
        panic!("expected label");
    };
    assert_eq!(identifier, "status");
    assert_eq!(text.as_deref(), Some("done"));
}

#[test]
fn unmatched_trailing_backtick_reverts_to_text() {
    let nodes = lex("see `unclosed rest");
    assert_eq!(nodes.len(), 2);
    let InlineNode::Text { ref value, .. } = nodes[0] else {
        panic!("expected text");
    };
    assert_eq!(value, "see ");
    let InlineNode::Text { ref value, ref loc } = nodes[1] else {
        panic!("expected text, got {:?}", nodes[1]);
    };
    assert_eq!(value, "`unclosed rest");
    assert_eq!(loc.start.column, 5);
    assert_eq!(loc.end.column, 19);
}

#[test]
fn backticks_cannot_be_escaped() {
    let nodes = lex("a `b` `c");
    assert_eq!(nodes.len(), 4);
    assert!(matches!(nodes[1], InlineNode::InlineCode { .. }));
    let InlineNode::Text { ref value, .. } = nodes[3] else {
        panic!("expected text");
    };
    assert_eq!(value, "`c");
}

#[test]
fn inline_comment_splits_the_line() {
    let doc = parse("DOC: t\n\ntask one i# remember this");
    let Block::Paragraph { ref inline, .. } = doc.body[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(inline.len(), 2);
    let InlineNode::Text { ref value, .. } = inline[0] else {
        panic!("expected text");
    };
    assert_eq!(value, "task one ");
    let InlineNode::InlineComment { ref text, ref loc } = inline[1] else {
        panic!("expected comment");
    };
    assert_eq!(text, "remember this");
    assert_eq!(loc.start.column, 10);
    assert_eq!(loc.end.column, 26);
}

#[test]
fn inline_comment_allowed_in_bullet_items() {
    let doc = parse("DOC: t\n\n- task i# remember");
    let Block::BulletList { ref items, .. } = doc.body[0] else {
        panic!("expected list");
    };
    let InlineNode::InlineComment { ref text, ref loc } = items[0].inline[1] else {
        panic!("expected comment, got {:?}", items[0].inline);
    };
    assert_eq!(text, "remember");
    // Bullet item text is anchored past the marker: "task i# ..." starts at
    // column 3, so the marker lands at column 8.
    assert_eq!(loc.start.column, 8);
}

#[test]
fn labels_keep_columns_across_joined_lines() {
    // The logical line is the join of both physical lines; spans for content
    // from the second line keep the first line's coordinate space.
    let doc = parse("DOC: t\n\nlead text\nowner: me");
    let Block::Paragraph { ref inline, .. } = doc.body[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(inline.len(), 2);
    let InlineNode::InlineLabel { ref identifier, ref loc, .. } = inline[1] else {
        panic!("expected label, got {:?}", inline[1]);
    };
    assert_eq!(identifier, "owner");
    assert_eq!(loc.start.line, 3);
    assert_eq!(loc.start.column, 11);
}
