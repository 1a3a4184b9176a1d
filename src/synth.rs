//! # Synth — value → CST synthesis
//!
//! `GreenNodeBuilder` only ever builds a whole tree bottom-up; there's no
//! API to hand it "build me a standalone `NUMBER` token". The technique
//! here — also how rust-analyzer's own `ast::make` module manufactures
//! syntax — is to parse a minimal, throwaway fragment through the normal
//! parser, then lift the node of interest back out via `detach()`. Pure
//! trivia (whitespace, a newline, a lone comma) skips the parser entirely
//! and goes straight through `GreenNodeBuilder`, since there's no grammar
//! rule that parses "just a comma" as a value on its own.

use crate::escape::encode_string_literal;
use crate::options::ParseOptions;
use crate::parser::parse;
use crate::syntax_kind::{JsoncLang, SyntaxElement, SyntaxKind, SyntaxNode};
use crate::tree::significant_child;
use rowan::{GreenNodeBuilder, NodeOrToken};

fn synth_fragment(fragment: &str) -> SyntaxElement {
    let root = parse(fragment, ParseOptions::permissive()).unwrap_or_else(|e| {
        panic!("internal: synthesized fragment {fragment:?} failed to parse: {e}")
    });
    let element = significant_child(&root)
        .unwrap_or_else(|| panic!("internal: synthesized fragment {fragment:?} has no value"));
    if let NodeOrToken::Node(node) = &element {
        node.detach();
    }
    element
}

pub(crate) fn synth_null() -> SyntaxElement {
    synth_fragment("null")
}

pub(crate) fn synth_boolean(value: bool) -> SyntaxElement {
    synth_fragment(if value { "true" } else { "false" })
}

/// `literal` must already be a well-formed JSON number (callers go through
/// [`crate::value::Value::Number`]'s canonical formatting, or accept a raw
/// token string verbatim per the mutation engine's value-argument rules).
pub(crate) fn synth_number(literal: &str) -> SyntaxElement {
    synth_fragment(literal)
}

pub(crate) fn synth_string(value: &str) -> SyntaxElement {
    synth_fragment(&encode_string_literal(value))
}

pub(crate) fn synth_empty_object() -> SyntaxElement {
    synth_fragment("{}")
}

pub(crate) fn synth_empty_array() -> SyntaxElement {
    synth_fragment("[]")
}

/// A raw token string, inserted verbatim — value-argument kind (a) in
/// `spec.md` §4.4 ("a raw token string, already well-formed source").
pub(crate) fn synth_raw(source: &str) -> SyntaxElement {
    synth_fragment(source)
}

/// Build a single standalone trivia or punctuation token directly, without
/// going through the parser.
fn synth_leaf(kind: SyntaxKind, text: &str) -> SyntaxElement {
    let mut builder = GreenNodeBuilder::new();
    builder.start_node(SyntaxKind::ROOT.into());
    builder.token(kind.into(), text);
    builder.finish_node();
    let root: rowan::SyntaxNode<JsoncLang> = SyntaxNode::new_root_mut(builder.finish());
    root.children_with_tokens()
        .next()
        .expect("just built exactly one child")
}

pub(crate) fn synth_whitespace(text: &str) -> SyntaxElement {
    synth_leaf(SyntaxKind::WHITESPACE, text)
}

pub(crate) fn synth_newline(text: &str) -> SyntaxElement {
    synth_leaf(SyntaxKind::NEWLINE, text)
}

pub(crate) fn synth_comma() -> SyntaxElement {
    synth_leaf(SyntaxKind::COMMA, ",")
}
