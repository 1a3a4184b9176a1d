//! # Mutation — editing the tree in place
//!
//! Every operation here works the same way: find the slot to change,
//! synthesize a replacement fragment with [`crate::synth`], and splice it
//! into the mutable-cursor tree with `SyntaxNode::splice_children`. Comma
//! and whitespace bookkeeping (`spec.md` §4.4's "comma discipline") is
//! handled here too, since it has nowhere else to live — the grammar
//! doesn't run again after the initial parse.
//!
//! ## Format inference
//!
//! A freshly inserted value has no existing trivia of its own, so this
//! module infers plausible formatting from the surrounding document:
//! indent width from the nearest existing indentation in the tree (two
//! spaces if none exists), newline style (`\n` vs `\r\n`) from whichever
//! the document already uses, and "is this container multiline" from
//! whether any of its direct children is already a `NEWLINE`. A freshly
//! synthesized `Object` value (one with no existing siblings to match) is
//! always laid out multiline, one property per line; a freshly
//! synthesized `Array` value is always laid out single-line. This mirrors
//! the asymmetry in how people actually write JSONC by hand — objects
//! one field per line, arrays of scalars inlined — and is the simplest
//! rule that reproduces `spec.md` §8's worked example.
//!
//! ## Attached / Detached
//!
//! A node produced by [`crate::parse`] is Attached. `remove()` and
//! `replace_with()` detach the old subtree; any further operation on a
//! handle to that now-orphaned subtree fails with
//! [`crate::error::StateError::detached`] rather than silently operating
//! on dead wood.

use crate::error::StateError;
use crate::escape::encode_string_literal;
use crate::synth;
use crate::syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
use crate::tree::{
    Array, CstNode, CstValue, Object, ObjectProperty, Root, significant_child,
    significant_child_after_colon,
};
use crate::value::{Value, format_number};
use rowan::NodeOrToken;

/// A value argument accepted by the mutation engine's `set_value`,
/// `append`, and `insert` operations: either a raw, already-well-formed
/// source fragment, or a host [`Value`] to synthesize from scratch.
/// `spec.md` §4.4 calls these out as the two value-argument kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueArg {
    Raw(String),
    Value(Value),
}

impl ValueArg {
    /// A raw token or fragment of source text, inserted verbatim.
    pub fn raw(source: impl Into<String>) -> Self {
        ValueArg::Raw(source.into())
    }
}

impl<T: Into<Value>> From<T> for ValueArg {
    fn from(value: T) -> Self {
        ValueArg::Value(value.into())
    }
}

fn ensure_attached(node: &SyntaxNode) -> Result<(), StateError> {
    if node.kind() != SyntaxKind::ROOT && node.parent().is_none() {
        Err(StateError::detached())
    } else {
        Ok(())
    }
}

fn element_index(e: &SyntaxElement) -> usize {
    match e {
        NodeOrToken::Node(n) => n.index(),
        NodeOrToken::Token(t) => t.index(),
    }
}

fn element_parent(e: &SyntaxElement) -> Option<SyntaxNode> {
    match e {
        NodeOrToken::Node(n) => n.parent(),
        NodeOrToken::Token(t) => t.parent(),
    }
}

fn root_of(node: &SyntaxNode) -> SyntaxNode {
    node.ancestors().last().expect("a node is always its own ancestor")
}

/// Number of `OBJECT`/`ARRAY` ancestors strictly above `container` (not
/// counting `container` itself). Used to compute the indentation depth of
/// whatever is placed *inside* `container`: that's always `depth + 1`.
fn container_depth(container: &SyntaxNode) -> usize {
    container
        .ancestors()
        .skip(1)
        .filter(|a| matches!(a.kind(), SyntaxKind::OBJECT | SyntaxKind::ARRAY))
        .count()
}

fn newline_kind_of(root: &SyntaxNode) -> &'static str {
    let has_crlf = root
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == SyntaxKind::NEWLINE && t.text() == "\r\n");
    if has_crlf { "\r\n" } else { "\n" }
}

/// The narrowest indentation width found immediately after a `NEWLINE`
/// anywhere in the document, or two spaces if the document has none.
fn single_indent_text(root: &SyntaxNode) -> String {
    let elements: Vec<SyntaxElement> = root.descendants_with_tokens().collect();
    let mut best: Option<usize> = None;
    for i in 0..elements.len() {
        let Some(tok) = elements[i].as_token() else { continue };
        if tok.kind() != SyntaxKind::NEWLINE {
            continue;
        }
        if let Some(next) = elements.get(i + 1).and_then(|e| e.as_token()) {
            if next.kind() == SyntaxKind::WHITESPACE {
                let len = next.text().len();
                if len > 0 {
                    best = Some(best.map_or(len, |b| b.min(len)));
                }
            }
        }
    }
    " ".repeat(best.unwrap_or(2))
}

fn is_multiline(container: &SyntaxNode) -> bool {
    container
        .children_with_tokens()
        .any(|e| e.as_token().map(|t| t.kind() == SyntaxKind::NEWLINE).unwrap_or(false))
}

fn closing_token(container: &SyntaxNode) -> SyntaxToken {
    container
        .children_with_tokens()
        .last()
        .and_then(|e| e.into_token())
        .expect("every OBJECT/ARRAY ends with its closing token")
}

fn token_immediately_before(container: &SyntaxNode, token: &SyntaxToken) -> Option<SyntaxToken> {
    let idx = token.index();
    if idx == 0 {
        return None;
    }
    container.children_with_tokens().nth(idx - 1).and_then(|e| e.into_token())
}

/// Render a host [`Value`] to source text, following the format-inference
/// rules described in the module doc comment. `depth` is the indentation
/// depth at which a freshly synthesized `Object`'s own properties should
/// sit (i.e. one deeper than wherever this value itself is being placed).
fn render_value(v: &Value, depth: usize, indent: &str, newline: &str) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => encode_string_literal(s),
        Value::Array(items) => {
            let rendered: Vec<String> =
                items.iter().map(|i| render_value(i, depth, indent, newline)).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Object(map) => {
            if map.is_empty() {
                return "{}".to_string();
            }
            let inner_indent = indent.repeat(depth + 1);
            let outer_indent = indent.repeat(depth);
            let mut body = String::new();
            for (i, (k, v)) in map.iter().enumerate() {
                body.push_str(newline);
                body.push_str(&inner_indent);
                body.push_str(&encode_string_literal(k));
                body.push_str(": ");
                body.push_str(&render_value(v, depth + 1, indent, newline));
                if i + 1 < map.len() {
                    body.push(',');
                }
            }
            format!("{{{body}{newline}{outer_indent}}}")
        }
    }
}

fn value_arg_to_text(arg: &ValueArg, depth: usize, indent: &str, newline: &str) -> String {
    match arg {
        ValueArg::Raw(s) => s.clone(),
        ValueArg::Value(v) => render_value(v, depth, indent, newline),
    }
}

fn value_arg_to_element(arg: &ValueArg, depth: usize, indent: &str, newline: &str) -> SyntaxElement {
    synth::synth_raw(&value_arg_to_text(arg, depth, indent, newline))
}

/// Wrap `key`/`value_text` in a throwaway object, parse it, and lift the
/// resulting `OBJECT_PROPERTY` node back out — the same parse-and-detach
/// technique `synth.rs` uses, specialized for a node kind the grammar
/// never parses on its own (a bare `name : value` isn't a `value`).
fn synth_object_property(key: &str, value_text: &str) -> SyntaxElement {
    let wrapped = format!("{{{}: {value_text}}}", encode_string_literal(key));
    let root = crate::parser::parse(&wrapped, crate::options::ParseOptions::permissive())
        .unwrap_or_else(|e| panic!("internal: synthesized property {wrapped:?} failed to parse: {e}"));
    let obj_element = significant_child(&root)
        .unwrap_or_else(|| panic!("internal: synthesized property {wrapped:?} has no object"));
    let NodeOrToken::Node(obj_node) = obj_element else {
        unreachable!("synthesized property wrapper always yields an OBJECT node")
    };
    let prop = obj_node
        .children()
        .find_map(ObjectProperty::cast)
        .expect("the wrapper object has exactly one property");
    prop.syntax().detach();
    NodeOrToken::Node(prop.syntax().clone())
}

/// Replace whichever element currently occupies a single-value slot
/// (`Root`'s value, or an `ObjectProperty`'s value) with `new_element`.
/// `existing` is `None` only when the slot is empty, in which case the
/// new element is simply appended as `parent`'s last child.
fn replace_slot(parent: &SyntaxNode, existing: Option<SyntaxElement>, new_element: SyntaxElement) {
    match existing {
        Some(old) => {
            let index = element_index(&old);
            parent.splice_children(index..index + 1, vec![new_element]);
        }
        None => {
            let index = parent.children_with_tokens().count();
            parent.splice_children(index..index, vec![new_element]);
        }
    }
}

/// Ensure the last significant child of `container` is immediately
/// followed by a `,` — inserting one if it isn't. No-op on an empty
/// container (nothing to separate a first element from).
fn ensure_trailing_comma(container: &SyntaxNode) {
    let Some(last) = container.children_with_tokens().filter(crate::tree::is_significant).last()
    else {
        return;
    };
    let idx = element_index(&last);
    let already_comma = container
        .children_with_tokens()
        .nth(idx + 1)
        .and_then(|e| e.into_token())
        .map(|t| t.kind() == SyntaxKind::COMMA)
        .unwrap_or(false);
    if !already_comma {
        container.splice_children(idx + 1..idx + 1, vec![synth::synth_comma()]);
    }
}

/// Append `new_node` to `container` (an `OBJECT` or `ARRAY`'s syntax
/// node) as its new last significant child, inserting a separating comma
/// after the previous last child if one isn't already there.
fn append_element(container: &SyntaxNode, new_node: SyntaxElement) {
    log::trace!("appending into {:?}, multiline={}", container.kind(), is_multiline(container));
    ensure_trailing_comma(container);
    let root = root_of(container);
    let newline = newline_kind_of(&root).to_string();
    let indent = single_indent_text(&root).repeat(container_depth(container) + 1);
    let had_content = container.children_with_tokens().any(|e| crate::tree::is_significant(&e));
    let close = closing_token(container);
    let close_index = close.index();
    let mut to_insert = Vec::new();
    if is_multiline(container) {
        if !token_immediately_before(container, &close)
            .map(|t| t.kind() == SyntaxKind::NEWLINE)
            .unwrap_or(false)
        {
            to_insert.push(synth::synth_newline(&newline));
        }
        to_insert.push(synth::synth_whitespace(&indent));
        to_insert.push(new_node);
        to_insert.push(synth::synth_newline(&newline));
    } else {
        // Reuse an existing pre-close gap as the separator, same as the
        // multiline branch reuses an existing pre-close newline — otherwise
        // `{ "a": 1 }` would grow a doubled space on append.
        let already_has_gap = token_immediately_before(container, &close)
            .map(|t| t.kind() == SyntaxKind::WHITESPACE)
            .unwrap_or(false);
        if had_content && !already_has_gap {
            to_insert.push(synth::synth_whitespace(" "));
        }
        to_insert.push(new_node);
    }
    container.splice_children(close_index..close_index, to_insert);
}

/// Insert `new_node` before the significant child currently at index
/// `sig_index` (0-based, among significant children only). `sig_index`
/// equal to the current element count behaves exactly like
/// [`append_element`].
fn insert_element(container: &SyntaxNode, sig_index: usize, new_node: SyntaxElement) {
    let significant: Vec<SyntaxElement> =
        container.children_with_tokens().filter(crate::tree::is_significant).collect();
    if sig_index >= significant.len() {
        append_element(container, new_node);
        return;
    }
    let target = &significant[sig_index];
    let insert_at = element_index(target);
    let root = root_of(container);
    let newline = newline_kind_of(&root).to_string();
    let indent = single_indent_text(&root).repeat(container_depth(container) + 1);
    let mut sequence = vec![new_node, synth::synth_comma()];
    if is_multiline(container) {
        sequence.push(synth::synth_newline(&newline));
        sequence.push(synth::synth_whitespace(&indent));
    } else {
        sequence.push(synth::synth_whitespace(" "));
    }
    container.splice_children(insert_at..insert_at, sequence);
}

/// Remove the significant child at `node_index` from `container`'s direct
/// children, along with its adjacent separator comma and the contiguous
/// trivia between it and that comma (up to and including one newline),
/// plus its own leading per-line indent. A same-line trailing comment is
/// removed with it; a comment on a following line, reached after that one
/// newline, is left untouched for the remaining neighbor.
fn remove_element(container: &SyntaxNode, node_index: usize) {
    log::trace!("removing child {node_index} from {:?}", container.kind());
    let children: Vec<SyntaxElement> = container.children_with_tokens().collect();

    // Forward: same-line trailing whitespace/comments, then (at most) one
    // following comma, then the newline that ends this element's line —
    // but only if a comma was actually found, i.e. a sibling follows. If
    // this is the last element, that newline belongs to the container's
    // closing line and must be preserved.
    let mut end = node_index + 1;
    let mut consumed_comma = false;
    while end < children.len() {
        match &children[end] {
            NodeOrToken::Token(t) if t.kind() == SyntaxKind::WHITESPACE => end += 1,
            NodeOrToken::Token(t)
                if t.kind() == SyntaxKind::LINE_COMMENT || t.kind() == SyntaxKind::BLOCK_COMMENT =>
            {
                end += 1;
            }
            NodeOrToken::Token(t) if t.kind() == SyntaxKind::COMMA && !consumed_comma => {
                consumed_comma = true;
                end += 1;
            }
            NodeOrToken::Token(t) if t.kind() == SyntaxKind::NEWLINE => {
                if consumed_comma {
                    end += 1;
                }
                break;
            }
            _ => break,
        }
    }

    // Backward: this element's own leading indent, if it's genuine
    // indentation (whitespace immediately preceded by a newline) rather
    // than an inline separator space before a single-line sibling.
    let mut start = node_index;
    if start >= 2 {
        let is_indent = matches!(&children[start - 1], NodeOrToken::Token(t) if t.kind() == SyntaxKind::WHITESPACE)
            && matches!(&children[start - 2], NodeOrToken::Token(t) if t.kind() == SyntaxKind::NEWLINE);
        if is_indent {
            start -= 1;
        }
    }
    if !consumed_comma {
        // Removing the last element: there's no following comma, so take
        // the one that used to separate it from its previous sibling,
        // skipping back over the newline and indent in between.
        let mut before = start;
        while before > 0 {
            before -= 1;
            match &children[before] {
                NodeOrToken::Token(t)
                    if t.kind() == SyntaxKind::WHITESPACE || t.kind() == SyntaxKind::NEWLINE =>
                {
                    continue
                }
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::COMMA => {
                    start = before;
                    break;
                }
                _ => break,
            }
        }
    }
    container.splice_children(start..end, vec![]);
}

/// Replace `self` itself with `new_element` in its current parent,
/// detaching the old subtree. Shared by every `replace_with`/force-coerce
/// operation so there's exactly one place that knows how to swap a node
/// in place.
fn replace_self(old: &SyntaxElement, new_element: SyntaxElement) -> Result<(), StateError> {
    let parent = element_parent(old).ok_or_else(StateError::detached)?;
    let index = element_index(old);
    parent.splice_children(index..index + 1, vec![new_element]);
    Ok(())
}

fn force_container(element: &SyntaxElement, want_object: bool) -> Result<SyntaxElement, StateError> {
    let already_right_kind = match element {
        NodeOrToken::Node(n) => {
            (want_object && n.kind() == SyntaxKind::OBJECT)
                || (!want_object && n.kind() == SyntaxKind::ARRAY)
        }
        NodeOrToken::Token(_) => false,
    };
    if already_right_kind {
        return Ok(element.clone());
    }
    log::debug!(
        "force-coercing a value to {}",
        if want_object { "object" } else { "array" }
    );
    let fresh = if want_object { synth::synth_empty_object() } else { synth::synth_empty_array() };
    replace_self(element, fresh.clone())?;
    Ok(fresh)
}

impl Root {
    /// Replace the document's value (or set one, if the document was
    /// empty) with `value`.
    pub fn set_value(&self, value: impl Into<ValueArg>) -> Result<(), StateError> {
        ensure_attached(self.syntax())?;
        let root = self.syntax();
        let newline = newline_kind_of(root).to_string();
        let indent = single_indent_text(root);
        let existing = significant_child(root);
        let new_element = value_arg_to_element(&value.into(), 1, &indent, &newline);
        replace_slot(root, existing, new_element);
        Ok(())
    }

    /// Remove every child, leaving a syntactically empty document.
    pub fn clear_children(&self) -> Result<(), StateError> {
        ensure_attached(self.syntax())?;
        let len = self.syntax().children_with_tokens().count();
        self.syntax().splice_children(0..len, vec![]);
        Ok(())
    }

    pub fn as_object_or_force(&self) -> Result<Object, StateError> {
        ensure_attached(self.syntax())?;
        coerce_slot_kind(self.syntax(), significant_child(self.syntax()), true)
            .map(|e| Object::cast(e.into_node().expect("force_container(true) yields a node")).expect("OBJECT"))
    }

    pub fn as_array_or_force(&self) -> Result<Array, StateError> {
        ensure_attached(self.syntax())?;
        coerce_slot_kind(self.syntax(), significant_child(self.syntax()), false)
            .map(|e| Array::cast(e.into_node().expect("force_container(false) yields a node")).expect("ARRAY"))
    }
}

/// Like [`force_container`], but for a "slot" (`Root`'s value, or an
/// `ObjectProperty`'s value) that may currently be empty rather than
/// always holding an existing element.
fn coerce_slot_kind(
    parent: &SyntaxNode,
    existing: Option<SyntaxElement>,
    want_object: bool,
) -> Result<SyntaxElement, StateError> {
    if let Some(e) = &existing {
        if let NodeOrToken::Node(n) = e {
            if (want_object && n.kind() == SyntaxKind::OBJECT)
                || (!want_object && n.kind() == SyntaxKind::ARRAY)
            {
                return Ok(e.clone());
            }
        }
    }
    let fresh = if want_object { synth::synth_empty_object() } else { synth::synth_empty_array() };
    replace_slot(parent, existing, fresh.clone());
    Ok(fresh)
}

impl Object {
    /// Append a new property at the end.
    pub fn append(&self, key: &str, value: impl Into<ValueArg>) -> Result<(), StateError> {
        ensure_attached(self.syntax())?;
        let root = root_of(self.syntax());
        let newline = newline_kind_of(&root).to_string();
        let indent = single_indent_text(&root);
        let depth = container_depth(self.syntax()) + 1;
        let value_text = value_arg_to_text(&value.into(), depth, &indent, &newline);
        let prop = synth_object_property(key, &value_text);
        append_element(self.syntax(), prop);
        Ok(())
    }

    /// Insert a new property before the property currently at `index`.
    /// An out-of-range `index` appends, like [`Object::append`].
    pub fn insert(&self, index: usize, key: &str, value: impl Into<ValueArg>) -> Result<(), StateError> {
        ensure_attached(self.syntax())?;
        let root = root_of(self.syntax());
        let newline = newline_kind_of(&root).to_string();
        let indent = single_indent_text(&root);
        let depth = container_depth(self.syntax()) + 1;
        let value_text = value_arg_to_text(&value.into(), depth, &indent, &newline);
        let prop = synth_object_property(key, &value_text);
        insert_element(self.syntax(), index, prop);
        Ok(())
    }

    pub fn get_or_force(&self, key: &str) -> Result<CstValue, StateError> {
        match self.get(key) {
            Some(v) => Ok(v),
            None => {
                self.append(key, ValueArg::raw("null"))?;
                Ok(self
                    .get(key)
                    .expect("the property we just appended is now present")
                    .clone())
            }
        }
    }

    pub fn get_if_object_or_force(&self, key: &str) -> Result<Object, StateError> {
        let prop = self.property_or_create(key)?;
        prop.value_if_object_or_force()
    }

    pub fn get_if_array_or_force(&self, key: &str) -> Result<Array, StateError> {
        let prop = self.property_or_create(key)?;
        prop.value_if_array_or_force()
    }

    /// Remove the property named `key`, if present — a convenience
    /// wrapper around [`ObjectProperty::remove`], since "find by key,
    /// then remove" is the overwhelmingly common call pattern a
    /// config-rewriting host actually performs.
    pub fn remove(&self, key: &str) -> Result<(), StateError> {
        ensure_attached(self.syntax())?;
        let prop = self
            .properties()
            .find(|p| p.name().is_some_and(|n| n.decoded_value() == key))
            .ok_or_else(|| StateError(format!("no property named {key:?}")))?;
        prop.remove()
    }

    fn property_or_create(&self, key: &str) -> Result<ObjectProperty, StateError> {
        if let Some(p) = self.properties().find(|p| p.name().is_some_and(|n| n.decoded_value() == key)) {
            return Ok(p);
        }
        self.append(key, ValueArg::raw("null"))?;
        Ok(self
            .properties()
            .find(|p| p.name().is_some_and(|n| n.decoded_value() == key))
            .expect("the property we just appended is now present"))
    }
}

impl Array {
    pub fn append(&self, value: impl Into<ValueArg>) -> Result<(), StateError> {
        ensure_attached(self.syntax())?;
        let root = root_of(self.syntax());
        let newline = newline_kind_of(&root).to_string();
        let indent = single_indent_text(&root);
        let depth = container_depth(self.syntax()) + 1;
        let element = value_arg_to_element(&value.into(), depth, &indent, &newline);
        append_element(self.syntax(), element);
        Ok(())
    }

    pub fn insert(&self, index: usize, value: impl Into<ValueArg>) -> Result<(), StateError> {
        ensure_attached(self.syntax())?;
        let root = root_of(self.syntax());
        let newline = newline_kind_of(&root).to_string();
        let indent = single_indent_text(&root);
        let depth = container_depth(self.syntax()) + 1;
        let element = value_arg_to_element(&value.into(), depth, &indent, &newline);
        insert_element(self.syntax(), index, element);
        Ok(())
    }

    /// Remove the element at `index`, with its comma/trivia, per
    /// `spec.md` §4.4's comma discipline on remove.
    pub fn remove(&self, index: usize) -> Result<(), StateError> {
        ensure_attached(self.syntax())?;
        let significant: Vec<SyntaxElement> =
            self.syntax().children_with_tokens().filter(crate::tree::is_significant).collect();
        let target = significant.get(index).ok_or_else(|| {
            StateError("index out of range".to_string())
        })?;
        remove_element(self.syntax(), element_index(target));
        Ok(())
    }

    /// Toggle whether this array's separators include a trailing comma
    /// after the final element (only meaningful when multiline — a
    /// single-line array is left untouched).
    pub fn set_trailing_commas(&self, wanted: bool) -> Result<(), StateError> {
        ensure_attached(self.syntax())?;
        let Some(last) =
            self.syntax().children_with_tokens().filter(crate::tree::is_significant).last()
        else {
            return Ok(());
        };
        let idx = element_index(&last);
        let next_is_comma = self
            .syntax()
            .children_with_tokens()
            .nth(idx + 1)
            .and_then(|e| e.into_token())
            .map(|t| t.kind() == SyntaxKind::COMMA)
            .unwrap_or(false);
        if wanted && !next_is_comma {
            self.syntax().splice_children(idx + 1..idx + 1, vec![synth::synth_comma()]);
        } else if !wanted && next_is_comma {
            self.syntax().splice_children(idx + 1..idx + 2, vec![]);
        }
        Ok(())
    }

    /// Reformat this array onto multiple lines (one element per line) if
    /// it is currently single-line. A no-op if already multiline.
    pub fn ensure_multiline(&self) -> Result<(), StateError> {
        ensure_attached(self.syntax())?;
        if is_multiline(self.syntax()) {
            return Ok(());
        }
        let root = root_of(self.syntax());
        let newline = newline_kind_of(&root).to_string();
        let indent = single_indent_text(&root).repeat(container_depth(self.syntax()) + 1);
        let outer_indent = single_indent_text(&root).repeat(container_depth(self.syntax()));
        let open_index = self
            .syntax()
            .children_with_tokens()
            .next()
            .map(|e| element_index(&e))
            .expect("ARRAY always has an opening bracket");
        let close = closing_token(self.syntax());
        let mut rebuilt = vec![synth::synth_newline(&newline)];
        let mut first = true;
        for element in self.syntax().children_with_tokens().filter(crate::tree::is_significant) {
            if !first {
                rebuilt.push(synth::synth_comma());
                rebuilt.push(synth::synth_newline(&newline));
            }
            first = false;
            rebuilt.push(synth::synth_whitespace(&indent));
            rebuilt.push(element);
        }
        rebuilt.push(synth::synth_newline(&newline));
        rebuilt.push(synth::synth_whitespace(&outer_indent));
        self.syntax().splice_children(open_index + 1..close.index(), rebuilt);
        Ok(())
    }
}

impl ObjectProperty {
    /// Replace this property's value.
    pub fn set_value(&self, value: impl Into<ValueArg>) -> Result<(), StateError> {
        ensure_attached(self.syntax())?;
        let parent_depth_node =
            self.parent_object().map(|o| o.syntax().clone()).unwrap_or_else(|| self.syntax().clone());
        let root = root_of(self.syntax());
        let newline = newline_kind_of(&root).to_string();
        let indent = single_indent_text(&root);
        let depth = container_depth(&parent_depth_node) + 1;
        let existing = significant_child_after_colon(self.syntax());
        let new_element = value_arg_to_element(&value.into(), depth, &indent, &newline);
        replace_slot(self.syntax(), existing, new_element);
        Ok(())
    }

    /// Remove this property entirely from its parent object.
    pub fn remove(&self) -> Result<(), StateError> {
        ensure_attached(self.syntax())?;
        let parent = self.syntax().parent().ok_or_else(StateError::detached)?;
        remove_element(&parent, self.syntax().index());
        Ok(())
    }

    pub fn value_if_object_or_force(&self) -> Result<Object, StateError> {
        ensure_attached(self.syntax())?;
        coerce_slot_kind(self.syntax(), significant_child_after_colon(self.syntax()), true)
            .map(|e| Object::cast(e.into_node().expect("OBJECT")).expect("OBJECT"))
    }

    pub fn value_if_array_or_force(&self) -> Result<Array, StateError> {
        ensure_attached(self.syntax())?;
        coerce_slot_kind(self.syntax(), significant_child_after_colon(self.syntax()), false)
            .map(|e| Array::cast(e.into_node().expect("ARRAY")).expect("ARRAY"))
    }
}

impl CstValue {
    /// Replace this value in place with `value`, wherever it currently
    /// sits (an array element, a property value, or the root value).
    pub fn replace_with(&self, value: impl Into<ValueArg>) -> Result<(), StateError> {
        let element = self.syntax();
        let parent = element_parent(&element).ok_or_else(StateError::detached)?;
        let depth = container_depth(&parent) + 1;
        let root = root_of(&parent);
        let newline = newline_kind_of(&root).to_string();
        let indent = single_indent_text(&root);
        let new_element = value_arg_to_element(&value.into(), depth, &indent, &newline);
        replace_self(&element, new_element)
    }

    /// Remove this value from its parent array. Only meaningful for an
    /// array element — removing an object property's value is done via
    /// [`ObjectProperty::remove`] (which removes the whole property).
    pub fn remove(&self) -> Result<(), StateError> {
        let element = self.syntax();
        let parent = element_parent(&element).ok_or_else(StateError::detached)?;
        if parent.kind() != SyntaxKind::ARRAY {
            return Err(StateError("value is not an array element".to_string()));
        }
        remove_element(&parent, element_index(&element));
        Ok(())
    }

    /// Coerce this value to an object in place, if it isn't one already.
    pub fn as_object_or_force(&self) -> Result<Object, StateError> {
        let element = force_container(&self.syntax(), true)?;
        Ok(Object::cast(element.into_node().expect("force_container(true) yields a node")).expect("OBJECT"))
    }

    /// Coerce this value to an array in place, if it isn't one already.
    pub fn as_array_or_force(&self) -> Result<Array, StateError> {
        let element = force_container(&self.syntax(), false)?;
        Ok(Array::cast(element.into_node().expect("force_container(false) yields a node")).expect("ARRAY"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn root(src: &str) -> Root {
        Root::cast(parse(src, ParseOptions::permissive()).unwrap()).unwrap()
    }

    #[test]
    fn set_value_replaces_scalar() {
        let r = root(r#"{"a": 1}"#);
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        let prop = obj.properties().next().unwrap();
        prop.set_value(true).unwrap();
        assert_eq!(r.syntax().text().to_string(), r#"{"a": true}"#);
    }

    #[test]
    fn append_to_single_line_array() {
        let r = root("[1, 2]");
        let arr = r.value().unwrap().as_array_or_throw().unwrap().clone();
        arr.append(3.0).unwrap();
        assert_eq!(r.syntax().text().to_string(), "[1, 2, 3]");
    }

    #[test]
    fn append_to_multiline_object_preserves_comments() {
        let src = "{\n  // 1\n  \"data\" /* 2 */: 123 // 3\n} // 4";
        let r = root(src);
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        let data = obj.properties().next().unwrap();

        let mut nested = indexmap::IndexMap::new();
        nested.insert("nested".to_string(), Value::Bool(true));
        data.set_value(Value::Object(nested)).unwrap();

        obj.append("new_key", Value::Array(vec![456.0.into(), 789.0.into(), false.into()])).unwrap();

        let text = r.syntax().text().to_string();
        assert!(text.contains("\"nested\": true"));
        assert!(text.contains("}, // 3"));
        assert!(text.contains("\"new_key\": [456, 789, false]"));
        assert!(text.ends_with("} // 4"));
    }

    #[test]
    fn remove_middle_element() {
        let r = root("[1, 2, 3]");
        let arr = r.value().unwrap().as_array_or_throw().unwrap().clone();
        arr.remove(1).unwrap();
        assert_eq!(r.syntax().text().to_string(), "[1, 3]");
    }

    #[test]
    fn remove_last_element() {
        let r = root("[1, 2, 3]");
        let arr = r.value().unwrap().as_array_or_throw().unwrap().clone();
        arr.remove(2).unwrap();
        assert_eq!(r.syntax().text().to_string(), "[1, 2]");
    }

    #[test]
    fn remove_property_via_object_property() {
        let r = root(r#"{"a": 1, "b": 2}"#);
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        let a = obj.properties().next().unwrap();
        a.remove().unwrap();
        assert_eq!(r.syntax().text().to_string(), r#"{"b": 2}"#);
    }

    #[test]
    fn object_remove_by_key() {
        let r = root(r#"{"a": 1, "b": 2}"#);
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        obj.remove("a").unwrap();
        assert_eq!(r.syntax().text().to_string(), r#"{"b": 2}"#);
    }

    #[test]
    fn object_remove_unknown_key_errors() {
        let r = root(r#"{"a": 1}"#);
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        assert!(obj.remove("missing").is_err());
    }

    #[test]
    fn remove_first_element_multiline() {
        let r = root("[\n  1,\n  2,\n  3\n]");
        let arr = r.value().unwrap().as_array_or_throw().unwrap().clone();
        arr.remove(0).unwrap();
        assert_eq!(r.syntax().text().to_string(), "[\n  2,\n  3\n]");
    }

    #[test]
    fn remove_middle_element_multiline() {
        let r = root("{\n  \"a\": 1,\n  \"b\": 2,\n  \"c\": 3\n}");
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        obj.remove("b").unwrap();
        assert_eq!(r.syntax().text().to_string(), "{\n  \"a\": 1,\n  \"c\": 3\n}");
    }

    #[test]
    fn remove_last_element_multiline() {
        let r = root("[\n  1,\n  2,\n  3\n]");
        let arr = r.value().unwrap().as_array_or_throw().unwrap().clone();
        arr.remove(2).unwrap();
        assert_eq!(r.syntax().text().to_string(), "[\n  1,\n  2\n]");
    }

    #[test]
    fn remove_middle_element_multiline_with_trailing_comment() {
        let r = root("{\n  \"a\": 1,\n  \"b\": 2, // note\n  \"c\": 3\n}");
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        obj.remove("b").unwrap();
        assert_eq!(r.syntax().text().to_string(), "{\n  \"a\": 1,\n  \"c\": 3\n}");
    }

    #[test]
    fn remove_first_element_multiline_preserves_comment_on_next_line() {
        let r = root("{\n  \"a\": 1,\n  // keep me\n  \"b\": 2\n}");
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        obj.remove("a").unwrap();
        assert_eq!(
            r.syntax().text().to_string(),
            "{\n  // keep me\n  \"b\": 2\n}"
        );
    }

    #[test]
    fn force_scalar_to_object() {
        let r = root(r#"{"a": 1}"#);
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        let a = obj.get("a").unwrap();
        let forced = a.as_object_or_force().unwrap();
        assert_eq!(forced.properties().count(), 0);
        assert_eq!(r.syntax().text().to_string(), r#"{"a": {}}"#);
    }

    #[test]
    fn detached_property_rejects_further_mutation() {
        let r = root(r#"{"a": 1, "b": 2}"#);
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        let a = obj.properties().next().unwrap();
        a.remove().unwrap();
        assert!(a.set_value(true).is_err());
    }

    #[test]
    fn set_trailing_commas_on_multiline_array() {
        let r = root("[\n  1,\n  2\n]");
        let arr = r.value().unwrap().as_array_or_throw().unwrap().clone();
        arr.set_trailing_commas(true).unwrap();
        assert_eq!(r.syntax().text().to_string(), "[\n  1,\n  2,\n]");
        arr.set_trailing_commas(false).unwrap();
        assert_eq!(r.syntax().text().to_string(), "[\n  1,\n  2\n]");
    }

    #[test]
    fn ensure_multiline_reformats_single_line_array() {
        let r = root("[1, 2, 3]");
        let arr = r.value().unwrap().as_array_or_throw().unwrap().clone();
        arr.ensure_multiline().unwrap();
        assert_eq!(r.syntax().text().to_string(), "[\n  1,\n  2,\n  3\n]");
    }

    #[test]
    fn object_get_or_force_creates_missing_property() {
        let r = root("{}");
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        let v = obj.get_if_array_or_force("items").unwrap();
        v.append(1.0).unwrap();
        assert_eq!(r.syntax().text().to_string(), r#"{"items": [1]}"#);
    }

    #[test]
    fn root_clear_children_empties_document() {
        let r = root(r#"{"a": 1}"#);
        r.clear_children().unwrap();
        assert_eq!(r.syntax().text().to_string(), "");
    }
}
