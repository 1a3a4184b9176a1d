//! # Typed tree — navigation over the CST
//!
//! Thin, zero-cost typed wrappers over [`SyntaxNode`]/[`SyntaxToken`],
//! following the `can_cast`/`cast`/`syntax()` pattern used by rowan-based
//! parsers across the ecosystem (rust-analyzer's `ast` module, apollo-rs'
//! `cst` module). Every wrapper is a newtype that can be cheaply recovered
//! from, or converted back to, the untyped cursor — a host that wants to
//! walk the tree generically (a linter, a pretty-printer) always has that
//! escape hatch via [`CstNode::syntax`].
//!
//! This module is read-only: `value()`, `properties()`, `elements()`,
//! `get()` and friends, and sibling/parent/root walks. Anything that
//! changes the tree — `append`, `insert`, `remove`, `replace_with`, the
//! `_or_force` coercions — lives in `mutation.rs`.

use crate::error::TypeError;
use crate::escape::decode_string_escapes;
use crate::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};
use rowan::NodeOrToken;

/// A typed wrapper over a [`SyntaxNode`] or [`SyntaxToken`] of one specific
/// kind (or a small fixed set of kinds, for enums like [`CstValue`]).
pub trait CstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    /// Walk up to the enclosing [`Root`]'s underlying node.
    fn root(&self) -> SyntaxNode {
        self.syntax().ancestors().last().expect("a node is always its own ancestor")
    }
}

macro_rules! cst_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl CstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                Self::can_cast(node.kind()).then(|| Self(node))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

cst_node!(Root, ROOT);
cst_node!(Object, OBJECT);
cst_node!(Array, ARRAY);
cst_node!(ObjectProperty, OBJECT_PROPERTY);

/// A typed wrapper over a value-leaf [`SyntaxToken`]: string, number,
/// boolean, null, or bare word.
pub trait CstToken: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(token: SyntaxToken) -> Option<Self>;
    fn syntax(&self) -> &SyntaxToken;
}

macro_rules! cst_token {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxToken);

        impl CstToken for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(token: SyntaxToken) -> Option<Self> {
                Self::can_cast(token.kind()).then(|| Self(token))
            }

            fn syntax(&self) -> &SyntaxToken {
                &self.0
            }
        }
    };
}

cst_token!(StringLit, STRING);
cst_token!(NumberLit, NUMBER);
cst_token!(BooleanLit, BOOLEAN);
cst_token!(NullKeyword, NULL_KW);
cst_token!(WordLit, WORD);

impl StringLit {
    /// The unescaped string content (quotes stripped, `\n`/`\t`/`\uXXXX`/etc.
    /// decoded). Decoding is lazy — the scanner keeps raw escapes in `text`.
    pub fn decoded_value(&self) -> String {
        decode_string_escapes(self.0.text())
    }
}

impl NumberLit {
    /// The literal's exact source text — never a parsed binary number, so
    /// callers keep full precision and original formatting. See
    /// [`crate::value::to_value`] for the lossy double conversion.
    pub fn number_value(&self) -> &str {
        // SAFETY-free: token text borrows from the green tree, which this
        // crate always hands out in mutable-cursor form with a stable
        // lifetime tied to the token itself via rowan's own API.
        self.syntax().text()
    }
}

impl BooleanLit {
    pub fn value(&self) -> bool {
        self.syntax().text() == "true"
    }
}

impl WordLit {
    /// A bare word has no escapes; its decoded value is its literal text.
    pub fn decoded_value(&self) -> &str {
        self.syntax().text()
    }
}

/// The name of an [`ObjectProperty`]: a string literal, or — under
/// `allow_loose_object_property_names` — a bare word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyName {
    String(StringLit),
    Word(WordLit),
}

impl PropertyName {
    pub fn decoded_value(&self) -> String {
        match self {
            PropertyName::String(s) => s.decoded_value(),
            PropertyName::Word(w) => w.decoded_value().to_string(),
        }
    }

    fn cast(token: SyntaxToken) -> Option<Self> {
        StringLit::cast(token.clone())
            .map(PropertyName::String)
            .or_else(|| WordLit::cast(token).map(PropertyName::Word))
    }
}

/// The single significant value a [`Root`] or [`ObjectProperty`] carries:
/// a container (`Object`/`Array`) or a value-leaf token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CstValue {
    Object(Object),
    Array(Array),
    String(StringLit),
    Number(NumberLit),
    Boolean(BooleanLit),
    Null(NullKeyword),
}

impl CstValue {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            CstValue::Object(_) => SyntaxKind::OBJECT,
            CstValue::Array(_) => SyntaxKind::ARRAY,
            CstValue::String(_) => SyntaxKind::STRING,
            CstValue::Number(_) => SyntaxKind::NUMBER,
            CstValue::Boolean(_) => SyntaxKind::BOOLEAN,
            CstValue::Null(_) => SyntaxKind::NULL_KW,
        }
    }

    /// The untyped element this value wraps, as a `SyntaxNode` or
    /// `SyntaxToken`.
    pub fn syntax(&self) -> rowan::SyntaxElement<crate::syntax_kind::JsoncLang> {
        match self {
            CstValue::Object(o) => NodeOrToken::Node(o.syntax().clone()),
            CstValue::Array(a) => NodeOrToken::Node(a.syntax().clone()),
            CstValue::String(s) => NodeOrToken::Token(s.syntax().clone()),
            CstValue::Number(n) => NodeOrToken::Token(n.syntax().clone()),
            CstValue::Boolean(b) => NodeOrToken::Token(b.syntax().clone()),
            CstValue::Null(n) => NodeOrToken::Token(n.syntax().clone()),
        }
    }

    fn cast(element: SyntaxElement) -> Option<Self> {
        match element {
            NodeOrToken::Node(n) => match n.kind() {
                SyntaxKind::OBJECT => Some(CstValue::Object(Object::cast(n)?)),
                SyntaxKind::ARRAY => Some(CstValue::Array(Array::cast(n)?)),
                _ => None,
            },
            NodeOrToken::Token(t) => match t.kind() {
                SyntaxKind::STRING => Some(CstValue::String(StringLit::cast(t)?)),
                SyntaxKind::NUMBER => Some(CstValue::Number(NumberLit::cast(t)?)),
                SyntaxKind::BOOLEAN => Some(CstValue::Boolean(BooleanLit::cast(t)?)),
                SyntaxKind::NULL_KW => Some(CstValue::Null(NullKeyword::cast(t)?)),
                _ => None,
            },
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            CstValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_or_throw(&self) -> Result<&Object, TypeError> {
        self.as_object()
            .ok_or_else(|| TypeError::wrong_kind("object", self.kind()))
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            CstValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_or_throw(&self) -> Result<&Array, TypeError> {
        self.as_array()
            .ok_or_else(|| TypeError::wrong_kind("array", self.kind()))
    }

    pub fn as_string(&self) -> Option<&StringLit> {
        match self {
            CstValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_string_or_throw(&self) -> Result<&StringLit, TypeError> {
        self.as_string()
            .ok_or_else(|| TypeError::wrong_kind("string", self.kind()))
    }

    pub fn as_number(&self) -> Option<&NumberLit> {
        match self {
            CstValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_number_or_throw(&self) -> Result<&NumberLit, TypeError> {
        self.as_number()
            .ok_or_else(|| TypeError::wrong_kind("number", self.kind()))
    }

    pub fn as_boolean(&self) -> Option<&BooleanLit> {
        match self {
            CstValue::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_boolean_or_throw(&self) -> Result<&BooleanLit, TypeError> {
        self.as_boolean()
            .ok_or_else(|| TypeError::wrong_kind("boolean", self.kind()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CstValue::Null(_))
    }
}

type SyntaxElement = rowan::SyntaxElement<crate::syntax_kind::JsoncLang>;

/// The first significant (non-trivia, non-punctuation) child of `node`,
/// whatever container or token it is.
pub(crate) fn significant_child(node: &SyntaxNode) -> Option<SyntaxElement> {
    node.children_with_tokens().find(is_significant)
}

/// The first significant child of `node` that appears strictly after the
/// first `COLON` token — used by [`ObjectProperty::value`] to skip past
/// the name (which, as a `STRING` or `WORD` token, is itself
/// "significant" by this same test).
pub(crate) fn significant_child_after_colon(node: &SyntaxNode) -> Option<SyntaxElement> {
    let mut seen_colon = false;
    for element in node.children_with_tokens() {
        if !seen_colon {
            if let NodeOrToken::Token(t) = &element {
                if t.kind() == SyntaxKind::COLON {
                    seen_colon = true;
                }
            }
            continue;
        }
        if is_significant(&element) {
            return Some(element);
        }
    }
    None
}

pub(crate) fn is_significant(element: &SyntaxElement) -> bool {
    match element {
        NodeOrToken::Node(n) => matches!(n.kind(), SyntaxKind::OBJECT | SyntaxKind::ARRAY),
        NodeOrToken::Token(t) => t.kind().is_value_leaf(),
    }
}

impl Root {
    /// The document's single significant value, if any (`root = value?`
    /// means an empty or trivia-only document has none).
    pub fn value(&self) -> Option<CstValue> {
        significant_child(self.syntax()).and_then(CstValue::cast)
    }

    pub fn value_or_throw(&self) -> Result<CstValue, TypeError> {
        self.value().ok_or_else(TypeError::no_value)
    }
}

impl Object {
    /// The ordered sequence of `ObjectProperty` children.
    pub fn properties(&self) -> impl Iterator<Item = ObjectProperty> {
        self.syntax().children().filter_map(ObjectProperty::cast)
    }

    fn property(&self, key: &str) -> Option<ObjectProperty> {
        self.properties()
            .find(|p| p.name().is_some_and(|n| n.decoded_value() == key))
    }

    /// The value of the first property named `key`, quietly returning
    /// `None` if there is no such property or it has no value.
    pub fn get(&self, key: &str) -> Option<CstValue> {
        self.property(key).and_then(|p| p.value())
    }

    pub fn get_or_throw(&self, key: &str) -> Result<CstValue, TypeError> {
        self.get(key)
            .ok_or_else(|| TypeError::missing_property(key))
    }

    pub fn get_if_object(&self, key: &str) -> Option<Object> {
        self.get(key).and_then(|v| match v {
            CstValue::Object(o) => Some(o),
            _ => None,
        })
    }

    pub fn get_if_object_or_throw(&self, key: &str) -> Result<Object, TypeError> {
        match self.get_or_throw(key)? {
            CstValue::Object(o) => Ok(o),
            other => Err(TypeError::wrong_kind("object", other.kind())),
        }
    }

    pub fn get_if_array(&self, key: &str) -> Option<Array> {
        self.get(key).and_then(|v| match v {
            CstValue::Array(a) => Some(a),
            _ => None,
        })
    }

    pub fn get_if_array_or_throw(&self, key: &str) -> Result<Array, TypeError> {
        match self.get_or_throw(key)? {
            CstValue::Array(a) => Ok(a),
            other => Err(TypeError::wrong_kind("array", other.kind())),
        }
    }
}

impl Array {
    /// The ordered sequence of significant value children (commas and
    /// trivia skipped).
    pub fn elements(&self) -> impl Iterator<Item = CstValue> {
        self.syntax()
            .children_with_tokens()
            .filter(is_significant)
            .filter_map(CstValue::cast)
    }
}

impl ObjectProperty {
    pub fn name(&self) -> Option<PropertyName> {
        self.syntax()
            .children_with_tokens()
            .find_map(|e| e.into_token().and_then(PropertyName::cast))
    }

    pub fn name_or_throw(&self) -> Result<PropertyName, TypeError> {
        self.name().ok_or_else(TypeError::no_value)
    }

    /// The property's value, the first significant child after the `:`.
    pub fn value(&self) -> Option<CstValue> {
        significant_child_after_colon(self.syntax()).and_then(CstValue::cast)
    }

    pub fn value_or_throw(&self) -> Result<CstValue, TypeError> {
        self.value().ok_or_else(TypeError::no_value)
    }

    pub fn value_if_object(&self) -> Option<Object> {
        self.value().and_then(|v| v.as_object().cloned())
    }

    pub fn value_if_array(&self) -> Option<Array> {
        self.value().and_then(|v| v.as_array().cloned())
    }

    /// The `Object` this property sits inside, if attached.
    pub fn parent_object(&self) -> Option<Object> {
        self.syntax().parent().and_then(Object::cast)
    }

    /// The next sibling property of the same `Object`, skipping trivia and
    /// the separating comma — rowan's `next_sibling()` already only
    /// considers node children, and `OBJECT`'s only node children are
    /// `OBJECT_PROPERTY`, so this needs no extra filtering.
    pub fn next_property(&self) -> Option<ObjectProperty> {
        self.syntax().next_sibling().and_then(ObjectProperty::cast)
    }

    pub fn previous_property(&self) -> Option<ObjectProperty> {
        self.syntax().prev_sibling().and_then(ObjectProperty::cast)
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
    fn root_value_of_object() {
        let r = root(r#"{"a": 1}"#);
        assert!(matches!(r.value(), Some(CstValue::Object(_))));
    }

    #[test]
    fn empty_root_has_no_value() {
        let r = root("");
        assert!(r.value().is_none());
        assert!(r.value_or_throw().is_err());
    }

    #[test]
    fn object_get_and_properties() {
        let r = root(r#"{"a": 1, "b": [2, 3]}"#);
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        assert_eq!(obj.properties().count(), 2);
        let a = obj.get("a").unwrap();
        assert_eq!(a.as_number().unwrap().number_value(), "1");
        let b = obj.get_if_array("b").unwrap();
        assert_eq!(b.elements().count(), 2);
        assert!(obj.get("missing").is_none());
    }

    #[test]
    fn property_name_decoding() {
        let r = root(r#"{"a\tb": 1}"#);
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        let prop = obj.properties().next().unwrap();
        assert_eq!(prop.name().unwrap().decoded_value(), "a\tb");
    }

    #[test]
    fn word_property_name() {
        let r = root("{ a: 1 }");
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        let prop = obj.properties().next().unwrap();
        assert!(matches!(prop.name(), Some(PropertyName::Word(_))));
    }

    #[test]
    fn sibling_walks() {
        let r = root(r#"{"a": 1, "b": 2, "c": 3}"#);
        let obj = r.value().unwrap().as_object_or_throw().unwrap().clone();
        let b = obj.properties().nth(1).unwrap();
        assert_eq!(
            b.previous_property().unwrap().name().unwrap().decoded_value(),
            "a"
        );
        assert_eq!(
            b.next_property().unwrap().name().unwrap().decoded_value(),
            "c"
        );
    }

    #[test]
    fn wrong_kind_access_is_a_type_error() {
        let r = root("1");
        let err = r.value().unwrap().as_object_or_throw().unwrap_err();
        assert!(err.0.contains("object"));
    }
}
