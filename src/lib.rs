//! # jsonc-cst
//!
//! A lossless JSONC (JSON-with-Comments) concrete syntax tree using
//! [Rowan], following the [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## What is a Lossless CST?
//!
//! Unlike an Abstract Syntax Tree (AST) which discards formatting details, a
//! Concrete Syntax Tree (CST) preserves **every byte** of the original source:
//! whitespace, comments, trailing commas, quote style — everything. This
//! enables:
//!
//! - **Structural editing**: modify the tree and serialize back to text
//!   without disturbing untouched formatting
//! - **Accurate error reporting**: span information maps exactly to source
//!   positions
//! - **Config-file-friendly round-tripping**: load a `.jsonc` file, change
//!   one field, write it back, and the diff is exactly that one field
//!
//! ## Architecture Overview
//!
//! The parsing pipeline has three stages:
//!
//! ```text
//! Source Text → Scanner → Tokens → Parser → Events → Sink → Rowan Tree
//!               (hand-written)     (Grammar)         (GreenNodeBuilder)
//! ```
//!
//! ### 1. Scanner ([`scanner`] module)
//!
//! A hand-written, validating tokenizer. Unlike a permissive lexer, it
//! rejects malformed escapes, unterminated strings/comments, and malformed
//! numbers outright — every byte still ends up in exactly one token, but an
//! invalid one is a [`error::SyntaxError`], not a best-effort `TEXT` token.
//!
//! ```text
//! "{ \"a\": 1 }" → [L_BRACE, WHITESPACE, STRING, COLON, WHITESPACE, NUMBER, WHITESPACE, R_BRACE]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The parser consumes tokens and emits **events** (Start, Token, Finish),
//! using a **marker system** that makes it a compile-time error to leave a
//! half-built node lying around. Unlike an error-tolerant grammar, JSONC's
//! grammar rules are fallible: the first violation aborts the parse.
//! Whether a given extension (comments, trailing commas, single-quoted
//! strings, ...) is accepted is decided entirely by [`ParseOptions`] — the
//! scanner itself has no opinion on it.
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! The sink consumes events and builds a Rowan green tree, handed back
//! already in mutable-cursor form (`new_root_mut`) so every [`parse`] result
//! is ready for in-place editing via [`mutation`] without an extra
//! conversion step.
//!
//! ## Module Structure
//!
//! ```text
//! jsonc-cst/
//! ├── lib.rs       # This file - public API
//! ├── syntax_kind.rs  # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── scanner.rs      # Hand-written validating tokenizer
//! ├── options.rs      # ParseOptions: which JSONC extensions are accepted
//! ├── error.rs        # SyntaxError / TypeError / StateError / ConversionError
//! ├── escape.rs        # String escape decode/encode
//! ├── tree.rs          # Typed read-only navigation (Root, Object, Array, ...)
//! ├── synth.rs          # Value → CST fragment synthesis
//! ├── mutation.rs        # In-place editing: append/insert/remove/replace/force
//! ├── value.rs            # Value host type, to_value/parse_to_value bridge
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, public parse() function
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs       # Converts events to a mutable-cursor Rowan tree
//!     └── grammar.rs     # The JSONC grammar
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use jsonc_cst::{parse, ParseOptions, SyntaxKind};
//!
//! let tree = parse("{ \"a\": 1 }", ParseOptions::permissive()).unwrap();
//!
//! // The tree preserves all text.
//! assert_eq!(tree.text().to_string(), "{ \"a\": 1 }");
//!
//! // Navigate the tree structure.
//! assert_eq!(tree.kind(), SyntaxKind::ROOT);
//! let object = tree.children().next().unwrap();
//! assert_eq!(object.kind(), SyntaxKind::OBJECT);
//! ```
//!
//! Editing goes through the typed wrappers:
//!
//! ```
//! use jsonc_cst::{Root, ParseOptions, CstNode};
//!
//! let tree = jsonc_cst::parse("{ \"a\": 1 }", ParseOptions::permissive()).unwrap();
//! let root = Root::cast(tree).unwrap();
//! let obj = root.value().unwrap().as_object_or_throw().unwrap().clone();
//! obj.append("b", true).unwrap();
//! assert_eq!(root.syntax().text().to_string(), "{ \"a\": 1, \"b\": true}");
//! ```
//!
//! ## Why This Architecture?
//!
//! This design is battle-tested in rust-analyzer, which parses millions of
//! lines of Rust code. Key benefits:
//!
//! - **Incremental potential**: Rowan supports incremental reparsing
//! - **Memory efficient**: green nodes are interned and structurally shared
//! - **Type safe**: the marker system prevents tree corruption at compile
//!   time, and the cast-trait wrappers prevent node-kind mix-ups at the API
//!   boundary

pub mod error;
pub mod escape;
pub mod mutation;
pub mod options;
pub mod parser;
pub mod scanner;
pub mod synth;
pub mod syntax_kind;
pub mod tree;
pub mod value;

pub use error::{ConversionError, JsoncError, StateError, SyntaxError, TypeError};
pub use mutation::ValueArg;
pub use options::ParseOptions;
pub use parser::parse;
pub use syntax_kind::{JsoncLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use tree::{
    Array, BooleanLit, CstNode, CstToken, CstValue, NullKeyword, NumberLit, Object,
    ObjectProperty, PropertyName, Root, StringLit, WordLit,
};
pub use value::{Value, parse_to_value, to_value};

/// Parse `source` under [`ParseOptions::strict`] (plain JSON, no
/// extensions). Convenience wrapper around [`parse`].
pub fn parse_strict(source: &str) -> Result<SyntaxNode, SyntaxError> {
    parse(source, ParseOptions::strict())
}

/// Parse `source` under [`ParseOptions::strict`] and bridge it straight to
/// a [`Value`]. Convenience wrapper around [`value::parse_to_value`].
pub fn parse_to_value_strict(source: &str) -> Result<Value, JsoncError> {
    value::parse_to_value(source, ParseOptions::strict())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_defaults_are_permissive() {
        assert!(parse("{ a: 1, }", ParseOptions::permissive()).is_ok());
    }

    #[test]
    fn parse_strict_rejects_extensions() {
        assert!(parse_strict("{ a: 1, }").is_err());
        assert!(parse_strict(r#"{"a": 1}"#).is_ok());
    }

    #[test]
    fn parse_to_value_strict_bridges_plain_json() {
        let v = parse_to_value_strict(r#"{"a": [1, 2, 3]}"#).unwrap();
        match v {
            Value::Object(map) => {
                assert_eq!(map.len(), 1);
            }
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn roundtrip_preserves_text() {
        let inputs = [
            "",
            "null",
            "true",
            "42",
            r#""hello""#,
            "[1, 2, 3]",
            r#"{"a": 1, "b": [2, 3]}"#,
            "{ // comment\n  \"a\": 1\n}",
            "[1, 2,]",
        ];
        for input in inputs {
            let tree = parse(input, ParseOptions::permissive()).unwrap();
            assert_eq!(tree.text().to_string(), input, "roundtrip failed for {input:?}");
        }
    }

    #[test]
    fn edit_then_roundtrip_only_changes_the_touched_span() {
        let src = r#"{"a": 1, "b": 2}"#;
        let tree = parse(src, ParseOptions::permissive()).unwrap();
        let root = Root::cast(tree).unwrap();
        let obj = root.value().unwrap().as_object_or_throw().unwrap().clone();
        obj.get("a").unwrap().replace_with(99.0).unwrap();
        assert_eq!(root.syntax().text().to_string(), r#"{"a": 99, "b": 2}"#);
    }

    // End-to-end scenarios, one per named case.

    #[test]
    fn scenario_preserve_and_add() {
        let src = "{\n  // 1\n  \"data\" /* 2 */: 123 // 3\n} // 4";
        let tree = parse(src, ParseOptions::permissive()).unwrap();
        let root = Root::cast(tree).unwrap();
        let obj = root.value().unwrap().as_object_or_throw().unwrap().clone();

        let mut nested = indexmap::IndexMap::new();
        nested.insert("nested".to_string(), Value::Bool(true));
        obj.get_or_throw("data").unwrap().replace_with(Value::Object(nested)).unwrap();
        obj.append("new_key", Value::Array(vec![456.0.into(), 789.0.into(), false.into()]))
            .unwrap();

        let expected = "{\n  // 1\n  \"data\" /* 2 */: {\n    \"nested\": true\n  }, // 3\n  \"new_key\": [456, 789, false]\n} // 4";
        assert_eq!(root.syntax().text().to_string(), expected);
    }

    #[test]
    fn scenario_force_type() {
        let tree = parse("null", ParseOptions::permissive()).unwrap();
        let root = Root::cast(tree).unwrap();
        root.as_object_or_force().unwrap();
        assert_eq!(root.syntax().text().to_string(), "{}");

        let tree = parse("null", ParseOptions::permissive()).unwrap();
        let root = Root::cast(tree).unwrap();
        root.as_array_or_force().unwrap();
        assert_eq!(root.syntax().text().to_string(), "[]");
    }

    #[test]
    fn scenario_strict_rejection() {
        assert!(parse_strict("{ // c\n}").is_err());
        let opts = ParseOptions::strict().merge_over(|o| o.allow_comments = true);
        assert!(parse("{ // c\n}", opts).is_ok());
    }

    #[test]
    fn scenario_trailing_comma_toggle() {
        let tree = parse("[\n  1,\n  2\n]", ParseOptions::permissive()).unwrap();
        let root = Root::cast(tree).unwrap();
        let arr = root.value().unwrap().as_array_or_throw().unwrap().clone();
        arr.set_trailing_commas(true).unwrap();
        assert_eq!(root.syntax().text().to_string(), "[\n  1,\n  2,\n]");
        arr.set_trailing_commas(false).unwrap();
        assert_eq!(root.syntax().text().to_string(), "[\n  1,\n  2\n]");
    }

    #[test]
    fn scenario_indent_inference() {
        let tree = parse("{\n    \"a\": 1\n}", ParseOptions::permissive()).unwrap();
        let root = Root::cast(tree).unwrap();
        let obj = root.value().unwrap().as_object_or_throw().unwrap().clone();
        obj.append("b", 2.0).unwrap();
        assert_eq!(
            root.syntax().text().to_string(),
            "{\n    \"a\": 1,\n    \"b\": 2\n}"
        );
    }

    #[test]
    fn scenario_unicode_fidelity() {
        let src = r#"{"emoji":"👍"}"#;
        let tree = parse(src, ParseOptions::permissive()).unwrap();
        let root = Root::cast(tree).unwrap();
        let obj = root.value().unwrap().as_object_or_throw().unwrap().clone();
        let emoji = obj.get("emoji").unwrap();
        assert_eq!(emoji.as_string_or_throw().unwrap().decoded_value(), "👍");
        assert_eq!(root.syntax().text().to_string(), src);
    }

    #[test]
    fn scenario_value_bridge_matches_parse_to_value_of_serialized() {
        let src = r#"{"a": 1, "b": [true, null, "x"]}"#;
        let tree = parse(src, ParseOptions::permissive()).unwrap();
        let root = Root::cast(tree.clone()).unwrap();
        let value = root.value_or_throw().unwrap();
        let via_node = to_value(&value).unwrap();
        let via_text = parse_to_value(&tree.text().to_string(), ParseOptions::permissive()).unwrap();
        assert_eq!(via_node, via_text);
    }
}
