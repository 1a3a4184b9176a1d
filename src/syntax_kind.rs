//! # SyntaxKind and Rowan integration
//!
//! Defines every token and node kind in the JSONC CST, and wires them into
//! [rowan]'s green/red tree machinery.
//!
//! ## Design: single enum for tokens and nodes
//!
//! Following the rust-analyzer model (and this codebase's markdown CST
//! before it), tokens and composite nodes share one enum. Rowan stores
//! kinds as a `u16`, so they must fit in one type, and a single enum keeps
//! pattern matching uniform across the tree.
//!
//! Variants are SCREAMING_CASE, matching rust-analyzer's and rowan's own
//! convention for `SyntaxKind`; `#[allow(non_camel_case_types)]` silences
//! the lint.

/// All syntax kinds for the JSONC CST: tokens (scanner output) followed by
/// composite nodes (parser output). `EOF` is the boundary token/node split
/// used by [`SyntaxKind::is_token`].
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Trivia tokens ===
    /// Horizontal whitespace (spaces, tabs).
    WHITESPACE,
    /// A single line ending, `\n` or `\r\n`.
    NEWLINE,
    /// `// ...` through end of line, not including the newline.
    LINE_COMMENT,
    /// `/* ... */`, possibly spanning multiple lines.
    BLOCK_COMMENT,

    // === Value-leaf tokens ===
    /// A quoted string literal, double- or single-quoted, raw source bytes.
    STRING,
    /// A number literal: decimal, optional leading `+`/`-`, optional
    /// fraction/exponent, or a `0x`-prefixed hexadecimal integer.
    NUMBER,
    /// The keyword `true` or `false`.
    BOOLEAN,
    /// The keyword `null`.
    NULL_KW,
    /// A bare identifier used as an object key under loose-name mode.
    WORD,

    // === Structural tokens ===
    L_BRACE,
    R_BRACE,
    L_BRACKET,
    R_BRACKET,
    COMMA,
    COLON,

    /// End of input.
    EOF,

    // === Composite nodes ===
    /// The whole document; at most one significant value child.
    ROOT,
    /// `{ ... }`.
    OBJECT,
    /// `[ ... ]`.
    ARRAY,
    /// `name : value` inside an `OBJECT`.
    OBJECT_PROPERTY,
    /// Tombstone node kind, reserved as the final variant so bounds checks
    /// in `kind_from_raw` have somewhere to stop. The parser never emits a
    /// tree containing one: malformed input is rejected with a
    /// [`crate::error::SyntaxError`] instead of a partial tree.
    ERROR,
}

impl SyntaxKind {
    /// True for tokens (scanner output): everything up to and including `EOF`.
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// True for composite nodes (parser output).
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Whitespace, newlines, and comments: non-semantic but preserved.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::NEWLINE | Self::LINE_COMMENT | Self::BLOCK_COMMENT
        )
    }

    /// Structural punctuation: braces, brackets, comma, colon.
    pub fn is_punctuation(self) -> bool {
        matches!(
            self,
            Self::L_BRACE
                | Self::R_BRACE
                | Self::L_BRACKET
                | Self::R_BRACKET
                | Self::COMMA
                | Self::COLON
        )
    }

    /// A value-leaf token: string, number, boolean, null, or bare word.
    pub fn is_value_leaf(self) -> bool {
        matches!(
            self,
            Self::STRING | Self::NUMBER | Self::BOOLEAN | Self::NULL_KW | Self::WORD
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Zero-sized language marker that tells rowan which [`SyntaxKind`] this
/// tree uses. Never instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JsoncLang {}

impl rowan::Language for JsoncLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: bounds-checked above; SyntaxKind is repr(u16) with
        // contiguous variants starting at 0. Inserting a variant in the
        // middle (rather than appending) would invalidate this.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// A node in the JSONC CST. Cheap to clone (reference-counted); obtained
/// from [`crate::parse`] already in mutable-cursor form, so every live
/// handle observes edits made through any other handle.
pub type SyntaxNode = rowan::SyntaxNode<JsoncLang>;
/// A leaf token in the JSONC CST.
pub type SyntaxToken = rowan::SyntaxToken<JsoncLang>;
/// Either a node or a token, as yielded by `children_with_tokens()`.
pub type SyntaxElement = rowan::SyntaxElement<JsoncLang>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_kinds_are_tokens() {
        assert!(SyntaxKind::WHITESPACE.is_token());
        assert!(SyntaxKind::STRING.is_token());
        assert!(SyntaxKind::EOF.is_token());
    }

    #[test]
    fn node_kinds_are_nodes() {
        assert!(SyntaxKind::ROOT.is_node());
        assert!(SyntaxKind::OBJECT.is_node());
        assert!(SyntaxKind::OBJECT_PROPERTY.is_node());
    }

    #[test]
    fn trivia_detection() {
        assert!(SyntaxKind::WHITESPACE.is_trivia());
        assert!(SyntaxKind::LINE_COMMENT.is_trivia());
        assert!(SyntaxKind::BLOCK_COMMENT.is_trivia());
        assert!(!SyntaxKind::STRING.is_trivia());
    }

    #[test]
    fn rowan_conversion_roundtrip() {
        let kind = SyntaxKind::OBJECT_PROPERTY;
        let raw: rowan::SyntaxKind = kind.into();
        let back = <JsoncLang as rowan::Language>::kind_from_raw(raw);
        assert_eq!(kind, back);
    }
}
