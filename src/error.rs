//! Error types for the JSONC CST.
//!
//! Three of the four map directly onto `spec.md` §6-7's error surface;
//! `JsoncError` is the umbrella enum so a host that doesn't care about the
//! distinction can propagate with a plain `?`.

/// Malformed input. Carries the byte offset at which scanning or parsing
/// gave up, plus a human-readable message. Never partially recovered from
/// — a `SyntaxError` means no tree was built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at offset {offset}: {message}")]
pub struct SyntaxError {
    pub offset: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// A `*_or_throw` accessor was called on a node of the wrong kind, or a
/// required property/element was missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("type error: {0}")]
pub struct TypeError(pub String);

impl TypeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn wrong_kind(expected: &str, found: crate::syntax_kind::SyntaxKind) -> Self {
        Self::new(format!("expected {expected}, found {found:?}"))
    }

    pub fn missing_property(key: &str) -> Self {
        Self::new(format!("object has no property {key:?}"))
    }

    pub fn no_value() -> Self {
        Self::new("node has no significant value child")
    }
}

/// An operation was attempted on a node that is no longer attached to a
/// tree (it, or an ancestor, was removed or replaced), or a mutation tried
/// to splice a node from one tree into another.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("state error: {0}")]
pub struct StateError(pub String);

impl StateError {
    pub fn detached() -> Self {
        Self("node is detached from its tree".to_string())
    }

    pub fn foreign_tree() -> Self {
        Self("node belongs to a different tree".to_string())
    }
}

/// The host-value bridge (`to_value`) encountered a subtree it cannot
/// represent as host data: an `ObjectProperty` missing its value, or (for
/// the `Number` bridge) a numeric literal that isn't finite.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("conversion error: {0}")]
pub struct ConversionError(pub String);

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Umbrella error for callers that don't need to distinguish failure
/// families.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JsoncError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
