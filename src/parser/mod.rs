//! # Parser — Event-Based Tree Construction
//!
//! This module implements the core parsing logic, transforming a token stream
//! into a syntax tree using the **event-based** architecture from rust-analyzer.
//!
//! ## Why Event-Based Parsing?
//!
//! Traditional recursive descent parsers build the tree directly during parsing.
//! This has problems:
//!
//! 1. **Deep nesting can overflow the stack** (JSON values nest arbitrarily)
//! 2. **Backtracking is expensive** when you've already built tree nodes
//! 3. **Error recovery is tricky** when partially-built nodes exist
//!
//! Instead, we emit a flat list of **events** ([`Event`]) that describe the
//! tree structure. The [`Sink`] then builds the actual Rowan tree from events.
//!
//! Unlike the markdown grammar this parser was adapted from, JSONC grammar
//! rules can fail outright — a missing `:` or an unexpected token is not
//! recovered from, it aborts parsing with a [`crate::error::SyntaxError`].
//! There is no error-recovery node kind; see `syntax_kind.rs`'s `ERROR`
//! variant doc comment.
//!
//! ## The Marker System
//!
//! The key innovation is the [`Marker`] type, which makes tree construction
//! **type-safe at compile time**. When you call `parser.start()`, you get a
//! `Marker`. This marker **must** be either:
//!
//! - Completed with `marker.complete(parser, KIND)` → emits Start+Finish
//! - Abandoned with `marker.abandon(parser)` → removes the placeholder
//!
//! If you drop a marker without doing either, **the program panics**. This
//! prevents accidentally leaving the tree in an inconsistent state.
//!
//! ## Forward Parent Links
//!
//! Sometimes we need to wrap an already-parsed node in a new parent. The
//! `CompletedMarker::precede()` method handles this by creating a **forward
//! parent link** that the Sink resolves when building the tree. This parser
//! doesn't currently need it for any JSONC construct, but it's kept because
//! it costs nothing unused and the grammar may grow to want it.
//!
//! ## Module Structure
//!
//! - [`event`] - The Event enum
//! - [`sink`] - Converts events to a mutable-cursor Rowan tree
//! - [`grammar`] - The JSONC grammar

pub mod event;
pub mod sink;

mod grammar;

use crate::error::SyntaxError;
use crate::options::ParseOptions;
use crate::scanner::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// The parser state machine.
///
/// Holds the token stream, current position, accumulated events, and the
/// active [`ParseOptions`] grammar rules consult to decide whether an
/// extension token is acceptable here.
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
    options: ParseOptions,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>], options: ParseOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            options,
        }
    }

    /// The option set this parse is running under.
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Parse the tokens and return a syntax tree, or the first syntax error
    /// encountered.
    pub fn parse(mut self) -> Result<SyntaxNode, SyntaxError> {
        grammar::root(&mut self)?;
        let sink = Sink::new(self.tokens, self.events);
        Ok(sink.finish())
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens, skipping none — trivia included. Grammar rules
    /// that need to skip trivia call [`Parser::bump_trivia`] first.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// The byte offset of the current token (or end-of-input).
    pub fn current_offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|t| t.offset)
            .unwrap_or_else(|| {
                self.tokens
                    .last()
                    .map(|t| t.offset + t.text.len())
                    .unwrap_or(0)
            })
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume every leading trivia token (whitespace/newline/comments) as
    /// children of whatever node is currently open. Fails if a comment is
    /// encountered while `allow_comments` is off — the scanner accepts
    /// comment *shape* unconditionally, so rejecting them is this option
    /// check's job, not the scanner's.
    pub fn bump_trivia(&mut self) -> Result<(), SyntaxError> {
        while self.current().is_trivia() {
            if matches!(
                self.current(),
                SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT
            ) && !self.options.allow_comments
            {
                return Err(self.error("comments are not enabled"));
            }
            self.bump();
        }
        Ok(())
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Get the text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.tokens.get(self.pos).map(|t| t.text).unwrap_or("")
    }

    /// Fail parsing with a [`SyntaxError`] at the current token's offset.
    pub fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.current_offset(), message)
    }

    /// Expect and consume `kind`, or fail with a [`SyntaxError`].
    pub fn expect(&mut self, kind: SyntaxKind, what: &str) -> Result<(), SyntaxError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}, found {:?}", self.current())))
        }
    }
}

/// A marker for a node being constructed.
///
/// This is the heart of the type-safe tree building system. When you call
/// `parser.start()`, a `Placeholder` event is pushed and you get a `Marker`
/// pointing to it.
///
/// ## The Must-Use Contract
///
/// The `#[must_use]` attribute and the `Drop` impl together enforce that
/// every marker is either:
///
/// - **Completed** via `marker.complete(parser, KIND)` - converts the
///   placeholder to a `Start` event and pushes a `Finish` event
/// - **Abandoned** via `marker.abandon(parser)` - removes the placeholder
///   (only works if nothing was pushed after it)
///
/// If you drop a marker without doing either, **the program panics**. This
/// catches bugs at runtime rather than producing corrupt trees — including
/// when a grammar rule bails out early via `?` without abandoning its
/// in-flight marker, which is why every grammar rule that can fail takes
/// care to `abandon()` on the error path.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::Start {
            kind,
            forward_parent: None,
        };
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    /// Abandon this marker without creating a node.
    ///
    /// **Note**: This only removes the placeholder if it's the last event.
    /// If other events were pushed after `start()`, the placeholder becomes
    /// inert and is ignored by the Sink.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// A marker for a node that has been completed.
///
/// The only thing you can do with a `CompletedMarker` is call `precede()`
/// to wrap the completed node in a new parent — useful for rewrapping an
/// already-parsed node once more context arrives. This works by setting a
/// `forward_parent` link that the Sink resolves.
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    /// Position of the Start event for this completed node
    pos: usize,
}

impl CompletedMarker {
    /// Create a new parent node that will contain this node.
    pub fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Placeholder);

        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            *forward_parent = Some(new_pos);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }
}

/// Parse JSONC source into a syntax tree under the given options.
pub fn parse(source: &str, options: ParseOptions) -> Result<SyntaxNode, SyntaxError> {
    let tokens = lex(source)?;
    let parser = Parser::new(&tokens, options);
    parser.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_empty_input() {
        // `root = value?` — an empty document has no significant value,
        // but that's valid, not an error.
        let tree = parse("", ParseOptions::permissive()).unwrap();
        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        assert_eq!(tree.children().count(), 0);
    }

    #[test]
    fn parse_preserves_all_text() {
        let input = "{ \"a\": 1 }";
        let tree = parse(input, ParseOptions::permissive()).unwrap();
        assert_eq!(tree.text().to_string(), input);
    }

    #[test]
    fn parse_simple_object() {
        let tree = parse("{}", ParseOptions::permissive()).unwrap();
        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        let obj = tree.children().next().unwrap();
        assert_eq!(obj.kind(), SyntaxKind::OBJECT);
    }

    #[test]
    fn marker_must_be_completed() {
        let result = std::panic::catch_unwind(|| {
            let tokens = lex("1").unwrap();
            let mut parser = Parser::new(&tokens, ParseOptions::permissive());
            let _marker = parser.start();
            // Marker dropped without completion - should panic
        });
        assert!(result.is_err());
    }

    #[test]
    fn marker_can_be_abandoned() {
        let tokens = lex("1").unwrap();
        let mut parser = Parser::new(&tokens, ParseOptions::permissive());
        let marker = parser.start();
        marker.abandon(&mut parser);
        // Should not panic
    }
}
