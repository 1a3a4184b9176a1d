//! # Scanner — tokenizing JSONC source
//!
//! Breaks source text into a flat token stream. Every byte of the input
//! appears in exactly one token's `text` — the lossless guarantee the rest
//! of the crate depends on:
//!
//! ```
//! use jsonc_cst::scanner::lex;
//!
//! let input = "{ \"a\": 1 }";
//! let tokens = lex(input).unwrap();
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! Unlike the recognizer-style lexer this crate's markdown sibling uses
//! (regex dispatch, never fails), the JSONC scanner must *reject*
//! malformed strings, numbers, and comments with a precise byte offset —
//! see `spec.md` §4.1. That validation is naturally a small hand-written
//! character state machine rather than a generated regex lexer.
//!
//! The scanner recognizes the full permissive superset of JSONC token
//! shapes (hex numbers, unary plus, single-quoted strings, bare-word
//! identifiers) unconditionally; it has no notion of [`crate::ParseOptions`].
//! Rejecting a token that a particular option set disallows is the
//! parser's job (`spec.md` §4.2): the scanner only ever fails on tokens
//! that are malformed under *any* option set.

use crate::error::SyntaxError;
use crate::syntax_kind::SyntaxKind;

/// A scanned token: its kind, exact source text, and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: usize,
}

/// Tokenize `input`, failing on the first malformed construct.
///
/// Guarantees that concatenating every returned token's `text` reproduces
/// `input` exactly.
pub fn lex(input: &str) -> Result<Vec<Token<'_>>, SyntaxError> {
    let mut scanner = Scanner::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = scanner.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct Scanner<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }

    fn err(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(offset, message)
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>, SyntaxError> {
        if self.at_end() {
            return Ok(None);
        }
        let start = self.pos;
        let c = self.rest().chars().next().unwrap();

        let kind = match c {
            ' ' | '\t' => self.scan_whitespace(),
            '\n' => {
                self.pos += 1;
                SyntaxKind::NEWLINE
            }
            '\r' if self.byte(1) == Some(b'\n') => {
                self.pos += 2;
                SyntaxKind::NEWLINE
            }
            '{' => self.bump_char(SyntaxKind::L_BRACE),
            '}' => self.bump_char(SyntaxKind::R_BRACE),
            '[' => self.bump_char(SyntaxKind::L_BRACKET),
            ']' => self.bump_char(SyntaxKind::R_BRACKET),
            ',' => self.bump_char(SyntaxKind::COMMA),
            ':' => self.bump_char(SyntaxKind::COLON),
            '/' if self.byte(1) == Some(b'/') => self.scan_line_comment(),
            '/' if self.byte(1) == Some(b'*') => self.scan_block_comment(start)?,
            '"' => self.scan_string(start, '"')?,
            '\'' => self.scan_string(start, '\'')?,
            '+' | '-' => self.scan_number(start)?,
            c if c.is_ascii_digit() => self.scan_number(start)?,
            c if is_word_start(c) => {
                let text = self.scan_word();
                keyword_kind(text).unwrap_or(SyntaxKind::WORD)
            }
            other => {
                return Err(self.err(start, format!("unrecognized character {other:?}")));
            }
        };

        Ok(Some(Token {
            kind,
            text: self.slice_from(start),
            offset: start,
        }))
    }

    fn bump_char(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    fn scan_whitespace(&mut self) -> SyntaxKind {
        while matches!(self.byte(0), Some(b' ') | Some(b'\t')) {
            self.pos += 1;
        }
        SyntaxKind::WHITESPACE
    }

    fn scan_line_comment(&mut self) -> SyntaxKind {
        self.pos += 2; // "//"
        while let Some(b) = self.byte(0) {
            if b == b'\n' || b == b'\r' {
                break;
            }
            self.pos += 1;
        }
        SyntaxKind::LINE_COMMENT
    }

    fn scan_block_comment(&mut self, start: usize) -> Result<SyntaxKind, SyntaxError> {
        self.pos += 2; // "/*"
        loop {
            match (self.byte(0), self.byte(1)) {
                (None, _) => {
                    return Err(self.err(start, "unterminated block comment"));
                }
                (Some(b'*'), Some(b'/')) => {
                    self.pos += 2;
                    return Ok(SyntaxKind::BLOCK_COMMENT);
                }
                _ => self.pos += 1,
            }
        }
    }

    fn scan_string(&mut self, start: usize, quote: char) -> Result<SyntaxKind, SyntaxError> {
        let quote_byte = quote as u8;
        self.pos += 1; // opening quote
        loop {
            match self.byte(0) {
                None => return Err(self.err(start, "unterminated string literal")),
                Some(b'\n') | Some(b'\r') => {
                    return Err(self.err(start, "unterminated string literal"));
                }
                Some(b) if b == quote_byte => {
                    self.pos += 1;
                    return Ok(SyntaxKind::STRING);
                }
                Some(b'\\') => {
                    let escape_start = self.pos;
                    self.pos += 1;
                    self.scan_escape(escape_start, quote)?;
                }
                _ => {
                    // Advance by one full UTF-8 scalar, not one byte.
                    let ch = self.rest().chars().next().unwrap();
                    self.pos += ch.len_utf8();
                }
            }
        }
    }

    fn scan_escape(&mut self, escape_start: usize, quote: char) -> Result<(), SyntaxError> {
        match self.byte(0) {
            None => Err(self.err(escape_start, "unterminated string literal")),
            Some(b'u') => {
                self.pos += 1;
                for _ in 0..4 {
                    match self.byte(0) {
                        Some(b) if (b as char).is_ascii_hexdigit() => self.pos += 1,
                        _ => {
                            return Err(self.err(
                                escape_start,
                                "invalid escape sequence: \\u requires 4 hex digits",
                            ));
                        }
                    }
                }
                Ok(())
            }
            Some(b) => {
                let c = b as char;
                if c == quote
                    || matches!(c, '"' | '\'' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't')
                {
                    self.pos += 1;
                    Ok(())
                } else {
                    Err(self.err(escape_start, format!("invalid escape sequence: \\{c}")))
                }
            }
        }
    }

    fn scan_number(&mut self, start: usize) -> Result<SyntaxKind, SyntaxError> {
        if matches!(self.byte(0), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }

        if self.byte(0) == Some(b'0') && matches!(self.byte(1), Some(b'x') | Some(b'X')) {
            self.pos += 2;
            let digits_start = self.pos;
            while matches!(self.byte(0), Some(b) if (b as char).is_ascii_hexdigit()) {
                self.pos += 1;
            }
            if self.pos == digits_start {
                return Err(self.err(start, "invalid number: hexadecimal literal has no digits"));
            }
            return Ok(SyntaxKind::NUMBER);
        }

        let int_start = self.pos;
        while matches!(self.byte(0), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == int_start {
            return Err(self.err(start, "invalid number"));
        }

        if self.byte(0) == Some(b'.') && matches!(self.byte(1), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
            while matches!(self.byte(0), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        if matches!(self.byte(0), Some(b'e') | Some(b'E')) {
            let exp_mark = self.pos;
            self.pos += 1;
            if matches!(self.byte(0), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            let exp_digits_start = self.pos;
            while matches!(self.byte(0), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
            if self.pos == exp_digits_start {
                return Err(self.err(exp_mark, "invalid number: exponent has no digits"));
            }
        }

        Ok(SyntaxKind::NUMBER)
    }

    fn scan_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.rest().chars().next() {
            if is_word_continue(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        self.slice_from(start)
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_word_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Reclassify a scanned `WORD`/`STRING`-shaped token as `BOOLEAN`/`NULL_KW`
/// when its text is a reserved keyword. Applied by the parser (not the
/// scanner) so the scanner stays a pure tokenizer with no keyword table.
pub fn keyword_kind(text: &str) -> Option<SyntaxKind> {
    match text {
        "true" | "false" => Some(SyntaxKind::BOOLEAN),
        "null" => Some(SyntaxKind::NULL_KW),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        lex(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex("").unwrap(), vec![]);
    }

    #[test]
    fn lex_structural_tokens() {
        assert_eq!(
            kinds("{}[],:"),
            vec![
                SyntaxKind::L_BRACE,
                SyntaxKind::R_BRACE,
                SyntaxKind::L_BRACKET,
                SyntaxKind::R_BRACKET,
                SyntaxKind::COMMA,
                SyntaxKind::COLON,
            ]
        );
    }

    #[test]
    fn lex_string() {
        let tokens = lex(r#""hello""#).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, SyntaxKind::STRING);
        assert_eq!(tokens[0].text, r#""hello""#);
    }

    #[test]
    fn lex_single_quoted_string() {
        let tokens = lex("'hello'").unwrap();
        assert_eq!(tokens[0].kind, SyntaxKind::STRING);
    }

    #[test]
    fn lex_string_with_escapes() {
        let tokens = lex(r#""a\n\tA""#).unwrap();
        assert_eq!(tokens[0].kind, SyntaxKind::STRING);
    }

    #[test]
    fn lex_unterminated_string_errors() {
        let err = lex(r#""abc"#).unwrap_err();
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn lex_string_with_bad_escape_errors() {
        assert!(lex(r#""\q""#).is_err());
    }

    #[test]
    fn lex_unterminated_block_comment_errors() {
        assert!(lex("/* never closed").is_err());
    }

    #[test]
    fn lex_line_comment_stops_before_newline() {
        let tokens = lex("// hi\n").unwrap();
        assert_eq!(tokens[0].kind, SyntaxKind::LINE_COMMENT);
        assert_eq!(tokens[0].text, "// hi");
        assert_eq!(tokens[1].kind, SyntaxKind::NEWLINE);
    }

    #[test]
    fn lex_numbers() {
        for (src, ok) in [
            ("123", true),
            ("-123", true),
            ("+123", true),
            ("1.5", true),
            ("1.5e10", true),
            ("1.5E-10", true),
            ("0x1F", true),
            ("1.", false),
            ("1e", false),
            ("0x", false),
        ] {
            let result = lex(src);
            assert_eq!(result.is_ok(), ok, "input {src:?}");
        }
    }

    #[test]
    fn lex_keywords_and_words() {
        let tokens = lex("true false null someWord _x $y").unwrap();
        let kinds: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind != SyntaxKind::WHITESPACE)
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::BOOLEAN,
                SyntaxKind::BOOLEAN,
                SyntaxKind::NULL_KW,
                SyntaxKind::WORD,
                SyntaxKind::WORD,
                SyntaxKind::WORD,
            ]
        );
    }

    #[test]
    fn lex_unrecognized_character_errors() {
        let err = lex("@").unwrap_err();
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn all_bytes_preserved() {
        let input = "{\n  // c\n  \"a\" /* x */: [1, 2.5e1, -0x1f, +3, 'b', true, null, word],\n}";
        let tokens = lex(input).unwrap();
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }

    #[test]
    fn unicode_fidelity() {
        let input = r#"{"emoji":"👍"}"#;
        let tokens = lex(input).unwrap();
        let reconstructed: String = tokens.iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }
}
