//! String escape decoding and encoding.
//!
//! The scanner never decodes escapes — it only validates that they're
//! well-formed and preserves the raw source bytes in a token's `text`
//! (`spec.md` §4.1). Decoding happens lazily here, on demand from
//! `StringLit::decoded_value()` and the host value bridge; encoding
//! happens here too, when the mutation engine needs to turn a host string
//! into a canonical JSON string literal.

/// Decode a scanned string token's raw text (including its surrounding
/// quotes) into its logical value.
pub(crate) fn decode_string_escapes(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let hex: String = (&mut chars).take(4).collect();
                let code = u32::from_str_radix(&hex, 16).expect("scanner validated \\u escapes");
                if let Some(ch) = char::from_u32(code) {
                    out.push(ch);
                } else {
                    // An unpaired surrogate half; the scanner doesn't
                    // validate surrogate pairing, so fall back to the
                    // Unicode replacement character rather than panicking.
                    out.push('\u{FFFD}');
                }
            }
            Some(other) => out.push(other), // unreachable if the scanner validated
            None => {}
        }
    }
    out
}

/// Encode a host string as a canonical double-quoted JSON string literal.
/// Only `"`, `\`, and C0 control characters are escaped; other Unicode is
/// emitted raw, matching how `JSON.stringify` and `serde_json` both
/// default to encoding already-valid UTF-8 text.
pub(crate) fn encode_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decode_simple() {
        assert_eq!(decode_string_escapes(r#""hello""#), "hello");
    }

    #[test]
    fn decode_escapes() {
        assert_eq!(decode_string_escapes(r#""a\tb\nc""#), "a\tb\nc");
    }

    #[test]
    fn decode_unicode_escape() {
        assert_eq!(decode_string_escapes(r#""é""#), "é");
    }

    #[test]
    fn encode_roundtrips_through_decode() {
        let value = "line1\nline2\t\"quoted\"\\back";
        let encoded = encode_string_literal(value);
        assert_eq!(decode_string_escapes(&encoded), value);
    }

    #[test]
    fn encode_preserves_unicode_raw() {
        assert_eq!(encode_string_literal("👍"), "\"👍\"");
    }
}
