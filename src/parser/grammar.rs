//! # Grammar — JSONC value, object, array, property rules
//!
//! ```text
//! root      = value? ;
//! value     = object | array | string | number | bool | null ;
//! object    = '{' ( prop ( ',' prop )* ','? )? '}' ;
//! prop      = name ':' value ;
//! name      = string | word ;       (* word only under loose mode *)
//! array     = '[' ( value ( ',' value )* ','? )? ']' ;
//! ```
//!
//! Every rule here is fallible — unlike the markdown grammar this parser's
//! shape was adapted from, there is no error recovery: the first grammar
//! violation aborts the whole parse with a [`SyntaxError`]. `with_node`
//! centralizes the one bit of bookkeeping that requires: a marker started
//! with `p.start()` must be completed or abandoned before the function
//! returns, on every path, or `Marker::drop` panics.

use crate::error::SyntaxError;
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Run `f` inside a freshly started node of kind `kind`, completing the
/// marker on success and abandoning it on failure so `?` stays usable in
/// the grammar body.
fn with_node(
    p: &mut Parser,
    kind: SyntaxKind,
    f: impl FnOnce(&mut Parser) -> Result<(), SyntaxError>,
) -> Result<(), SyntaxError> {
    let m = p.start();
    match f(p) {
        Ok(()) => {
            m.complete(p, kind);
            Ok(())
        }
        Err(e) => {
            m.abandon(p);
            Err(e)
        }
    }
}

pub(super) fn root(p: &mut Parser) -> Result<(), SyntaxError> {
    with_node(p, SyntaxKind::ROOT, |p| {
        p.bump_trivia()?;
        if !p.at_end() {
            value(p)?;
            p.bump_trivia()?;
        }
        if !p.at_end() {
            return Err(p.error(format!(
                "unexpected trailing content: {:?}",
                p.current()
            )));
        }
        Ok(())
    })
}

fn value(p: &mut Parser) -> Result<(), SyntaxError> {
    match p.current() {
        SyntaxKind::L_BRACE => object(p),
        SyntaxKind::L_BRACKET => array(p),
        SyntaxKind::STRING => {
            check_string_literal(p)?;
            p.bump();
            Ok(())
        }
        SyntaxKind::NUMBER => {
            check_number_literal(p)?;
            p.bump();
            Ok(())
        }
        SyntaxKind::BOOLEAN | SyntaxKind::NULL_KW => {
            p.bump();
            Ok(())
        }
        other => Err(p.error(format!("expected a value, found {other:?}"))),
    }
}

fn object(p: &mut Parser) -> Result<(), SyntaxError> {
    with_node(p, SyntaxKind::OBJECT, |p| {
        p.expect(SyntaxKind::L_BRACE, "'{'")?;
        separated_list(p, SyntaxKind::R_BRACE, prop)?;
        p.expect(SyntaxKind::R_BRACE, "'}'")?;
        Ok(())
    })
}

fn array(p: &mut Parser) -> Result<(), SyntaxError> {
    with_node(p, SyntaxKind::ARRAY, |p| {
        p.expect(SyntaxKind::L_BRACKET, "'['")?;
        separated_list(p, SyntaxKind::R_BRACKET, value)?;
        p.expect(SyntaxKind::R_BRACKET, "']'")?;
        Ok(())
    })
}

fn prop(p: &mut Parser) -> Result<(), SyntaxError> {
    with_node(p, SyntaxKind::OBJECT_PROPERTY, |p| {
        name(p)?;
        p.bump_trivia()?;
        p.expect(SyntaxKind::COLON, "':'")?;
        p.bump_trivia()?;
        value(p)?;
        Ok(())
    })
}

fn name(p: &mut Parser) -> Result<(), SyntaxError> {
    match p.current() {
        SyntaxKind::STRING => {
            check_string_literal(p)?;
            p.bump();
            Ok(())
        }
        SyntaxKind::WORD => {
            if !p.options().allow_loose_object_property_names {
                return Err(p.error("bare identifier property names are not enabled"));
            }
            p.bump();
            Ok(())
        }
        other => Err(p.error(format!("expected a property name, found {other:?}"))),
    }
}

/// Parses a `,`-separated run of `element`s up to (not including) `closing`,
/// honoring `allow_trailing_commas` and `allow_missing_commas`. Shared
/// between `object`'s properties and `array`'s elements, since the comma
/// discipline is identical for both.
fn separated_list(
    p: &mut Parser,
    closing: SyntaxKind,
    mut element: impl FnMut(&mut Parser) -> Result<(), SyntaxError>,
) -> Result<(), SyntaxError> {
    loop {
        p.bump_trivia()?;
        if p.at(closing) || p.at_end() {
            break;
        }
        element(p)?;
        p.bump_trivia()?;
        if p.eat(SyntaxKind::COMMA) {
            p.bump_trivia()?;
            if p.at(closing) {
                if !p.options().allow_trailing_commas {
                    return Err(p.error("trailing commas are not enabled"));
                }
                break;
            }
            // comma consumed, loop around for the next element
        } else if p.at(closing) || p.at_end() {
            break;
        } else if !p.options().allow_missing_commas {
            return Err(p.error(format!(
                "expected ',' or {closing:?}, found {:?}",
                p.current()
            )));
        }
        // missing-comma case: no separator consumed, loop parses the next
        // element directly.
    }
    Ok(())
}

fn check_string_literal(p: &Parser) -> Result<(), SyntaxError> {
    if p.current_text().starts_with('\'') && !p.options().allow_single_quoted_strings {
        return Err(p.error("single-quoted strings are not enabled"));
    }
    Ok(())
}

fn check_number_literal(p: &Parser) -> Result<(), SyntaxError> {
    let text = p.current_text();
    if text.starts_with('+') && !p.options().allow_unary_plus_numbers {
        return Err(p.error("unary plus before a number is not enabled"));
    }
    let unsigned = text.trim_start_matches(['+', '-']);
    if (unsigned.starts_with("0x") || unsigned.starts_with("0X"))
        && !p.options().allow_hexadecimal_numbers
    {
        return Err(p.error("hexadecimal numbers are not enabled"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::options::ParseOptions;
    use crate::parser::parse;
    use crate::syntax_kind::SyntaxKind;
    use pretty_assertions::assert_eq;

    fn parse_ok(src: &str, opts: ParseOptions) -> crate::syntax_kind::SyntaxNode {
        parse(src, opts).unwrap_or_else(|e| panic!("expected {src:?} to parse, got {e}"))
    }

    #[test]
    fn empty_document_parses() {
        let tree = parse_ok("", ParseOptions::permissive());
        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        assert_eq!(tree.children().count(), 0);
    }

    #[test]
    fn whitespace_only_document_parses() {
        let tree = parse_ok("   \n", ParseOptions::permissive());
        assert_eq!(tree.text().to_string(), "   \n");
        assert_eq!(tree.children().count(), 0);
    }

    #[test]
    fn nested_object_and_array() {
        let src = r#"{ "a": [1, 2, { "b": true }], "c": null }"#;
        let tree = parse_ok(src, ParseOptions::permissive());
        assert_eq!(tree.text().to_string(), src);
    }

    #[test]
    fn trailing_comma_rejected_in_strict_mode() {
        assert!(parse("[1, 2,]", ParseOptions::strict()).is_err());
        assert_eq!(
            parse_ok("[1, 2,]", ParseOptions::permissive()).text().to_string(),
            "[1, 2,]"
        );
    }

    #[test]
    fn missing_comma_rejected_in_strict_mode() {
        assert!(parse("[1 2]", ParseOptions::strict()).is_err());
        parse_ok("[1 2]", ParseOptions::permissive());
    }

    #[test]
    fn comments_rejected_in_strict_mode() {
        assert!(parse("{ // c\n}", ParseOptions::strict()).is_err());
        let opts = ParseOptions::strict().merge_over(|o| o.allow_comments = true);
        assert!(parse("{ // c\n}", opts).is_ok());
    }

    #[test]
    fn single_quoted_strings_gated() {
        assert!(parse("'a'", ParseOptions::strict()).is_err());
        parse_ok("'a'", ParseOptions::permissive());
    }

    #[test]
    fn hexadecimal_numbers_gated() {
        assert!(parse("0x1F", ParseOptions::strict()).is_err());
        parse_ok("0x1F", ParseOptions::permissive());
    }

    #[test]
    fn unary_plus_numbers_gated() {
        assert!(parse("+1", ParseOptions::strict()).is_err());
        parse_ok("+1", ParseOptions::permissive());
    }

    #[test]
    fn loose_property_names_gated() {
        assert!(parse("{ a: 1 }", ParseOptions::strict()).is_err());
        parse_ok("{ a: 1 }", ParseOptions::permissive());
    }

    #[test]
    fn trailing_content_is_an_error() {
        assert!(parse("1 2", ParseOptions::permissive()).is_err());
    }

    #[test]
    fn unterminated_object_is_an_error() {
        assert!(parse("{ \"a\": 1", ParseOptions::permissive()).is_err());
    }
}
