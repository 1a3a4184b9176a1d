//! Parse options: the configuration surface of this library.
//!
//! `spec.md` §4.2 fixes the option set and its per-entry-point defaults;
//! this module is that table made concrete, plus the "partial option
//! mapping merged over defaults" merge behaviour §6 requires.

/// Which JSONC extensions the scanner/parser accept. Strict JSON is
/// every flag `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// `//` and `/* */` comments.
    pub allow_comments: bool,
    /// A `,` immediately before `]` or `}`.
    pub allow_trailing_commas: bool,
    /// Two significant siblings with no intervening `,`.
    pub allow_missing_commas: bool,
    /// `'...'` strings, with the same escapes as `"..."`.
    pub allow_single_quoted_strings: bool,
    /// `0x`-prefixed hexadecimal integer literals.
    pub allow_hexadecimal_numbers: bool,
    /// A leading `+` before a number literal.
    pub allow_unary_plus_numbers: bool,
    /// Bare-identifier object property names (`WORD` tokens), not just
    /// string literals.
    pub allow_loose_object_property_names: bool,
}

impl ParseOptions {
    /// Every extension enabled. Default options for [`crate::parse`] and
    /// [`crate::parse_to_value`].
    pub fn permissive() -> Self {
        Self {
            allow_comments: true,
            allow_trailing_commas: true,
            allow_missing_commas: true,
            allow_single_quoted_strings: true,
            allow_hexadecimal_numbers: true,
            allow_unary_plus_numbers: true,
            allow_loose_object_property_names: true,
        }
    }

    /// Every extension disabled: strict JSON. Default options for
    /// [`crate::parse_strict`] and [`crate::parse_to_value_strict`].
    pub fn strict() -> Self {
        Self {
            allow_comments: false,
            allow_trailing_commas: false,
            allow_missing_commas: false,
            allow_single_quoted_strings: false,
            allow_hexadecimal_numbers: false,
            allow_unary_plus_numbers: false,
            allow_loose_object_property_names: false,
        }
    }

    /// Apply a partial override on top of `self`, returning the merged
    /// options. `patch` is applied field-by-field via the closure so
    /// callers can flip a handful of flags without restating the rest:
    ///
    /// ```
    /// use jsonc_cst::ParseOptions;
    ///
    /// let opts = ParseOptions::strict().merge_over(|o| o.allow_comments = true);
    /// assert!(opts.allow_comments);
    /// assert!(!opts.allow_trailing_commas);
    /// ```
    pub fn merge_over(mut self, patch: impl FnOnce(&mut Self)) -> Self {
        patch(&mut self);
        self
    }

    /// `O' ⊇ O` in the spec's option-monotonicity property: every flag
    /// enabled in `self` is also enabled in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        (!self.allow_comments || other.allow_comments)
            && (!self.allow_trailing_commas || other.allow_trailing_commas)
            && (!self.allow_missing_commas || other.allow_missing_commas)
            && (!self.allow_single_quoted_strings || other.allow_single_quoted_strings)
            && (!self.allow_hexadecimal_numbers || other.allow_hexadecimal_numbers)
            && (!self.allow_unary_plus_numbers || other.allow_unary_plus_numbers)
            && (!self.allow_loose_object_property_names
                || other.allow_loose_object_property_names)
    }
}

impl Default for ParseOptions {
    /// Same as [`ParseOptions::permissive`] — `parse`'s default, and the
    /// more forgiving of the two presets, is the least surprising `Default`.
    fn default() -> Self {
        Self::permissive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissive_enables_everything() {
        let o = ParseOptions::permissive();
        assert!(o.allow_comments);
        assert!(o.allow_trailing_commas);
        assert!(o.allow_missing_commas);
        assert!(o.allow_single_quoted_strings);
        assert!(o.allow_hexadecimal_numbers);
        assert!(o.allow_unary_plus_numbers);
        assert!(o.allow_loose_object_property_names);
    }

    #[test]
    fn strict_disables_everything() {
        let o = ParseOptions::strict();
        assert!(!o.allow_comments);
        assert!(!o.allow_trailing_commas);
        assert!(!o.allow_missing_commas);
        assert!(!o.allow_single_quoted_strings);
        assert!(!o.allow_hexadecimal_numbers);
        assert!(!o.allow_unary_plus_numbers);
        assert!(!o.allow_loose_object_property_names);
    }

    #[test]
    fn merge_over_only_touches_patched_fields() {
        let o = ParseOptions::strict().merge_over(|o| {
            o.allow_comments = true;
            o.allow_trailing_commas = true;
        });
        assert!(o.allow_comments);
        assert!(o.allow_trailing_commas);
        assert!(!o.allow_missing_commas);
    }

    #[test]
    fn subset_relation() {
        let strict = ParseOptions::strict();
        let permissive = ParseOptions::permissive();
        assert!(strict.is_subset_of(&permissive));
        assert!(!permissive.is_subset_of(&strict));
        assert!(strict.is_subset_of(&strict));
    }
}
