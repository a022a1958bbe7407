//! # Conformance Property Tests
//!
//! Properties of the Type Checker that must hold for every input, not just
//! the hand-picked examples in the unit tests.

use envv_core::{conforms, is_iso8601, SemanticType};
use proptest::prelude::*;

proptest! {
    /// `string` accepts every present value.
    #[test]
    fn string_accepts_any_value(value in ".*") {
        prop_assert!(conforms(Some(value.as_str()), &SemanticType::String));
    }

    /// Nothing conforms when the value is unset.
    #[test]
    fn unset_never_conforms(tag in "[a-z]{1,10}") {
        let ty = SemanticType::parse_lenient(&tag);
        prop_assert!(!conforms(None, &ty));
    }

    /// Integers rendered in decimal are numbers.
    #[test]
    fn integers_are_numbers(n in any::<i64>()) {
        prop_assert!(SemanticType::Number.accepts(&n.to_string()));
    }

    /// Finite floats rendered by Rust are numbers.
    #[test]
    fn finite_floats_are_numbers(x in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
        prop_assert!(SemanticType::Number.accepts(&x.to_string()));
    }

    /// Only the two literal spellings are booleans, in any letter case.
    #[test]
    fn booleans_ignore_case(upper in proptest::collection::vec(any::<bool>(), 5)) {
        let word: String = "false"
            .chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect();
        prop_assert!(SemanticType::Boolean.accepts(&word));
    }

    /// Real calendar dates in YYYY-MM-DD form are always dates.
    #[test]
    fn valid_calendar_dates_are_dates(y in 1000i32..=9999, m in 1u32..=12, d in 1u32..=28) {
        let value = format!("{y:04}-{m:02}-{d:02}");
        prop_assert!(SemanticType::Date.accepts(&value));
    }

    /// The date recognizer never panics on arbitrary input.
    #[test]
    fn date_recognizer_never_panics(value in "\\PC*") {
        let _ = is_iso8601(&value);
    }

    /// Unrecognized tags accept everything.
    #[test]
    fn unrecognized_tags_are_permissive(tag in "[A-Z][a-z]{2,8}", value in ".*") {
        let ty = SemanticType::parse_lenient(&tag);
        prop_assert!(!ty.is_recognized());
        prop_assert!(ty.accepts(&value));
    }
}
