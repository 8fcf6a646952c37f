//! Return-type heuristics over call-seq and documentation text
//!
//! Ruby sources carry no type declarations, but documented methods usually
//! describe their result in call-seq lines such as `str.length => integer`.
//! This module reads those lines and guesses the set of classes a method can
//! return. The result drives completion after chained calls (`a.foo.`).
//!
//! The engine is deliberately conservative: a single annotation line that
//! depends on the receiver or the arguments discards everything collected for
//! the method.

pub mod rules;

pub use rules::{Action, AnnotationValue, Pattern, RULES, Rule, apply_rules};

use rules::{AMBIGUOUS_WORDS, numeric_result_types};
use std::collections::BTreeSet;

/// A guessed return type, before resolution against the symbol cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReturnType {
    /// Canonical class name such as `String`
    Named(&'static str),
    /// The class the method is declared in (`-> self`)
    EnclosingClass,
}

/// Annotation marker; at most one kind is read per method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `=>`, the explicit "returns" arrow
    FatArrow,
    /// `->`
    Arrow,
}

impl Marker {
    pub fn token(self) -> &'static str {
        match self {
            Marker::FatArrow => "=>",
            Marker::Arrow => "->",
        }
    }

    /// `=>` wins whenever the text contains it anywhere
    pub fn detect(text: &str) -> Option<Self> {
        [Marker::FatArrow, Marker::Arrow]
            .into_iter()
            .find(|marker| text.contains(marker.token()))
    }
}

/// Outcome for one annotation value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Types(BTreeSet<ReturnType>),
    /// Depends on arguments or receiver; invalidates the whole method
    Undetermined,
}

/// Classifies a single annotation value for the method `method_name`.
pub fn classify(method_name: &str, value: &str) -> Classification {
    let value = AnnotationValue::new(value);

    if value.has_any(AMBIGUOUS_WORDS) {
        if value.has("self") {
            return Classification::Types(BTreeSet::from([ReturnType::EnclosingClass]));
        }
        if value.has("result") {
            if let Some(types) = numeric_result_types(method_name) {
                return Classification::Types(types.into_iter().map(ReturnType::Named).collect());
            }
        }
        return Classification::Undetermined;
    }

    Classification::Types(
        apply_rules(RULES, &value)
            .into_iter()
            .map(ReturnType::Named)
            .collect(),
    )
}

/// Guesses the return types of `method_name` from its annotation `text`.
///
/// Returns `None` when no annotation line yields a type, or when any line is
/// undetermined.
pub fn infer_return_types(method_name: &str, text: &str) -> Option<BTreeSet<ReturnType>> {
    let marker = Marker::detect(text)?;
    let token = marker.token();
    let mut types = BTreeSet::new();

    for line in text.lines() {
        let Some(position) = line.find(token) else {
            continue;
        };
        let value = line[position + token.len()..].trim();
        if value.is_empty() {
            continue;
        }

        match classify(method_name, value) {
            Classification::Types(found) => types.extend(found),
            Classification::Undetermined => {
                tracing::trace!(
                    method = method_name,
                    value,
                    "return type undetermined, discarding"
                );
                return None;
            }
        }
    }

    (!types.is_empty()).then_some(types)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&'static str]) -> Option<BTreeSet<ReturnType>> {
        Some(names.iter().copied().map(ReturnType::Named).collect())
    }

    #[test]
    fn test_returns_a_string() {
        assert_eq!(
            infer_return_types("foo", "-> returns a String"),
            named(&["String"])
        );
    }

    #[test]
    fn test_ambiguous_result_discards() {
        assert_eq!(infer_return_types("foo", "-> the result"), None);
    }

    #[test]
    fn test_numeric_result_for_quo() {
        assert_eq!(
            infer_return_types("quo", "-> result"),
            named(&["Fixnum", "Bignum", "Float", "Rational"])
        );
        assert_eq!(
            infer_return_types("remainder", "num.remainder(numeric) => result"),
            named(&["Fixnum", "Bignum", "Float"])
        );
    }

    #[test]
    fn test_self_maps_to_enclosing_class() {
        assert_eq!(
            infer_return_types("concat", "str.concat(obj) => self"),
            Some(BTreeSet::from([ReturnType::EnclosingClass]))
        );
    }

    #[test]
    fn test_lines_are_unioned() {
        let text = "str.slice(fixnum) => fixnum or nil\nstr.slice(range) => new_str or nil";
        assert_eq!(
            infer_return_types("slice", text),
            named(&["Fixnum", "NilClass", "String"])
        );
    }

    #[test]
    fn test_one_ambiguous_line_discards_everything() {
        let text = "hsh.fetch(key) => str\nhsh.fetch(key, default) => obj";
        assert_eq!(infer_return_types("fetch", text), None);
    }

    #[test]
    fn test_fat_arrow_takes_priority() {
        let text = "ary.first -> obj\nary.length => integer";
        assert_eq!(Marker::detect(text), Some(Marker::FatArrow));
        // The `->` line would be undetermined if it were read
        assert_eq!(infer_return_types("first", text), named(&["Fixnum"]));
        assert_eq!(Marker::detect("a -> b"), Some(Marker::Arrow));
    }

    #[test]
    fn test_no_marker_or_no_types() {
        assert_eq!(infer_return_types("foo", "Plain documentation"), None);
        assert_eq!(infer_return_types("foo", "foo =>   "), None);
        assert_eq!(infer_return_types("foo", "foo => something"), None);
    }

    #[test]
    fn test_quoted_ambiguous_word_is_literal() {
        assert_eq!(
            infer_return_types("name", "obj.name => \"class\""),
            named(&["String"])
        );
    }
}
