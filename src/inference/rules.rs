//! Ordered rule table mapping annotation text to canonical Ruby class names
//!
//! Rules are evaluated top to bottom against one annotation value. Every
//! matching `Add` rule contributes its type; a matching `Remove` rule drops a
//! type an earlier rule added. New rules are appended, never reordered.

use std::collections::BTreeSet;

/// Words that make an annotation depend on the receiver or the arguments
pub const AMBIGUOUS_WORDS: &[&str] = &["obj", "class", "klass", "value", "self", "key", "result"];

/// Methods whose `result` annotation stands for a number of the receiver's type
pub const NUMERIC_RESULT_METHODS: &[&str] = &["modulo", "quo", "remainder"];

const NUMERIC_RESULT_TYPES: &[&str] = &["Fixnum", "Bignum", "Float"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Substring of the value, ignoring quoted and bracketed parts
    Contains(&'static str),
    /// Whole word of the value, words split on anything but letters and digits
    Word(&'static str),
    /// The whole value, case-insensitive
    Equals(&'static str),
    /// Value starts with the first and ends with the second character
    Wrapped(char, char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub pattern: Pattern,
    pub type_name: &'static str,
    pub action: Action,
}

const fn add(pattern: Pattern, type_name: &'static str) -> Rule {
    Rule {
        pattern,
        type_name,
        action: Action::Add,
    }
}

const fn remove(pattern: Pattern, type_name: &'static str) -> Rule {
    Rule {
        pattern,
        type_name,
        action: Action::Remove,
    }
}

use Pattern::{Contains, Equals, Word, Wrapped};

pub static RULES: &[Rule] = &[
    add(Wrapped('"', '"'), "String"),
    add(Wrapped('\'', '\''), "String"),
    add(Wrapped('[', ']'), "Array"),
    add(Wrapped('{', '}'), "Hash"),
    add(Contains("nil"), "NilClass"),
    add(Word("true"), "TrueClass"),
    add(Word("false"), "FalseClass"),
    add(Contains("bool"), "TrueClass"),
    add(Contains("bool"), "FalseClass"),
    add(Contains("str"), "String"),
    remove(Contains("struct"), "String"),
    add(Contains("struct"), "Struct"),
    add(Word("name"), "String"),
    add(Contains("sym"), "Symbol"),
    add(Contains("arr"), "Array"),
    add(Word("ary"), "Array"),
    add(Contains("hash"), "Hash"),
    add(Word("hsh"), "Hash"),
    add(Contains("int"), "Fixnum"),
    add(Contains("fixnum"), "Fixnum"),
    add(Word("0"), "Fixnum"),
    add(Word("1"), "Fixnum"),
    add(Contains("bignum"), "Bignum"),
    add(Contains("numeric"), "Numeric"),
    add(Contains("float"), "Float"),
    add(Word("flt"), "Float"),
    add(Equals("0.0"), "Float"),
    remove(Equals("0.0"), "Fixnum"),
    add(Contains("rational"), "Rational"),
    add(Contains("complex"), "Complex"),
    add(Contains("range"), "Range"),
    add(Word("rng"), "Range"),
    add(Contains("regex"), "Regexp"),
    add(Contains("matchdata"), "MatchData"),
    add(Word("io"), "IO"),
    add(Word("ios"), "IO"),
    add(Contains("file"), "File"),
    remove(Equals("file_name"), "File"),
    add(Contains("dir"), "Dir"),
    remove(Equals("dir_name"), "Dir"),
    add(Word("time"), "Time"),
    add(Word("proc"), "Proc"),
    add(Word("lambda"), "Proc"),
    add(Word("method"), "Method"),
    add(Contains("thread"), "Thread"),
    add(Contains("exception"), "Exception"),
    add(Contains("binding"), "Binding"),
    add(Contains("enum"), "Enumerator"),
];

/// One annotation value prepared for matching
#[derive(Debug)]
pub struct AnnotationValue<'a> {
    raw: &'a str,
    lower: String,
    /// Lowercase text with `"..."` and `[...]` parts removed
    unwrapped: String,
    words: Vec<String>,
}

impl<'a> AnnotationValue<'a> {
    pub fn new(raw: &'a str) -> Self {
        let raw = raw.trim();
        let lower = raw.to_lowercase();
        let unwrapped = strip_literals(&lower);
        let words = unwrapped
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            raw,
            lower,
            unwrapped,
            words,
        }
    }

    /// Substring test that ignores quoted strings and array literals
    pub fn has(&self, token: &str) -> bool {
        self.unwrapped.contains(token)
    }

    pub fn has_any(&self, tokens: &[&str]) -> bool {
        tokens.iter().any(|token| self.has(token))
    }

    pub fn matches(&self, pattern: Pattern) -> bool {
        match pattern {
            Contains(token) => self.has(token),
            Word(word) => self.words.iter().any(|w| w == word),
            Equals(text) => self.lower == text,
            Wrapped(open, close) => {
                self.raw.chars().count() >= 2
                    && self.raw.starts_with(open)
                    && self.raw.ends_with(close)
            }
        }
    }
}

/// Drops double-quoted strings and bracketed parts, including nested brackets.
/// An unterminated literal runs to the end of the text.
fn strip_literals(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_quotes = false;
    let mut depth = 0usize;

    for c in text.chars() {
        match c {
            '"' if depth == 0 => in_quotes = !in_quotes,
            '[' if !in_quotes => depth += 1,
            ']' if !in_quotes && depth > 0 => depth -= 1,
            _ if in_quotes || depth > 0 => {}
            _ => result.push(c),
        }
    }
    result
}

/// Runs `rules` in order over `value` and returns the surviving type names.
pub fn apply_rules(rules: &[Rule], value: &AnnotationValue<'_>) -> BTreeSet<&'static str> {
    let mut types = BTreeSet::new();
    for rule in rules.iter().filter(|rule| value.matches(rule.pattern)) {
        match rule.action {
            Action::Add => {
                types.insert(rule.type_name);
            }
            Action::Remove => {
                types.remove(rule.type_name);
            }
        }
    }
    types
}

/// Types of `result` for the numeric methods that return their receiver's kind
pub fn numeric_result_types(method_name: &str) -> Option<BTreeSet<&'static str>> {
    if !NUMERIC_RESULT_METHODS.contains(&method_name) {
        return None;
    }
    let mut types: BTreeSet<_> = NUMERIC_RESULT_TYPES.iter().copied().collect();
    if method_name == "quo" {
        types.insert("Rational");
    }
    Some(types)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(value: &str) -> Vec<&'static str> {
        apply_rules(RULES, &AnnotationValue::new(value))
            .into_iter()
            .collect()
    }

    #[test]
    fn test_wrapped_literals() {
        assert_eq!(types("\"abc\""), vec!["String"]);
        assert_eq!(types("'abc'"), vec!["String"]);
        assert_eq!(types("[a, b]"), vec!["Array"]);
        assert_eq!(types("{a => b}"), vec!["Hash"]);
    }

    #[test]
    fn test_contains_rules_union() {
        assert_eq!(types("new_str or nil"), vec!["NilClass", "String"]);
        assert_eq!(types("integer"), vec!["Fixnum"]);
        assert_eq!(types("an_array"), vec!["Array"]);
        assert_eq!(types("true or false"), vec!["FalseClass", "TrueClass"]);
    }

    #[test]
    fn test_bare_digits_are_fixnum() {
        assert_eq!(types("0"), vec!["Fixnum"]);
        assert_eq!(types("-1, 0, +1"), vec!["Fixnum"]);
        assert!(types("10").is_empty());
    }

    #[test]
    fn test_remove_rules_override_earlier_matches() {
        assert_eq!(types("0.0"), vec!["Float"]);
        assert_eq!(types("dir_name"), vec!["String"]);
        assert_eq!(types("a_dir"), vec!["Dir"]);
        assert_eq!(types("struct"), vec!["Struct"]);
    }

    #[test]
    fn test_word_rules_do_not_match_inside_words() {
        assert!(types("ratio").is_empty());
        assert_eq!(types("an_io"), vec!["IO"]);
    }

    #[test]
    fn test_has_ignores_literals() {
        let value = AnnotationValue::new("\"class\"");
        assert!(!value.has("class"));
        assert!(!value.has_any(AMBIGUOUS_WORDS));

        let array = AnnotationValue::new("[key, value]");
        assert!(!array.has_any(AMBIGUOUS_WORDS));

        let plain = AnnotationValue::new("an_object");
        assert!(plain.has("obj"));
    }

    #[test]
    fn test_rules_are_order_significant() {
        let add_then_remove = [
            add(Contains("x"), "X"),
            remove(Contains("x"), "X"),
        ];
        let remove_then_add = [
            remove(Contains("x"), "X"),
            add(Contains("x"), "X"),
        ];
        let value = AnnotationValue::new("x");
        assert!(apply_rules(&add_then_remove, &value).is_empty());
        assert_eq!(apply_rules(&remove_then_add, &value).len(), 1);
    }

    #[test]
    fn test_numeric_result_types() {
        let quo: Vec<_> = numeric_result_types("quo").unwrap().into_iter().collect();
        assert_eq!(quo, vec!["Bignum", "Fixnum", "Float", "Rational"]);

        let modulo: Vec<_> = numeric_result_types("modulo").unwrap().into_iter().collect();
        assert_eq!(modulo, vec!["Bignum", "Fixnum", "Float"]);

        assert!(numeric_result_types("divmod").is_none());
    }
}
