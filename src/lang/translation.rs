use crate::runtime::data_structures::{dictionary::Dictionary, value::Value};

/// Turn a token's text into a value.  The first interpretation that works wins, in this order:
///
/// * a word currently defined under exactly that name,
/// * a signed 64 bit integer,
/// * a float, using Rust's float syntax so `inf` and `nan` are accepted,
/// * `true` or `false` in any letter case,
/// * the text itself as a string.
///
/// Translation never fails, anything unrecognized is a string.
pub fn translate(dictionary: &Dictionary, text: &str) -> Value {
    if let Some(word) = dictionary.lookup(text) {
        return Value::Word(word);
    }

    if let Ok(value) = text.parse::<i64>() {
        return Value::Int(value);
    }

    if let Ok(value) = text.parse::<f64>() {
        return Value::Float(value);
    }

    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }

    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    Value::String(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lang::source_buffer::SourceLocation,
        runtime::data_structures::word::Word,
    };
    use std::rc::Rc;
    use test_case::test_case;

    #[test_case("42", Value::Int(42); "integer")]
    #[test_case("-7", Value::Int(-7); "negative integer")]
    #[test_case("+7", Value::Int(7); "signed integer")]
    #[test_case("2.5", Value::Float(2.5); "float")]
    #[test_case("1e3", Value::Float(1000.0); "exponent")]
    #[test_case("TRUE", Value::Bool(true); "upper case bool")]
    #[test_case("false", Value::Bool(false); "bool")]
    #[test_case("hello", Value::from("hello"); "string fallback")]
    #[test_case("12abc", Value::from("12abc"); "not quite a number")]
    fn translates_literals(text: &str, expected: Value) {
        assert_eq!(translate(&Dictionary::new(), text), expected);
    }

    #[test]
    fn infinity_is_a_float() {
        assert_eq!(translate(&Dictionary::new(), "inf"), Value::Float(f64::INFINITY));
        assert!(matches!(translate(&Dictionary::new(), "nan"), Value::Float(value) if value.is_nan()));
    }

    #[test]
    fn defined_words_shadow_numbers() {
        let mut dictionary = Dictionary::new();
        let word = Rc::new(Word::new_composite("1".to_string(), SourceLocation::new()));

        dictionary.define(word.clone());

        assert_eq!(translate(&dictionary, "1"), Value::Word(word));
        assert_eq!(translate(&dictionary, "2"), Value::Int(2));
    }
}
