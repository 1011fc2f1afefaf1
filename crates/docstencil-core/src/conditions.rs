//! Truthiness rules and the flat conditional expression language.
//!
//! A conditional tag names a main identifier and then a flat list of tokens
//! evaluated strictly left to right, with no precedence or grouping:
//! `enabled_or_confirmed_and_count_gt_3`. Operator tokens arm the next
//! operand; `not` negates the running value immediately.

use crate::data::DataValue;
use crate::error::{EngineError, Result};
use crate::variables::VariableSource;

/// How a value reads as a boolean.
///
/// Note the collection rule: an *empty* list or mapping is true. Conditional
/// sections guarded by a collection read as "is there anything left to say
/// about this?", and an empty collection keeps the section by default.
pub fn truthiness(value: &DataValue) -> bool {
    match value {
        DataValue::Absent => false,
        DataValue::Bool(b) => *b,
        DataValue::String(s) => {
            !(s.trim().is_empty() || s.eq_ignore_ascii_case("false") || s == "0")
        }
        DataValue::List(items) => items.is_empty(),
        DataValue::Map(fields) => fields.is_empty(),
        DataValue::Int(i) => *i == 1,
        DataValue::Float(_) => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Or,
    And,
    Gt,
    Lt,
    Eq,
}

impl Operator {
    fn parse(token: &str) -> Option<Operator> {
        match token.to_ascii_lowercase().as_str() {
            "or" => Some(Operator::Or),
            "and" => Some(Operator::And),
            "gt" => Some(Operator::Gt),
            "lt" => Some(Operator::Lt),
            "eq" => Some(Operator::Eq),
            _ => None,
        }
    }
}

/// Evaluates `identifier` followed by the `tokens` of a conditional tag.
///
/// An unknown main identifier seeds the expression with false rather than
/// failing, so conditionals can probe for optional data. Every other
/// resolution error still aborts.
pub fn evaluate(identifier: &str, source: &VariableSource, tokens: &[String]) -> Result<bool> {
    let lhs = match source.resolve(identifier) {
        Ok(value) => value,
        Err(EngineError::VariableNotFound { .. }) => DataValue::Absent,
        Err(err) => return Err(err),
    };
    let mut value = truthiness(&lhs);

    let mut pending: Option<Operator> = None;
    for token in tokens {
        if token.eq_ignore_ascii_case("not") {
            value = !value;
            pending = None;
            continue;
        }
        if let Some(operator) = Operator::parse(token) {
            pending = Some(operator);
            continue;
        }
        let Some(operator) = pending.take() else {
            // stray operand with no armed operator, e.g. a tag like
            // `conditionalRemove_a_b`; tolerated and skipped
            continue;
        };
        let rhs = resolve_operand(source, token);
        match operator {
            Operator::Or => value = value || truthiness(&rhs),
            Operator::And => value = value && truthiness(&rhs),
            Operator::Eq => {
                value = !lhs.is_absent() && lhs.render_text() == rhs.render_text();
            }
            Operator::Gt | Operator::Lt => {
                let sides = (
                    parse_number(&lhs.render_text()),
                    parse_number(&rhs.render_text()),
                );
                // non-numeric sides leave the running value untouched
                if let (Some(left), Some(right)) = sides {
                    value = if operator == Operator::Gt {
                        left > right
                    } else {
                        left < right
                    };
                }
            }
        }
    }

    tracing::debug!("conditional '{}' evaluated to {}", identifier, value);
    Ok(value)
}

/// Resolves an operand token, falling back to the token itself as a string
/// literal when it names nothing.
fn resolve_operand(source: &VariableSource, token: &str) -> DataValue {
    match source.resolve(token) {
        Ok(value) if !value.is_absent() => value,
        _ => DataValue::String(token.to_string()),
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(number) => Some(number),
        Err(_) => trimmed.parse::<i64>().ok().map(|i| i as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flags() -> VariableSource {
        let value: DataValue = json!({
            "yes": true,
            "no": false,
            "count": 1,
            "zero": 0,
            "many": 5,
            "ratio": 0.25,
            "word": "hello",
            "denial": "false",
            "blank": "   ",
            "empty_list": [],
            "full_list": [1, 2],
            "empty_map": {},
            "person": { "name": "Ada" }
        })
        .into();
        VariableSource::from_value(value).unwrap().lenient()
    }

    fn eval(identifier: &str, tokens: &[&str]) -> bool {
        let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        evaluate(identifier, &flags(), &tokens).unwrap()
    }

    #[test]
    fn test_truthiness_of_scalars() {
        assert!(truthiness(&DataValue::Bool(true)));
        assert!(!truthiness(&DataValue::Bool(false)));
        assert!(!truthiness(&DataValue::Absent));
        assert!(truthiness(&DataValue::Int(1)));
        assert!(!truthiness(&DataValue::Int(0)));
        assert!(!truthiness(&DataValue::Int(7)));
        assert!(truthiness(&DataValue::Float(0.0)));
    }

    #[test]
    fn test_truthiness_of_strings() {
        assert!(truthiness(&DataValue::String("yes".into())));
        assert!(!truthiness(&DataValue::String("".into())));
        assert!(!truthiness(&DataValue::String("   ".into())));
        assert!(!truthiness(&DataValue::String("false".into())));
        assert!(!truthiness(&DataValue::String("FALSE".into())));
        assert!(!truthiness(&DataValue::String("0".into())));
    }

    #[test]
    fn test_truthiness_of_collections_is_inverted() {
        assert!(truthiness(&DataValue::List(vec![])));
        assert!(!truthiness(&DataValue::List(vec![DataValue::Int(1)])));
        assert!(truthiness(&DataValue::Map(Default::default())));
    }

    #[test]
    fn test_single_identifier() {
        assert!(eval("yes", &[]));
        assert!(!eval("no", &[]));
        assert!(!eval("denial", &[]));
        assert!(!eval("blank", &[]));
    }

    #[test]
    fn test_unknown_identifier_seeds_false() {
        assert!(!eval("unheard_of", &[]));
    }

    #[test]
    fn test_not_negates_immediately() {
        assert!(eval("no", &["not"]));
        assert!(!eval("yes", &["not"]));
        assert!(eval("yes", &["not", "not"]));
    }

    #[test]
    fn test_and_or_left_to_right() {
        assert!(!eval("no", &["and", "yes"]));
        assert!(eval("no", &["or", "yes"]));
        assert!(eval("yes", &["and", "count"]));
        // strictly left to right: (no and yes) or yes
        assert!(eval("no", &["and", "yes", "or", "yes"]));
    }

    #[test]
    fn test_not_after_operand() {
        // (yes and no) -> false, then not -> true
        assert!(eval("yes", &["and", "no", "not"]));
    }

    #[test]
    fn test_eq_compares_text_forms() {
        assert!(eval("word", &["eq", "hello"]));
        assert!(!eval("word", &["eq", "goodbye"]));
        assert!(eval("count", &["eq", "1"]));
        assert!(eval("yes", &["eq", "true"]));
    }

    #[test]
    fn test_eq_against_another_variable() {
        assert!(eval("person.name", &["eq", "person.name"]));
    }

    #[test]
    fn test_eq_with_absent_lhs_is_false() {
        assert!(!eval("unheard_of", &["eq", "unheard_of"]));
    }

    #[test]
    fn test_numeric_comparisons() {
        assert!(eval("many", &["gt", "3"]));
        assert!(!eval("many", &["lt", "3"]));
        assert!(eval("ratio", &["lt", "1"]));
        assert!(eval("many", &["gt", "count"]));
    }

    #[test]
    fn test_non_numeric_comparison_keeps_running_value() {
        // "word" is not a number, so gt cannot decide; seed stays false
        assert!(!eval("word", &["gt", "3"]));
        // and a true running value stays true
        assert!(eval("yes", &["gt", "word"]));
    }

    #[test]
    fn test_operator_tokens_are_case_insensitive() {
        assert!(eval("no", &["OR", "yes"]));
        assert!(eval("no", &["Not"]));
    }

    #[test]
    fn test_operand_falls_back_to_literal() {
        // "maybe" names nothing; as a literal string it is truthy
        assert!(eval("no", &["or", "maybe"]));
    }

    #[test]
    fn test_strict_source_still_probes_the_main_identifier() {
        let strict = VariableSource::from_value(json!({"a": 1}).into()).unwrap();
        assert!(!evaluate("missing", &strict, &[]).unwrap());
    }

    #[test]
    fn test_broken_identifier_still_fails() {
        let strict = VariableSource::from_value(json!({"a": 1}).into()).unwrap();
        let result = evaluate("a.b", &strict, &[]);
        match result {
            Err(EngineError::IncorrectIdentifier { .. }) => {}
            other => panic!("Expected IncorrectIdentifier, got {:?}", other),
        }
    }
}
