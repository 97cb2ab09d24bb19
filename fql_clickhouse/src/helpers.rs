//! SQL parameter escaping and operation validation

use crate::error::{GeneratorError, GeneratorResult};
use crate::field::ValueKind;
use fql_core::{Operator, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static JSON_KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z_][.a-zA-Z0-9_-]*$").expect("hardcoded pattern compiles")
});

/// (column kind, operator, value kind) combinations ClickHouse cannot
/// satisfy.
static FORBIDDEN_OPERATIONS: Lazy<HashSet<(ValueKind, Operator, ValueKind)>> = Lazy::new(|| {
    let mut set = HashSet::new();
    // Ordering a string column against numbers
    for op in [
        Operator::LowerThan,
        Operator::GreaterThan,
        Operator::EqualOrGreaterThan,
        Operator::EqualOrLowerThan,
    ] {
        set.insert((ValueKind::String, op, ValueKind::Int));
        set.insert((ValueKind::String, op, ValueKind::Float));
        set.insert((ValueKind::Bool, op, ValueKind::Bool));
    }
    // Regex over numeric columns
    for op in [Operator::Regex, Operator::NotRegex] {
        set.insert((ValueKind::Int, op, ValueKind::String));
        set.insert((ValueKind::Float, op, ValueKind::String));
    }
    set
});

/// Category of an expression value for the forbidden-operation check.
pub fn value_kind(value: &Value) -> ValueKind {
    match value {
        Value::Int(_) => ValueKind::Int,
        Value::Float(_) => ValueKind::Float,
        Value::String(_) => ValueKind::String,
    }
}

/// Reject operations the column type cannot support. Columns without a
/// scalar kind are not validated.
pub fn validate_operation(
    value: &Value,
    field_kind: Option<ValueKind>,
    operator: Operator,
) -> GeneratorResult<()> {
    let Some(field_kind) = field_kind else {
        return Ok(());
    };

    if FORBIDDEN_OPERATIONS.contains(&(field_kind, operator, value_kind(value))) {
        return Err(GeneratorError::forbidden_operation(
            field_kind.as_str(),
            operator.as_str(),
        ));
    }
    Ok(())
}

pub fn validate_json_path_part(part: &str) -> GeneratorResult<()> {
    if part.is_empty() || !JSON_KEY_PATTERN.is_match(part) {
        return Err(GeneratorError::invalid_json_path(part));
    }
    Ok(())
}

/// Quote and escape a value as a SQL parameter. Numbers render bare.
pub fn escape_param(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::String(s) => escape_string_param(s),
    }
}

pub fn escape_string_param(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    escaped.push('\'');
    for c in s.chars() {
        match c {
            '\u{8}' => escaped.push_str("\\b"),
            '\u{c}' => escaped.push_str("\\f"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\0' => escaped.push_str("\\0"),
            '\u{7}' => escaped.push_str("\\a"),
            '\u{b}' => escaped.push_str("\\v"),
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            other => escaped.push(other),
        }
    }
    escaped.push('\'');
    escaped
}

/// Whether the value is numeric, or a string that reads as a number.
pub fn is_number(value: &Value) -> bool {
    match value {
        Value::Int(_) | Value::Float(_) => true,
        Value::String(s) => s.parse::<f64>().is_ok(),
    }
}

/// Translate `*` wildcards to SQL `LIKE` syntax. Returns whether any
/// wildcard was found, plus the rewritten pattern: unescaped `*` becomes
/// `%`, `\*` becomes a literal `*`, and literal `%` is escaped.
pub fn prepare_like_pattern(value: &str) -> (bool, String) {
    let chars: Vec<char> = value.chars().collect();
    let mut pattern_found = false;
    let mut out = String::with_capacity(value.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == '*' {
            if i > 0 && chars[i - 1] == '\\' {
                out.push('*');
            } else {
                out.push('%');
                pattern_found = true;
            }
        } else if c == '%' {
            pattern_found = true;
            out.push('\\');
            out.push('%');
        } else if c == '\\' && chars.get(i + 1) == Some(&'*') {
            out.push('\\');
        } else {
            out.push(c);
        }
    }
    (pattern_found, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_escape_param() {
        assert_eq!(escape_param(&Value::Int(42)), "42");
        assert_eq!(escape_param(&Value::Float(0.5)), "0.5");
        assert_eq!(
            escape_param(&Value::String("plain".to_string())),
            "'plain'"
        );
        assert_eq!(
            escape_param(&Value::String("it's".to_string())),
            "'it\\'s'"
        );
        assert_eq!(
            escape_param(&Value::String("a\nb\\c".to_string())),
            "'a\\nb\\\\c'"
        );
    }

    #[test]
    fn test_is_number() {
        assert!(is_number(&Value::Int(1)));
        assert!(is_number(&Value::Float(0.5)));
        assert!(is_number(&Value::String("42".to_string())));
        assert!(!is_number(&Value::String("abc".to_string())));
    }

    #[test]
    fn test_like_pattern_translation() {
        assert_eq!(prepare_like_pattern("web*"), (true, "web%".to_string()));
        assert_eq!(prepare_like_pattern("*web*"), (true, "%web%".to_string()));
        assert_eq!(prepare_like_pattern("plain"), (false, "plain".to_string()));
        // Escaped wildcard stays literal
        assert_eq!(
            prepare_like_pattern("a\\*b"),
            (false, "a\\*b".to_string())
        );
        // Literal percent is escaped and forces LIKE
        assert_eq!(prepare_like_pattern("50%"), (true, "50\\%".to_string()));
    }

    #[test]
    fn test_validate_operation() {
        let string_gt_int = validate_operation(
            &Value::Int(1),
            Some(ValueKind::String),
            Operator::GreaterThan,
        );
        assert_matches!(string_gt_int, Err(GeneratorError::ForbiddenOperation { .. }));

        let int_regex = validate_operation(
            &Value::String("^2".to_string()),
            Some(ValueKind::Int),
            Operator::Regex,
        );
        assert_matches!(int_regex, Err(GeneratorError::ForbiddenOperation { .. }));

        assert!(validate_operation(
            &Value::Int(200),
            Some(ValueKind::Int),
            Operator::GreaterThan
        )
        .is_ok());
        assert!(validate_operation(&Value::Int(1), None, Operator::Regex).is_ok());
    }

    #[test]
    fn test_json_path_parts() {
        assert!(validate_json_path_part("user").is_ok());
        assert!(validate_json_path_part("user_id-2.x").is_ok());
        assert_matches!(
            validate_json_path_part(""),
            Err(GeneratorError::InvalidJsonPath { .. })
        );
        assert_matches!(
            validate_json_path_part("2user"),
            Err(GeneratorError::InvalidJsonPath { .. })
        );
        assert_matches!(
            validate_json_path_part("a b"),
            Err(GeneratorError::InvalidJsonPath { .. })
        );
    }
}
