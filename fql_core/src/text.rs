//! Canonical text form of a parsed tree
//!
//! `to_text` renders a tree back into query syntax. Every inner node with
//! two children is parenthesized, so the output is unambiguous regardless
//! of how the original query was grouped, and wrapper nodes with a single
//! child collapse to that child. The output always re-parses, and
//! serializing the re-parsed tree reproduces it character for character.

use crate::expression::{BoolOperator, Expression, Value};
use crate::tree::Node;

/// Render a tree as canonical query text.
pub fn to_text(node: &Node) -> String {
    if let Some(expression) = &node.expression {
        return expression_text(expression);
    }
    match (&node.left, &node.right) {
        (Some(left), Some(right)) => {
            let op = node.bool_operator.unwrap_or(BoolOperator::And);
            format!("({} {} {})", to_text(left), op.as_str(), to_text(right))
        }
        (Some(left), None) => to_text(left),
        (None, Some(right)) => to_text(right),
        (None, None) => String::new(),
    }
}

fn expression_text(expression: &Expression) -> String {
    format!(
        "{}{}{}",
        expression.key.raw(),
        expression.operator.as_str(),
        value_text(&expression.value)
    )
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::String(s) => {
            if needs_quoting(s) {
                let escaped = s.replace('\'', "\\'");
                format!("'{}'", escaped)
            } else {
                s.clone()
            }
        }
    }
}

/// A string value is quoted when writing it bare would change how the
/// text parses.
fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s.chars()
            .any(|c| matches!(c, ' ' | '\'' | '"' | '(' | ')' | '=' | '\n'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn round(text: &str) -> String {
        to_text(&parse(text).unwrap().root.unwrap())
    }

    #[test]
    fn test_single_expression() {
        assert_eq!(round("status=200"), "status=200");
        assert_eq!(round("price>=19.99"), "price>=19.99");
        assert_eq!(round("name!=alice"), "name!=alice");
    }

    #[test]
    fn test_combination_is_parenthesized() {
        assert_eq!(round("a=1 and b=2"), "(a=1 and b=2)");
        assert_eq!(round("a=1 and b=2 or c=3"), "((a=1 and b=2) or c=3)");
    }

    #[test]
    fn test_groups_collapse() {
        assert_eq!(round("(a=1) and b=2"), "(a=1 and b=2)");
        assert_eq!(round("((a=1))"), "a=1");
    }

    #[test]
    fn test_string_with_space_is_quoted() {
        assert_eq!(round("name='John Doe'"), "name='John Doe'");
    }

    #[test]
    fn test_plain_string_stays_bare() {
        assert_eq!(round("name='alice'"), "name=alice");
    }

    #[test]
    fn test_embedded_quote_is_escaped() {
        assert_eq!(round("msg='it\\'s'"), "msg='it\\'s'");
    }

    #[test]
    fn test_empty_string_is_quoted() {
        assert_eq!(round("a=''"), "a=''");
    }

    #[test]
    fn test_output_reparses_to_same_text() {
        for text in [
            "a=1",
            "a=1 and b=2 or c=3",
            "(a=1 or b=2) and c=3",
            "name='John Doe' and age>=30",
            "labels:app=web",
        ] {
            let once = round(text);
            assert_eq!(round(&once), once, "{text}");
        }
    }
}
