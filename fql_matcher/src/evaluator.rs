//! Tree evaluation against records
//!
//! The evaluator walks the parsed tree and compares record values with
//! expression values. Comparison is typed: numbers compare numerically,
//! strings lexically, booleans and null for equality only; mismatched
//! types never match. A field that is absent from the record matches only
//! under `!=`.
//!
//! Regex patterns compile once per evaluator and are reused across calls,
//! keyed by the exact pattern text.

use crate::error::{MatchError, MatchResult};
use crate::record::Record;
use fql_core::log_error;
use fql_core::logging::codes;
use fql_core::{BoolOperator, Expression, Node, Operator, Value};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Evaluates trees against records, caching compiled regexes.
pub struct Evaluator {
    cache: HashMap<String, Regex>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Evaluate a tree against a record.
    pub fn evaluate(&mut self, root: &Node, record: &Record) -> MatchResult<bool> {
        if let Some(expression) = &root.expression {
            return self.eval_expression(expression, record);
        }

        let left = match &root.left {
            Some(node) => Some(self.evaluate(node, record)?),
            None => None,
        };
        let right = match &root.right {
            Some(node) => Some(self.evaluate(node, record)?),
            None => None,
        };

        match (left, right) {
            (Some(l), Some(r)) => match root.bool_operator {
                Some(BoolOperator::And) => Ok(l && r),
                Some(BoolOperator::Or) => Ok(l || r),
                None => Err(MatchError::malformed_tree(
                    "two children without a bool operator",
                )),
            },
            (Some(l), None) => Ok(l),
            (None, Some(r)) => Ok(r),
            (None, None) => Err(MatchError::malformed_tree("node with no children")),
        }
    }

    fn get_regex(&mut self, pattern: &str) -> MatchResult<&Regex> {
        if !self.cache.contains_key(pattern) {
            let regex = Regex::new(pattern).map_err(|err| {
                let error = MatchError::invalid_regex(pattern, &err.to_string());
                log_error!(codes::matcher::INVALID_REGEX, &error.to_string(),
                    "pattern" => pattern
                );
                error
            })?;
            self.cache.insert(pattern.to_string(), regex);
        }
        // Just inserted above when absent
        Ok(&self.cache[pattern])
    }

    fn eval_expression(&mut self, expression: &Expression, record: &Record) -> MatchResult<bool> {
        let Some(record_value) = record.get_value(&expression.key) else {
            // Absent fields match only a negated equality
            return Ok(expression.operator == Operator::NotEquals);
        };

        match expression.operator {
            Operator::Equals => Ok(values_equal(&record_value, &expression.value)),
            Operator::NotEquals => Ok(!values_equal(&record_value, &expression.value)),
            Operator::Regex => {
                let regex = self.get_regex(&expression.value.to_text())?;
                Ok(regex.is_match(&json_text(&record_value)))
            }
            Operator::NotRegex => {
                let regex = self.get_regex(&expression.value.to_text())?;
                Ok(!regex.is_match(&json_text(&record_value)))
            }
            Operator::GreaterThan => {
                Ok(compare(&record_value, &expression.value) == Some(Ordering::Greater))
            }
            Operator::LowerThan => {
                Ok(compare(&record_value, &expression.value) == Some(Ordering::Less))
            }
            Operator::EqualOrGreaterThan => Ok(matches!(
                compare(&record_value, &expression.value),
                Some(Ordering::Greater) | Some(Ordering::Equal)
            )),
            Operator::EqualOrLowerThan => Ok(matches!(
                compare(&record_value, &expression.value),
                Some(Ordering::Less) | Some(Ordering::Equal)
            )),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn values_equal(record: &JsonValue, value: &Value) -> bool {
    match (record, value) {
        (JsonValue::Number(n), Value::Int(i)) => {
            n.as_i64() == Some(*i) || n.as_f64() == Some(*i as f64)
        }
        (JsonValue::Number(n), Value::Float(f)) => n.as_f64() == Some(*f),
        (JsonValue::String(s), Value::String(v)) => s == v,
        (JsonValue::Bool(b), Value::String(v)) => {
            (*b && v == "true") || (!*b && v == "false")
        }
        (JsonValue::Null, Value::String(v)) => v == "null",
        _ => false,
    }
}

/// Ordering between a record value and an expression value; `None` for
/// type combinations that have no order.
fn compare(record: &JsonValue, value: &Value) -> Option<Ordering> {
    match (record, value) {
        (JsonValue::Number(n), _) => {
            let left = n.as_f64()?;
            let right = value.as_f64()?;
            left.partial_cmp(&right)
        }
        (JsonValue::String(s), Value::String(v)) => Some(s.as_str().cmp(v.as_str())),
        _ => None,
    }
}

/// String form of a record value, as regex input.
fn json_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use fql_core::parse;
    use serde_json::json;

    fn matches_record(query: &str, data: JsonValue) -> bool {
        let root = parse(query).unwrap().root.unwrap();
        let mut evaluator = Evaluator::new();
        evaluator.evaluate(&root, &Record::new(data)).unwrap()
    }

    #[test]
    fn test_equality() {
        assert!(matches_record("status=200", json!({"status": 200})));
        assert!(!matches_record("status=200", json!({"status": 404})));
        assert!(matches_record("name=alice", json!({"name": "alice"})));
        assert!(matches_record("name!=bob", json!({"name": "alice"})));
    }

    #[test]
    fn test_numeric_cross_type_equality() {
        assert!(matches_record("ratio=0.5", json!({"ratio": 0.5})));
        assert!(matches_record("count=3", json!({"count": 3.0})));
        // Typed equality: a numeric record value never equals a string
        assert!(!matches_record("status='200'", json!({"status": 200})));
    }

    #[test]
    fn test_ordering() {
        assert!(matches_record("status>199", json!({"status": 200})));
        assert!(matches_record("status>=200", json!({"status": 200})));
        assert!(matches_record("status<=200", json!({"status": 200})));
        assert!(!matches_record("status<200", json!({"status": 200})));
        assert!(matches_record("ratio>0.25", json!({"ratio": 0.5})));
    }

    #[test]
    fn test_string_ordering_is_lexical() {
        assert!(matches_record("name>alice", json!({"name": "bob"})));
        assert!(!matches_record("name<alice", json!({"name": "bob"})));
    }

    #[test]
    fn test_ordering_across_types_never_matches() {
        assert!(!matches_record("status>abc", json!({"status": 200})));
        assert!(!matches_record("name>1", json!({"name": "alice"})));
    }

    #[test]
    fn test_missing_field() {
        assert!(!matches_record("status=200", json!({"other": 1})));
        assert!(!matches_record("status>1", json!({"other": 1})));
        assert!(!matches_record("status=~2", json!({"other": 1})));
        // Only a negated equality matches an absent field
        assert!(matches_record("status!=200", json!({"other": 1})));
    }

    #[test]
    fn test_bool_and_null() {
        assert!(matches_record("active=true", json!({"active": true})));
        assert!(matches_record("active!=true", json!({"active": false})));
        assert!(matches_record("deleted=null", json!({"deleted": null})));
        assert!(!matches_record("active=1", json!({"active": true})));
    }

    #[test]
    fn test_and_or() {
        let data = json!({"status": 200, "method": "GET"});
        assert!(matches_record("status=200 and method=GET", data.clone()));
        assert!(!matches_record("status=500 and method=GET", data.clone()));
        assert!(matches_record("status=500 or method=GET", data.clone()));
        assert!(matches_record(
            "(status=500 or method=GET) and status<300",
            data
        ));
    }

    #[test]
    fn test_nested_keys() {
        let data = json!({"labels": {"app": "web"}});
        assert!(matches_record("labels:app=web", data.clone()));
        assert!(!matches_record("labels:tier=web", data));
    }

    #[test]
    fn test_jsonstring_payload() {
        let data = json!({"payload": "{\"user\": {\"id\": 7}}"});
        assert!(matches_record("payload:user:id=7", data));
    }

    #[test]
    fn test_regex() {
        assert!(matches_record("path=~^/api/", json!({"path": "/api/users"})));
        assert!(!matches_record("path=~^/api/", json!({"path": "/health"})));
        assert!(matches_record("path!~^/api/", json!({"path": "/health"})));
        // Non-string record values match on their text form
        assert!(matches_record("status=~^2..$", json!({"status": 200})));
    }

    #[test]
    fn test_regex_cache_reuse() {
        let root = parse("path=~^/api/").unwrap().root.unwrap();
        let mut evaluator = Evaluator::new();
        for i in 0..3 {
            let record = Record::new(json!({"path": format!("/api/{i}")}));
            assert!(evaluator.evaluate(&root, &record).unwrap());
        }
        assert_eq!(evaluator.cache.len(), 1);
    }

    #[test]
    fn test_invalid_regex() {
        let root = parse("path=~'('").unwrap().root.unwrap();
        let mut evaluator = Evaluator::new();
        let record = Record::new(json!({"path": "/api"}));
        assert_matches!(
            evaluator.evaluate(&root, &record),
            Err(MatchError::InvalidRegex { .. })
        );
    }

    #[test]
    fn test_empty_node_is_malformed() {
        let node = Node::empty(None);
        let mut evaluator = Evaluator::new();
        let record = Record::new(json!({}));
        assert_matches!(
            evaluator.evaluate(&node, &record),
            Err(MatchError::MalformedTree { .. })
        );
    }
}
