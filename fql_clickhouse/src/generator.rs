//! WHERE-fragment generation
//!
//! Walks a parsed tree and renders one ClickHouse boolean expression per
//! leaf, parenthesizing `and` / `or` combinations. Leaf rendering depends
//! on how the field is addressed:
//!
//! - plain fields compare directly, with `=` / `!=` turning into `LIKE` /
//!   `NOT LIKE` when the value carries `*` wildcards, and `=~` / `!~`
//!   into `match()`
//! - `Map` columns address by key, `Array` columns by numeric index
//! - `JSON` columns use dotted-path syntax with validated path parts
//! - `jsonstring` columns probe the runtime type with `JSONType` and
//!   dispatch to the matching `JSONExtract*` via `multiIf`

use crate::error::{GeneratorError, GeneratorResult};
use crate::field::Schema;
use crate::helpers::{
    escape_param, escape_string_param, is_number, prepare_like_pattern, validate_json_path_part,
    validate_operation,
};
use fql_core::log_success;
use fql_core::logging::codes;
use fql_core::{Expression, Node, Operator};

fn operator_func(operator: Operator) -> &'static str {
    match operator {
        Operator::Equals => "equals",
        Operator::NotEquals => "notEquals",
        Operator::Regex | Operator::NotRegex => "match",
        Operator::GreaterThan => "greater",
        Operator::LowerThan => "less",
        Operator::EqualOrGreaterThan => "greaterOrEquals",
        Operator::EqualOrLowerThan => "lessOrEquals",
    }
}

/// Render one leaf comparison.
pub fn expression_to_sql(expression: &Expression, schema: &Schema) -> GeneratorResult<String> {
    let segments = expression.key.segments();
    let field_name = segments
        .first()
        .ok_or_else(|| GeneratorError::unknown_field(""))?;
    let field = schema
        .field(field_name)
        .ok_or_else(|| GeneratorError::unknown_field(field_name))?;

    if expression.key.is_segmented() {
        // `match()` has no negated form; the whole call gets inverted
        let reverse = if expression.operator == Operator::NotRegex {
            "not "
        } else {
            ""
        };
        let func = operator_func(expression.operator);

        validate_operation(
            &expression.value,
            field.normalized_kind(),
            expression.operator,
        )?;

        if field.jsonstring() {
            let path = segments[1..]
                .iter()
                .map(|s| escape_string_param(s))
                .collect::<Vec<_>>()
                .join(", ");
            let name = field.name();
            let str_value = escape_param(&expression.value);

            let mut branches = vec![format!(
                "JSONType({name}, {path}) = 'String', {func}(JSONExtractString({name}, {path}), {str_value})"
            )];
            let is_regex = matches!(expression.operator, Operator::Regex | Operator::NotRegex);
            if is_number(&expression.value) && !is_regex {
                let raw = expression.value.to_text();
                branches.push(format!(
                    "JSONType({name}, {path}) = 'Int64', {func}(JSONExtractInt({name}, {path}), {raw})"
                ));
                branches.push(format!(
                    "JSONType({name}, {path}) = 'Double', {func}(JSONExtractFloat({name}, {path}), {raw})"
                ));
                branches.push(format!(
                    "JSONType({name}, {path}) = 'Bool', {func}(JSONExtractBool({name}, {path}), {raw})"
                ));
            }
            branches.push("0".to_string());
            Ok(format!("{reverse}multiIf({})", branches.join(",")))
        } else if field.is_json() {
            for part in &segments[1..] {
                validate_json_path_part(part)?;
            }
            let path = segments[1..].join(".");
            let value = escape_param(&expression.value);
            Ok(format!(
                "{}.{} {} {}",
                field.name(),
                path,
                expression.operator.as_str(),
                value
            ))
        } else if field.is_map() {
            let map_key = segments[1..].join(":");
            let value = escape_param(&expression.value);
            Ok(format!(
                "{reverse}{func}({}['{}'], {})",
                field.name(),
                map_key,
                value
            ))
        } else if field.is_array() {
            let index_text = segments[1..].join(":");
            let index: i64 = index_text
                .parse()
                .map_err(|_| GeneratorError::invalid_array_index(&index_text))?;
            let value = escape_param(&expression.value);
            Ok(format!(
                "{reverse}{func}({}[{}], {})",
                field.name(),
                index,
                value
            ))
        } else {
            Err(GeneratorError::unsupported_path(field.column_type()))
        }
    } else {
        let value_text = expression.value.to_text();
        if !field.values().is_empty() && !field.values().contains(&value_text) {
            return Err(GeneratorError::unknown_value(&value_text));
        }

        validate_operation(
            &expression.value,
            field.normalized_kind(),
            expression.operator,
        )?;

        match expression.operator {
            Operator::Regex => Ok(format!(
                "match({}, {})",
                field.name(),
                escape_string_param(&value_text)
            )),
            Operator::NotRegex => Ok(format!(
                "not match({}, {})",
                field.name(),
                escape_string_param(&value_text)
            )),
            Operator::Equals | Operator::NotEquals => {
                let (is_like, pattern) = prepare_like_pattern(&value_text);
                let operator = if is_like {
                    if expression.operator == Operator::Equals {
                        "LIKE"
                    } else {
                        "NOT LIKE"
                    }
                } else {
                    expression.operator.as_str()
                };
                Ok(format!(
                    "{} {} {}",
                    field.name(),
                    operator,
                    escape_string_param(&pattern)
                ))
            }
            _ => {
                // Ordering keeps numeric literals bare
                let value = escape_param(&expression.value);
                Ok(format!(
                    "{} {} {}",
                    field.name(),
                    expression.operator.as_str(),
                    value
                ))
            }
        }
    }
}

/// Render a whole tree as a WHERE fragment.
pub fn to_sql(root: &Node, schema: &Schema) -> GeneratorResult<String> {
    let sql = node_to_sql(root, schema)?;
    log_success!(codes::success::SQL_GENERATED, "WHERE fragment generated",
        "length" => sql.len()
    );
    Ok(sql)
}

fn node_to_sql(node: &Node, schema: &Schema) -> GeneratorResult<String> {
    let mut text = String::new();

    if let Some(expression) = &node.expression {
        text = expression_to_sql(expression, schema)?;
    }

    let left = match &node.left {
        Some(child) => node_to_sql(child, schema)?,
        None => String::new(),
    };
    let right = match &node.right {
        Some(child) => node_to_sql(child, schema)?,
        None => String::new(),
    };

    if !left.is_empty() && !right.is_empty() {
        let op = node.bool_operator.ok_or_else(|| {
            GeneratorError::malformed_tree("two children without a bool operator")
        })?;
        text = format!("({} {} {})", left, op.as_str(), right);
    } else if !left.is_empty() {
        text = left;
    } else if !right.is_empty() {
        text = right;
    }

    Ok(text)
}
