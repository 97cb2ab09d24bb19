//! Leaf expressions: `key operator value`
//!
//! An expression pairs a segmented [`Key`] with a comparison [`Operator`] and
//! a typed [`Value`]. Value typing happens here at construction time, so
//! downstream consumers (matching, SQL generation) never re-parse text.

pub mod error;

pub use error::{ExpressionError, ExpressionResult};

use crate::key::{parse_key, Key};
use serde::Serialize;
use std::fmt;

/// Comparison operator between a key and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "=~")]
    Regex,
    #[serde(rename = "!~")]
    NotRegex,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LowerThan,
    #[serde(rename = ">=")]
    EqualOrGreaterThan,
    #[serde(rename = "<=")]
    EqualOrLowerThan,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::Regex => "=~",
            Self::NotRegex => "!~",
            Self::GreaterThan => ">",
            Self::LowerThan => "<",
            Self::EqualOrGreaterThan => ">=",
            Self::EqualOrLowerThan => "<=",
        }
    }

    pub fn parse(text: &str) -> ExpressionResult<Self> {
        match text {
            "=" => Ok(Self::Equals),
            "!=" => Ok(Self::NotEquals),
            "=~" => Ok(Self::Regex),
            "!~" => Ok(Self::NotRegex),
            ">" => Ok(Self::GreaterThan),
            "<" => Ok(Self::LowerThan),
            ">=" => Ok(Self::EqualOrGreaterThan),
            "<=" => Ok(Self::EqualOrLowerThan),
            _ => Err(ExpressionError::invalid_operator(text)),
        }
    }

    /// Negating operators match when the addressed field is absent.
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::NotEquals | Self::NotRegex)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean connective between two tree nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOperator {
    And,
    Or,
}

impl BoolOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            _ => None,
        }
    }
}

impl fmt::Display for BoolOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Infer a type from raw value text. Quoted values are always strings.
    /// Unquoted numeric text becomes `Int` when it is an integral value in
    /// `i64` range, `Float` otherwise.
    pub fn infer(text: &str, quoted: bool) -> Self {
        if quoted {
            return Self::String(text.to_string());
        }

        match text.parse::<f64>() {
            Ok(number) if number.is_finite() => {
                if number.fract() == 0.0
                    && number >= i64::MIN as f64
                    && number <= i64::MAX as f64
                {
                    Self::Int(number as i64)
                } else {
                    Self::Float(number)
                }
            }
            _ => Self::String(text.to_string()),
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Numeric view of the value, when it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            Self::String(_) => None,
        }
    }

    /// Raw text form, without quoting.
    pub fn to_text(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

/// A single `key operator value` comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub key: Key,
    pub operator: Operator,
    pub value: Value,
}

impl Expression {
    /// Build an expression from raw parser output. The operator is validated
    /// first so an invalid operator is reported even when the key is also
    /// bad; an empty key (zero segments) is rejected after segmentation.
    pub fn new(raw_key: &str, raw_operator: &str, raw_value: &str, quoted: bool) -> ExpressionResult<Self> {
        let operator = Operator::parse(raw_operator)?;
        let key = parse_key(raw_key)?;
        if key.segments().is_empty() {
            return Err(ExpressionError::EmptyKey);
        }
        let value = Value::infer(raw_value, quoted);

        Ok(Self {
            key,
            operator,
            value,
        })
    }

    pub fn from_parts(key: Key, operator: Operator, value: Value) -> Self {
        Self {
            key,
            operator,
            value,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.key, self.operator, self.value)
    }
}
