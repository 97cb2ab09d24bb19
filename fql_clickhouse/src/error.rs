//! Error types for SQL generation

use fql_core::logging::{codes, Code};

pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Errors produced while turning a tree into a WHERE fragment
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    #[error("unknown field: {name}")]
    UnknownField { name: String },

    #[error("unknown value: {value}")]
    UnknownValue { value: String },

    #[error("operation not allowed: {field_type} field with '{operator}' operator")]
    ForbiddenOperation {
        field_type: String,
        operator: String,
    },

    #[error("invalid JSON path part: {part}")]
    InvalidJsonPath { part: String },

    #[error("invalid array index, expected number: {text}")]
    InvalidArrayIndex { text: String },

    #[error("path search for unsupported field type: {field_type}")]
    UnsupportedPath { field_type: String },

    #[error("schema error: {message}")]
    Schema { message: String },

    #[error("malformed tree: {message}")]
    MalformedTree { message: String },
}

impl GeneratorError {
    pub fn unknown_field(name: &str) -> Self {
        Self::UnknownField {
            name: name.to_string(),
        }
    }

    pub fn unknown_value(value: &str) -> Self {
        Self::UnknownValue {
            value: value.to_string(),
        }
    }

    pub fn forbidden_operation(field_type: &str, operator: &str) -> Self {
        Self::ForbiddenOperation {
            field_type: field_type.to_string(),
            operator: operator.to_string(),
        }
    }

    pub fn invalid_json_path(part: &str) -> Self {
        Self::InvalidJsonPath {
            part: part.to_string(),
        }
    }

    pub fn invalid_array_index(text: &str) -> Self {
        Self::InvalidArrayIndex {
            text: text.to_string(),
        }
    }

    pub fn unsupported_path(field_type: &str) -> Self {
        Self::UnsupportedPath {
            field_type: field_type.to_string(),
        }
    }

    pub fn schema(message: &str) -> Self {
        Self::Schema {
            message: message.to_string(),
        }
    }

    pub fn malformed_tree(message: &str) -> Self {
        Self::MalformedTree {
            message: message.to_string(),
        }
    }

    /// Get error code for the global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnknownField { .. } => codes::generator::UNKNOWN_FIELD,
            Self::UnknownValue { .. } => codes::generator::UNKNOWN_VALUE,
            Self::ForbiddenOperation { .. } => codes::generator::FORBIDDEN_OPERATION,
            Self::InvalidJsonPath { .. } => codes::generator::INVALID_JSON_PATH,
            Self::InvalidArrayIndex { .. } => codes::generator::INVALID_ARRAY_INDEX,
            Self::UnsupportedPath { .. } => codes::generator::UNSUPPORTED_PATH,
            Self::Schema { .. } => codes::generator::SCHEMA_ERROR,
            Self::MalformedTree { .. } => codes::generator::MALFORMED_TREE,
        }
    }
}
