//! Error types for expression construction

use crate::key::KeyError;
use crate::logging::{codes, Code};

pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Errors produced while building a `key op value` expression
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    #[error("invalid operator: {operator}")]
    InvalidOperator { operator: String },

    #[error("empty key")]
    EmptyKey,

    #[error(transparent)]
    Key(#[from] KeyError),
}

impl ExpressionError {
    pub fn invalid_operator(operator: &str) -> Self {
        Self::InvalidOperator {
            operator: operator.to_string(),
        }
    }

    /// Get error code for the global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::InvalidOperator { .. } => codes::expression::INVALID_OPERATOR,
            Self::EmptyKey => codes::expression::EMPTY_KEY,
            Self::Key(err) => err.error_code(),
        }
    }
}
