//! Error types for record matching

use fql_core::logging::{codes, Code};

pub type MatchResult<T> = Result<T, MatchError>;

/// Errors produced while evaluating a tree against a record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("invalid regex given: {pattern} -> {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("malformed tree: {message}")]
    MalformedTree { message: String },
}

impl MatchError {
    pub fn invalid_regex(pattern: &str, reason: &str) -> Self {
        Self::InvalidRegex {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
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
            Self::InvalidRegex { .. } => codes::matcher::INVALID_REGEX,
            Self::MalformedTree { .. } => codes::matcher::MALFORMED_TREE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            MatchError::invalid_regex("(", "unclosed group")
                .error_code()
                .as_str(),
            "E030"
        );
        assert_eq!(
            MatchError::malformed_tree("empty node").error_code().as_str(),
            "E031"
        );
    }
}
