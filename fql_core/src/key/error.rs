//! Error types for key segmentation

use crate::logging::{codes, Code};

pub type KeyResult<T> = Result<T, KeyError>;

/// Errors produced while segmenting a raw key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("unterminated quoted segment starting at position {position}")]
    UnterminatedQuote { position: usize },

    #[error("incomplete escape sequence at position {position}")]
    IncompleteEscape { position: usize },
}

impl KeyError {
    pub fn unterminated_quote(position: usize) -> Self {
        Self::UnterminatedQuote { position }
    }

    pub fn incomplete_escape(position: usize) -> Self {
        Self::IncompleteEscape { position }
    }

    /// Get error code for the global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnterminatedQuote { .. } => codes::key::UNTERMINATED_QUOTE,
            Self::IncompleteEscape { .. } => codes::key::INCOMPLETE_ESCAPE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            KeyError::unterminated_quote(2).error_code().as_str(),
            "E010"
        );
        assert_eq!(KeyError::incomplete_escape(5).error_code().as_str(), "E011");
    }

    #[test]
    fn test_error_messages() {
        let err = KeyError::unterminated_quote(3);
        assert_eq!(
            err.to_string(),
            "unterminated quoted segment starting at position 3"
        );
    }
}
