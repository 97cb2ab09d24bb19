//! Parser error with a stable numeric taxonomy
//!
//! Error numbers are part of the public contract: callers match on them to
//! distinguish failure classes, so values never change meaning and retired
//! values are never reused.

use crate::chars::Char;
use crate::logging::{codes, Code};
use crate::utils::Position;
use serde::Serialize;

/// Stable error numbers, grouped by the state that raises them.
pub mod errno {
    /// Invalid character at the start of a sequence.
    pub const INVALID_CHAR_INITIAL: i32 = 1;
    /// Retained for callers matching on historical numbers; no longer emitted.
    pub const EXPECTED_OPERATOR_COMPAT: i32 = 2;
    /// Invalid character while reading a key.
    pub const INVALID_CHAR_KEY: i32 = 3;
    /// Invalid character while reading an operator.
    pub const INVALID_CHAR_OPERATOR: i32 = 4;
    /// Closing parenthesis with no open group, seen after a value.
    pub const UNMATCHED_PAREN_VALUE: i32 = 9;
    /// Operator text is not a known comparison operator.
    pub const UNKNOWN_OPERATOR: i32 = 10;
    /// Invalid character inside a quoted value.
    pub const INVALID_CHAR_QUOTED: i32 = 11;
    /// Closing parenthesis with no open group, seen after a delimiter.
    pub const UNMATCHED_PAREN_DELIMITER: i32 = 15;
    /// Invalid character where a key or group was expected.
    pub const INVALID_CHAR_DELIMITER: i32 = 18;
    /// Closing parenthesis with no open group, seen where a boolean
    /// operator was expected.
    pub const UNMATCHED_PAREN_BOOL_OP: i32 = 19;
    /// Text that cannot become a boolean operator.
    pub const INVALID_BOOL_OPERATOR: i32 = 20;
    /// Boolean operator not followed by a space.
    pub const EXPECTED_DELIMITER: i32 = 23;
    /// Input held no expression at all.
    pub const EMPTY_INPUT: i32 = 24;
    /// Input ended before an expression completed.
    pub const UNEXPECTED_EOF: i32 = 25;
    /// Input ended right after a boolean operator.
    pub const UNEXPECTED_EOF_DELIMITER: i32 = 26;
    /// Input ended with a group still open.
    pub const UNMATCHED_PAREN_EOF: i32 = 27;
    /// Found something other than an operator after a key.
    pub const EXPECTED_OPERATOR: i32 = 28;
    /// Found something other than a value after an operator.
    pub const EXPECTED_VALUE: i32 = 29;
}

pub type ParserResult<T> = Result<T, ParserError>;

/// A syntax error with its stable number and, when available, the
/// character that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ParserError {
    pub message: String,
    pub errno: i32,
    pub position: Option<Position>,
}

impl ParserError {
    /// Build an error, appending the offending character and its offset
    /// when the parser has one.
    pub fn new(text: &str, errno: i32, char: Option<Char>) -> Self {
        match char {
            Some(c) => Self {
                message: format!(
                    "{} [char {} at {}], errno={}",
                    text, c.value, c.position.offset, errno
                ),
                errno,
                position: Some(c.position),
            },
            None => Self {
                message: text.to_string(),
                errno,
                position: None,
            },
        }
    }

    /// Get error code for the global logging system
    pub fn error_code(&self) -> Code {
        codes::parser::SYNTAX_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_message_with_char() {
        let pos = Position::start().advance('a').advance('b');
        let c = Char::new('!', pos);
        let err = ParserError::new("invalid character", errno::INVALID_CHAR_KEY, Some(c));
        assert_eq!(err.message, "invalid character [char ! at 2], errno=3");
        assert_eq!(err.errno, 3);
    }

    #[test]
    fn test_message_without_char() {
        let err = ParserError::new("empty input", errno::EMPTY_INPUT, None);
        assert_eq!(err.message, "empty input");
        assert_eq!(err.errno, 24);
        assert!(err.position.is_none());
    }
}
