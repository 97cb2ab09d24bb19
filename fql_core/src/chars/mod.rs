//! Single-character classification for the FQL state machine
//!
//! Every consumed character is wrapped in a [`Char`] carrying its source
//! position, and classified through the predicate set the parser branches on.
//! Classification is total: anything that is not a structural character
//! (quotes, delimiter, group markers, `=`) counts as a value character.

use crate::utils::Position;
use serde::Serialize;
use std::fmt;

/// A single input character with its source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Char {
    pub value: char,
    pub position: Position,
}

impl Char {
    pub fn new(value: char, position: Position) -> Self {
        Self { value, position }
    }

    /// The expression delimiter (a single space).
    pub fn is_delimiter(&self) -> bool {
        self.value == ' '
    }

    /// Characters allowed in an unquoted key.
    pub fn is_key(&self) -> bool {
        self.value.is_alphanumeric()
            || matches!(self.value, '_' | '.' | ':' | '/' | '-')
    }

    /// Characters that may start or continue a comparison operator.
    pub fn is_operator(&self) -> bool {
        matches!(self.value, '=' | '!' | '~' | '<' | '>')
    }

    pub fn is_group_open(&self) -> bool {
        self.value == '('
    }

    pub fn is_group_close(&self) -> bool {
        self.value == ')'
    }

    pub fn is_single_quote(&self) -> bool {
        self.value == '\''
    }

    pub fn is_double_quote(&self) -> bool {
        self.value == '"'
    }

    /// Inside a single-quoted value, everything except the quote continues it.
    pub fn is_single_quoted_value(&self) -> bool {
        !self.is_single_quote()
    }

    /// Inside a double-quoted value, everything except the quote continues it.
    pub fn is_double_quoted_value(&self) -> bool {
        !self.is_double_quote()
    }

    pub fn is_backslash(&self) -> bool {
        self.value == '\\'
    }

    pub fn is_newline(&self) -> bool {
        self.value == '\n'
    }

    /// Characters allowed in an unquoted value: anything except quotes,
    /// the delimiter, group markers, and `=`.
    pub fn is_value(&self) -> bool {
        !self.is_single_quote()
            && !self.is_double_quote()
            && !self.is_delimiter()
            && !self.is_group_open()
            && !self.is_group_close()
            && self.value != '='
    }
}

impl fmt::Display for Char {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Semantic class assigned to each consumed character, for syntax
/// highlighting consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    Key,
    Value,
    Operator,
    Space,
}

impl CharClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharClass::Key => "key",
            CharClass::Value => "value",
            CharClass::Operator => "operator",
            CharClass::Space => "space",
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A consumed character together with its semantic class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaggedChar {
    pub char: Char,
    pub class: CharClass,
}

impl TaggedChar {
    pub fn new(char: Char, class: CharClass) -> Self {
        Self { char, class }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(value: char) -> Char {
        Char::new(value, Position::start())
    }

    #[test]
    fn test_key_characters() {
        for c in ['a', 'Z', '0', '_', '.', ':', '/', '-'] {
            assert!(ch(c).is_key(), "{c} should be a key char");
        }
        for c in [' ', '=', '(', ')', '\'', '"', '!'] {
            assert!(!ch(c).is_key(), "{c} should not be a key char");
        }
    }

    #[test]
    fn test_operator_characters() {
        for c in ['=', '!', '~', '<', '>'] {
            assert!(ch(c).is_operator());
        }
        assert!(!ch('a').is_operator());
    }

    #[test]
    fn test_value_excludes_structural_characters() {
        for c in ['\'', '"', ' ', '(', ')', '='] {
            assert!(!ch(c).is_value(), "{c} should not be a value char");
        }
        // Operator characters other than `=` are fine inside values
        for c in ['!', '~', '<', '>', '*', '.', 'x', '7'] {
            assert!(ch(c).is_value(), "{c} should be a value char");
        }
    }

    #[test]
    fn test_quoted_value_characters() {
        assert!(ch('"').is_single_quoted_value());
        assert!(!ch('\'').is_single_quoted_value());
        assert!(ch('\'').is_double_quoted_value());
        assert!(!ch('"').is_double_quoted_value());
    }

    #[test]
    fn test_char_class_names() {
        assert_eq!(CharClass::Key.as_str(), "key");
        assert_eq!(CharClass::Space.to_string(), "space");
    }
}
