//! Source location tracking for FQL queries
//!
//! Positions are measured in characters, not bytes: the parser walks the
//! query as a character sequence and uses single-character lookahead and
//! lookbehind, so every offset it reports indexes that sequence.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in query text with character offset, line, and column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Character offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    /// Create a new position
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Create the starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance position by one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                offset: self.offset + 1,
                line: self.line,
                column: self.column + 1,
            },
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of query text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    /// Create a new span
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    /// Get the start position of this span
    pub fn start(&self) -> Position {
        self.start
    }

    /// Get the end position of this span
    pub fn end(&self) -> Position {
        self.end
    }

    /// Create a single-character span
    pub fn single(pos: Position) -> Self {
        let end = Position {
            offset: pos.offset + 1,
            line: pos.line,
            column: pos.column + 1,
        };
        Self { start: pos, end }
    }

    /// Get the character length of this span
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    /// Check if this span is empty
    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advance() {
        let pos = Position::start();
        let pos = pos.advance('a');
        assert_eq!(pos, Position::new(1, 1, 2));

        let pos = pos.advance('\n');
        assert_eq!(pos, Position::new(2, 2, 1));
    }

    #[test]
    fn test_position_display() {
        let pos = Position::new(10, 2, 5);
        assert_eq!(pos.to_string(), "2:5");
    }

    #[test]
    fn test_single_char_span() {
        let span = Span::single(Position::new(3, 1, 4));
        assert_eq!(span.len(), 1);
        assert!(!span.is_empty());
        assert_eq!(span.to_string(), "1:4-5");
    }
}
