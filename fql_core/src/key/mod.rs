//! Key path segmentation
//!
//! A key addresses a field, optionally descending into nested structures:
//! segments are separated by `:`, and a segment may be wrapped in single or
//! double quotes to include a literal `:` or whitespace. Inside and outside
//! quotes, a backslash escapes the next character (`\'`, `\"`, `\\`, `\n`,
//! `\t` decode to the literal character; unknown escapes pass through
//! verbatim).
//!
//! Segmentation runs over the fully accumulated key text after the main
//! parse loop has finished with it, not inline per character.

pub mod error;

pub use error::{KeyError, KeyResult};

use serde::Serialize;
use std::fmt;

/// A segmented key with its original source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Key {
    segments: Vec<String>,
    is_segmented: bool,
    raw: String,
}

impl Key {
    pub fn new(segments: Vec<String>, raw: impl Into<String>) -> Self {
        let is_segmented = segments.len() > 1;
        Self {
            segments,
            is_segmented,
            raw: raw.into(),
        }
    }

    /// Build a key from plain segments, deriving the raw text.
    pub fn from_segments(segments: Vec<String>) -> Self {
        let raw = segments.join(":");
        Self::new(segments, raw)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_segmented(&self) -> bool {
        self.is_segmented
    }

    /// The original source text, as written (segments may have been quoted
    /// or escaped, so this is not derivable from `segments`).
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Single-pass scanner over the raw key text.
struct KeyScanner {
    chars: Vec<char>,
    pos: usize,
    segments: Vec<String>,
    current: String,
}

impl KeyScanner {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            segments: Vec::new(),
            current: String::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        self.pos += 1;
        ch
    }

    /// Decode a backslash escape. The cursor sits on the backslash.
    fn scan_escape(&mut self) -> KeyResult<char> {
        self.advance();
        match self.peek() {
            Some(ch) => {
                self.advance();
                let decoded = match ch {
                    '\'' => '\'',
                    '"' => '"',
                    '\\' => '\\',
                    'n' => '\n',
                    't' => '\t',
                    // Unknown escapes pass through verbatim
                    other => other,
                };
                Ok(decoded)
            }
            None => Err(KeyError::incomplete_escape(self.pos)),
        }
    }

    /// Consume a quoted sub-scan up to the matching unescaped quote.
    fn scan_quoted(&mut self, quote: char) -> KeyResult<()> {
        let start = self.pos;
        self.advance();

        loop {
            match self.peek() {
                Some('\\') => {
                    let decoded = self.scan_escape()?;
                    self.current.push(decoded);
                }
                Some(ch) if ch == quote => {
                    self.advance();
                    return Ok(());
                }
                Some(ch) => {
                    self.advance();
                    self.current.push(ch);
                }
                None => return Err(KeyError::unterminated_quote(start)),
            }
        }
    }

    /// Consume one segment up to the next unescaped `:` or end of input.
    fn scan_segment(&mut self) -> KeyResult<()> {
        while let Some(ch) = self.peek() {
            match ch {
                ':' => return Ok(()),
                '\'' | '"' => self.scan_quoted(ch)?,
                '\\' => {
                    let decoded = self.scan_escape()?;
                    self.current.push(decoded);
                }
                _ => {
                    self.advance();
                    self.current.push(ch);
                }
            }
        }
        Ok(())
    }

    fn scan(mut self, raw: &str) -> KeyResult<Key> {
        while self.pos < self.chars.len() {
            self.scan_segment()?;
            self.segments.push(std::mem::take(&mut self.current));

            if self.peek() == Some(':') {
                self.advance();
                // A trailing colon produces an empty final segment
                if self.pos >= self.chars.len() {
                    self.segments.push(String::new());
                }
            }
        }
        Ok(Key::new(self.segments, raw))
    }
}

/// Segment a raw key. Empty input yields a key with zero segments; the
/// empty-key check belongs to expression construction, not this layer.
pub fn parse_key(raw: &str) -> KeyResult<Key> {
    if raw.is_empty() {
        return Ok(Key::new(Vec::new(), raw));
    }
    KeyScanner::new(raw).scan(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_single_segment() {
        let key = parse_key("hostname").unwrap();
        assert_eq!(key.segments(), ["hostname"]);
        assert!(!key.is_segmented());
        assert_eq!(key.raw(), "hostname");
    }

    #[test]
    fn test_colon_segmentation() {
        let key = parse_key("a:b:c").unwrap();
        assert_eq!(key.segments(), ["a", "b", "c"]);
        assert!(key.is_segmented());
        assert_eq!(key.raw(), "a:b:c");
    }

    #[test]
    fn test_quoted_segment_keeps_colon() {
        let key = parse_key("a:'b:c'").unwrap();
        assert_eq!(key.segments(), ["a", "b:c"]);
        assert!(key.is_segmented());
    }

    #[test]
    fn test_double_quoted_segment() {
        let key = parse_key("labels:\"app name\"").unwrap();
        assert_eq!(key.segments(), ["labels", "app name"]);
    }

    #[test]
    fn test_escape_sequences() {
        let key = parse_key("a:'it\\'s'").unwrap();
        assert_eq!(key.segments(), ["a", "it's"]);

        let key = parse_key("a\\nb").unwrap();
        assert_eq!(key.segments(), ["a\nb"]);

        let key = parse_key("a\\tb").unwrap();
        assert_eq!(key.segments(), ["a\tb"]);

        let key = parse_key("a\\\\b").unwrap();
        assert_eq!(key.segments(), ["a\\b"]);
    }

    #[test]
    fn test_unknown_escape_passes_through() {
        let key = parse_key("a\\xb").unwrap();
        assert_eq!(key.segments(), ["axb"]);
    }

    #[test]
    fn test_trailing_colon_appends_empty_segment() {
        let key = parse_key("a:").unwrap();
        assert_eq!(key.segments(), ["a", ""]);
        assert!(key.is_segmented());
    }

    #[test]
    fn test_empty_input() {
        let key = parse_key("").unwrap();
        assert!(key.segments().is_empty());
        assert_eq!(key.raw(), "");
        assert!(!key.is_segmented());
    }

    #[test]
    fn test_unterminated_quote() {
        assert_matches!(
            parse_key("a:'open"),
            Err(KeyError::UnterminatedQuote { .. })
        );
    }

    #[test]
    fn test_trailing_backslash() {
        assert_matches!(parse_key("a\\"), Err(KeyError::IncompleteEscape { .. }));
    }

    #[test]
    fn test_from_segments() {
        let key = Key::from_segments(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(key.raw(), "a:b");
        assert!(key.is_segmented());
    }
}
