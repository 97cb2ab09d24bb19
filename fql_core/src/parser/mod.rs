//! Single-pass state-machine parser
//!
//! The parser walks the query character by character, accumulating key,
//! operator, and value text, and folds each completed expression into the
//! tree immediately. There is no separate token stream; the character
//! classification in [`crate::chars`] drives every transition.
//!
//! Every consumed character is also tagged with a semantic class so
//! editors can highlight a query from the same pass that parses it.

pub mod error;
pub mod state;

pub use error::{errno, ParserError, ParserResult};
pub use state::State;

use crate::chars::{Char, CharClass, TaggedChar};
use crate::expression::{BoolOperator, Expression, ExpressionError, Operator};
use crate::logging::codes;
use crate::tree::{Node, TreeAssembler};
use crate::utils::Position;
use crate::{log_debug, log_error};
use serde::Serialize;

/// Parse behavior flags.
///
/// `lenient` reports the first syntax error in the output instead of
/// failing, keeping whatever tree was assembled before it. `partial`
/// suppresses end-of-input checks so that incomplete queries, as typed in
/// an editor, still yield a tree and tagged characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub lenient: bool,
    pub partial: bool,
}

/// Result of a parse: the tree root (absent for empty partial input),
/// per-character tags, and the error when running lenient.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutput {
    pub root: Option<Node>,
    pub tagged_chars: Vec<TaggedChar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ParserError>,
}

struct Parser {
    chars: Vec<char>,
    index: usize,
    position: Position,
    state: State,
    last_char: Option<Char>,
    key: String,
    value: String,
    value_is_string: bool,
    key_value_operator: String,
    // Pending boolean operator text, folded into the tree with the next
    // completed expression. Seeded with "and" so a lone expression folds.
    bool_operator: String,
    assembler: TreeAssembler,
    tagged_chars: Vec<TaggedChar>,
    error: Option<ParserError>,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
            position: Position::start(),
            state: State::Initial,
            last_char: None,
            key: String::new(),
            value: String::new(),
            value_is_string: false,
            key_value_operator: String::new(),
            bool_operator: "and".to_string(),
            assembler: TreeAssembler::new(),
            tagged_chars: Vec::new(),
            error: None,
        }
    }

    fn set_error(&mut self, text: &str, errno: i32) {
        self.state = State::Error;
        self.error = Some(ParserError::new(text, errno, self.last_char));
    }

    fn store(&mut self, c: Char, class: CharClass) {
        self.tagged_chars.push(TaggedChar::new(c, class));
    }

    fn reset_data(&mut self) {
        self.key.clear();
        self.value.clear();
        self.value_is_string = false;
        self.key_value_operator.clear();
    }

    fn operator_is_valid(&self) -> bool {
        Operator::parse(&self.key_value_operator).is_ok()
    }

    fn pending(&mut self) -> Option<BoolOperator> {
        match BoolOperator::parse(&self.bool_operator) {
            Some(op) => Some(op),
            None => {
                self.set_error(
                    &format!("invalid bool operator: {}", self.bool_operator),
                    errno::INVALID_BOOL_OPERATOR,
                );
                None
            }
        }
    }

    /// Build the accumulated expression and fold it into the tree.
    fn fold_leaf(&mut self) {
        let Some(pending) = self.pending() else {
            return;
        };
        match Expression::new(
            &self.key,
            &self.key_value_operator,
            &self.value,
            self.value_is_string,
        ) {
            Ok(expression) => self.assembler.fold_expression(pending, expression),
            Err(err) => {
                let errno = match err {
                    ExpressionError::InvalidOperator { .. } => errno::UNKNOWN_OPERATOR,
                    _ => errno::INVALID_CHAR_KEY,
                };
                self.set_error(&err.to_string(), errno);
            }
        }
    }

    fn open_group(&mut self) {
        let Some(pending) = self.pending() else {
            return;
        };
        self.assembler.open_group(pending);
    }

    fn in_state_initial(&mut self, c: Char) {
        self.reset_data();
        self.assembler
            .begin_node(BoolOperator::parse(&self.bool_operator));
        if c.is_group_open() {
            self.open_group();
            self.store(c, CharClass::Operator);
        } else if c.is_delimiter() {
            self.state = State::BoolOpDelimiter;
            self.store(c, CharClass::Space);
        } else if c.is_key() {
            self.key.push(c.value);
            self.state = State::Key;
            self.store(c, CharClass::Key);
        } else {
            self.set_error("invalid character", errno::INVALID_CHAR_INITIAL);
        }
    }

    fn in_state_key(&mut self, c: Char) {
        if c.is_delimiter() {
            self.state = State::ExpectOperator;
            self.store(c, CharClass::Space);
        } else if c.is_key() {
            self.key.push(c.value);
            self.store(c, CharClass::Key);
        } else if c.is_operator() {
            self.key_value_operator.push(c.value);
            self.state = State::KeyValueOperator;
            self.store(c, CharClass::Operator);
        } else {
            self.set_error("invalid character", errno::INVALID_CHAR_KEY);
        }
    }

    fn in_state_expect_operator(&mut self, c: Char) {
        if c.is_delimiter() {
            self.store(c, CharClass::Space);
        } else if c.is_operator() {
            self.key_value_operator.push(c.value);
            self.state = State::KeyValueOperator;
            self.store(c, CharClass::Operator);
        } else {
            self.set_error("expected operator", errno::EXPECTED_OPERATOR);
        }
    }

    fn in_state_key_value_operator(&mut self, c: Char) {
        if c.is_delimiter() {
            self.store(c, CharClass::Space);
            if !self.operator_is_valid() {
                self.set_error(
                    &format!("unknown operator: {}", self.key_value_operator),
                    errno::UNKNOWN_OPERATOR,
                );
            } else {
                self.state = State::ExpectValue;
            }
        } else if c.is_operator() {
            self.key_value_operator.push(c.value);
            self.store(c, CharClass::Operator);
        } else if c.is_value() {
            if !self.operator_is_valid() {
                self.set_error(
                    &format!("unknown operator: {}", self.key_value_operator),
                    errno::UNKNOWN_OPERATOR,
                );
            } else {
                self.state = State::Value;
                self.value.push(c.value);
                self.store(c, CharClass::Value);
            }
        } else if c.is_single_quote() || c.is_double_quote() {
            if !self.operator_is_valid() {
                self.set_error(
                    &format!("unknown operator: {}", self.key_value_operator),
                    errno::UNKNOWN_OPERATOR,
                );
            } else {
                self.value_is_string = true;
                self.state = if c.is_single_quote() {
                    State::SingleQuotedValue
                } else {
                    State::DoubleQuotedValue
                };
                self.store(c, CharClass::Value);
            }
        } else {
            self.set_error("invalid character", errno::INVALID_CHAR_OPERATOR);
        }
    }

    fn in_state_expect_value(&mut self, c: Char) {
        if c.is_delimiter() {
            self.store(c, CharClass::Space);
        } else if c.is_value() {
            self.state = State::Value;
            self.value.push(c.value);
            self.store(c, CharClass::Value);
        } else if c.is_single_quote() || c.is_double_quote() {
            self.value_is_string = true;
            self.state = if c.is_single_quote() {
                State::SingleQuotedValue
            } else {
                State::DoubleQuotedValue
            };
            self.store(c, CharClass::Value);
        } else {
            self.set_error("expected value", errno::EXPECTED_VALUE);
        }
    }

    fn in_state_value(&mut self, c: Char) {
        if c.is_value() {
            self.value.push(c.value);
            self.store(c, CharClass::Value);
        } else if c.is_delimiter() {
            self.state = State::ExpectBoolOp;
            self.fold_leaf();
            if self.error.is_some() {
                return;
            }
            self.reset_data();
            self.bool_operator.clear();
            self.store(c, CharClass::Space);
        } else if c.is_group_close() {
            if !self.assembler.has_open_group() {
                self.set_error("unmatched parenthesis", errno::UNMATCHED_PAREN_VALUE);
            } else {
                self.fold_leaf();
                if self.error.is_some() {
                    return;
                }
                self.reset_data();
                self.assembler.close_group();
                self.bool_operator.clear();
                self.state = State::ExpectBoolOp;
                self.store(c, CharClass::Operator);
            }
        } else {
            self.set_error("invalid character", errno::UNKNOWN_OPERATOR);
        }
    }

    fn in_state_quoted_value(&mut self, c: Char, quote: char) {
        if c.value != quote {
            self.value.push(c.value);
            self.store(c, CharClass::Value);
            return;
        }

        self.store(c, CharClass::Value);
        let escaped = self.index > 0 && self.chars.get(self.index - 1) == Some(&'\\');
        if escaped {
            // The backslash was already accumulated; swap it for the quote
            self.value.pop();
            self.value.push(c.value);
        } else {
            self.state = State::ExpectBoolOp;
            self.fold_leaf();
            if self.error.is_some() {
                return;
            }
            self.reset_data();
            self.bool_operator.clear();
        }
    }

    fn in_state_bool_op_delimiter(&mut self, c: Char) {
        if c.is_delimiter() {
            self.store(c, CharClass::Space);
        } else if c.is_key() {
            self.state = State::Key;
            self.key.push(c.value);
            self.store(c, CharClass::Key);
        } else if c.is_group_open() {
            self.open_group();
            self.state = State::Initial;
            self.store(c, CharClass::Operator);
        } else if c.is_group_close() {
            if !self.assembler.has_open_group() {
                self.set_error("unmatched parenthesis", errno::UNMATCHED_PAREN_DELIMITER);
            } else {
                self.reset_data();
                self.assembler.close_group();
                self.state = State::ExpectBoolOp;
                self.store(c, CharClass::Operator);
            }
        } else {
            self.set_error("invalid character", errno::INVALID_CHAR_DELIMITER);
        }
    }

    fn in_state_expect_bool_op(&mut self, c: Char) {
        if c.is_delimiter() {
            self.store(c, CharClass::Space);
        } else if c.is_group_close() {
            if !self.assembler.has_open_group() {
                self.set_error("unmatched parenthesis", errno::UNMATCHED_PAREN_BOOL_OP);
            } else {
                if !self.key.is_empty()
                    && !self.value.is_empty()
                    && !self.key_value_operator.is_empty()
                {
                    self.fold_leaf();
                    if self.error.is_some() {
                        return;
                    }
                }
                self.reset_data();
                self.bool_operator.clear();
                self.assembler.close_group();
                self.state = State::ExpectBoolOp;
                self.store(c, CharClass::Operator);
            }
        } else {
            self.bool_operator.push(c.value);
            self.store(c, CharClass::Operator);
            if self.bool_operator.chars().count() > 3
                || !matches!(c.value, 'a' | 'n' | 'd' | 'o' | 'r')
            {
                self.set_error("invalid character", errno::INVALID_BOOL_OPERATOR);
            } else if BoolOperator::parse(&self.bool_operator).is_some() {
                // A complete operator must be followed by a delimiter,
                // unless the input ends here.
                match self.chars.get(self.index + 1) {
                    Some(next) if *next != ' ' => self.set_error(
                        "expected delimiter after bool operator",
                        errno::EXPECTED_DELIMITER,
                    ),
                    Some(_) => self.state = State::BoolOpDelimiter,
                    None => {}
                }
            }
        }
    }

    /// End-of-input handling: fold a trailing value, then flag states that
    /// cannot legally end a query. `partial` keeps the folds but skips the
    /// checks.
    fn finish(&mut self, partial: bool) {
        match self.state {
            State::Initial if !self.assembler.has_open_group() => {
                if !partial {
                    self.set_error("empty input", errno::EMPTY_INPUT);
                }
            }
            State::Initial | State::Key | State::ExpectOperator | State::ExpectValue => {
                if !partial {
                    self.set_error("unexpected EOF", errno::UNEXPECTED_EOF);
                }
            }
            State::Value | State::SingleQuotedValue | State::DoubleQuotedValue => {
                self.fold_leaf();
                self.bool_operator.clear();
            }
            State::BoolOpDelimiter => {
                if !partial {
                    self.set_error("unexpected EOF", errno::UNEXPECTED_EOF_DELIMITER);
                }
            }
            _ => {}
        }

        if !partial && self.error.is_none() && self.assembler.has_open_group() {
            self.set_error("unmatched parenthesis", errno::UNMATCHED_PAREN_EOF);
        }
    }

    fn run(&mut self, partial: bool) {
        while self.index < self.chars.len() {
            let ch = self.chars[self.index];
            let c = Char::new(ch, self.position);
            self.last_char = Some(c);

            // Newlines carry no meaning; they only advance the position
            if c.is_newline() {
                self.position = self.position.advance(ch);
                self.index += 1;
                continue;
            }

            match self.state {
                State::Initial => self.in_state_initial(c),
                State::Key => self.in_state_key(c),
                State::ExpectOperator => self.in_state_expect_operator(c),
                State::KeyValueOperator => self.in_state_key_value_operator(c),
                State::ExpectValue => self.in_state_expect_value(c),
                State::Value => self.in_state_value(c),
                State::SingleQuotedValue => self.in_state_quoted_value(c, '\''),
                State::DoubleQuotedValue => self.in_state_quoted_value(c, '"'),
                State::BoolOpDelimiter => self.in_state_bool_op_delimiter(c),
                State::ExpectBoolOp => self.in_state_expect_bool_op(c),
                State::Error => {}
            }

            if self.state == State::Error {
                break;
            }

            self.position = self.position.advance(ch);
            self.index += 1;
        }

        if self.state != State::Error {
            self.finish(partial);
        }
    }
}

/// Parse a query, failing on the first syntax error.
pub fn parse(text: &str) -> ParserResult<ParseOutput> {
    parse_with_options(text, ParseOptions::default())
}

/// Parse a query with explicit lenient and partial behavior.
pub fn parse_with_options(text: &str, options: ParseOptions) -> ParserResult<ParseOutput> {
    let mut parser = Parser::new(text);
    parser.run(options.partial);

    if let Some(err) = parser.error.take() {
        log_error!(codes::parser::SYNTAX_ERROR, &err.message, "errno" => err.errno);
        if !options.lenient {
            return Err(err);
        }
        return Ok(ParseOutput {
            root: parser.assembler.finish().map(|node| *node),
            tagged_chars: parser.tagged_chars,
            error: Some(err),
        });
    }

    log_debug!("query parsed", "chars" => parser.chars.len());
    Ok(ParseOutput {
        root: parser.assembler.finish().map(|node| *node),
        tagged_chars: parser.tagged_chars,
        error: None,
    })
}
