//! FQL: a filter query language
//!
//! Queries combine `key operator value` comparisons with `and` / `or` and
//! parentheses:
//!
//! ```text
//! status=200 and (path=~^/api or name='John Doe')
//! ```
//!
//! [`parse`] runs a single-pass state machine over the input and produces a
//! binary expression tree plus a per-character semantic tagging for syntax
//! highlighting. Keys segment on `:` to address nested structures; unquoted
//! values are typed by numeric inference, quoted values stay strings.
//!
//! The tree is consumed by the companion crates: `fql_matcher` evaluates it
//! against in-memory records, `fql_clickhouse` turns it into a SQL WHERE
//! fragment.

pub mod chars;
pub mod expression;
pub mod key;
pub mod logging;
pub mod parser;
pub mod text;
pub mod tree;
pub mod utils;

pub use chars::{Char, CharClass, TaggedChar};
pub use expression::{BoolOperator, Expression, ExpressionError, Operator, Value};
pub use key::{parse_key, Key, KeyError};
pub use parser::{errno, parse, parse_with_options, ParseOptions, ParseOutput, ParserError};
pub use text::to_text;
pub use tree::{Node, TreeAssembler};
pub use utils::{Position, Span};
