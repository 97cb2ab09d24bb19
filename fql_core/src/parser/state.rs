//! Parser states

/// Machine state, advanced one character at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Initial,
    Key,
    ExpectOperator,
    KeyValueOperator,
    ExpectValue,
    Value,
    SingleQuotedValue,
    DoubleQuotedValue,
    BoolOpDelimiter,
    ExpectBoolOp,
    Error,
}
