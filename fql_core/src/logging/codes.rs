//! Error and success codes for the FQL logging system
//!
//! Single source of truth for log codes and their metadata. The numeric
//! parser errnos are a separate, stable public contract and live in
//! `crate::parser::errno`; the codes here identify log events only.

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Parser error codes
pub mod parser {
    use super::Code;

    pub const SYNTAX_ERROR: Code = Code::new("E001");
}

/// Key segmentation error codes
pub mod key {
    use super::Code;

    pub const UNTERMINATED_QUOTE: Code = Code::new("E010");
    pub const INCOMPLETE_ESCAPE: Code = Code::new("E011");
}

/// Expression construction error codes
pub mod expression {
    use super::Code;

    pub const INVALID_OPERATOR: Code = Code::new("E020");
    pub const EMPTY_KEY: Code = Code::new("E021");
}

/// Record matching error codes
pub mod matcher {
    use super::Code;

    pub const INVALID_REGEX: Code = Code::new("E030");
    pub const MALFORMED_TREE: Code = Code::new("E031");
}

/// SQL generation error codes
pub mod generator {
    use super::Code;

    pub const UNKNOWN_FIELD: Code = Code::new("E040");
    pub const UNKNOWN_VALUE: Code = Code::new("E041");
    pub const FORBIDDEN_OPERATION: Code = Code::new("E042");
    pub const INVALID_JSON_PATH: Code = Code::new("E043");
    pub const INVALID_ARRAY_INDEX: Code = Code::new("E044");
    pub const UNSUPPORTED_PATH: Code = Code::new("E045");
    pub const SCHEMA_ERROR: Code = Code::new("E046");
    pub const MALFORMED_TREE: Code = Code::new("E047");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const PARSE_COMPLETE: Code = Code::new("I002");
    pub const SQL_GENERATED: Code = Code::new("I003");
}

/// Get category for a code
pub fn get_category(code: &str) -> &'static str {
    match code {
        "ERR001" | "ERR002" => "System",
        "E001" => "Parser",
        "E010" | "E011" => "Key",
        "E020" | "E021" => "Expression",
        "E030" | "E031" => "Matcher",
        c if c.starts_with("E04") => "Generator",
        c if c.starts_with('I') => "Success",
        c if c.starts_with('W') => "Warning",
        c if c.starts_with('D') => "Debug",
        _ => "Unknown",
    }
}

/// Get human-readable description for a code
pub fn get_description(code: &str) -> &'static str {
    match code {
        "ERR001" => "Internal error",
        "ERR002" => "Initialization failure",
        "E001" => "Query syntax error",
        "E010" => "Unterminated quoted key segment",
        "E011" => "Incomplete escape sequence in key",
        "E020" => "Invalid comparison operator",
        "E021" => "Empty key",
        "E030" => "Invalid regular expression",
        "E031" => "Malformed expression tree",
        "E040" => "Unknown field",
        "E041" => "Value not allowed for field",
        "E042" => "Operation not allowed for field type",
        "E043" => "Invalid JSON path",
        "E044" => "Invalid array index",
        "E045" => "Path search unsupported for field type",
        "E046" => "Schema error",
        "E047" => "Malformed expression tree",
        "I001" => "Logging system initialized",
        "I002" => "Query parsed",
        "I003" => "SQL generated",
        _ => "Unknown error",
    }
}
