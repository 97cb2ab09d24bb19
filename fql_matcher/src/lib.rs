//! In-memory record matching for FQL
//!
//! Takes a tree parsed by `fql_core` and decides whether a JSON record
//! satisfies it:
//!
//! ```
//! use fql_core::parse;
//! use fql_matcher::{Evaluator, Record};
//! use serde_json::json;
//!
//! let root = parse("status=200 and path=~^/api").unwrap().root.unwrap();
//! let record = Record::new(json!({"status": 200, "path": "/api/users"}));
//!
//! let mut evaluator = Evaluator::new();
//! assert!(evaluator.evaluate(&root, &record).unwrap());
//! ```

pub mod error;
pub mod evaluator;
pub mod record;

pub use error::{MatchError, MatchResult};
pub use evaluator::Evaluator;
pub use record::Record;
