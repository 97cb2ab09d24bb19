//! ClickHouse WHERE-fragment generation for FQL
//!
//! Takes a tree parsed by `fql_core` and a field [`Schema`] describing the
//! target table, and renders a boolean expression usable after `WHERE`:
//!
//! ```
//! use fql_clickhouse::{to_sql, Field, Schema};
//! use fql_core::parse;
//!
//! let schema = Schema::new()
//!     .with_field(Field::new("status", "UInt16"))
//!     .with_field(Field::new("labels", "Map(String, String)"));
//!
//! let root = parse("status>499 and labels:app=web").unwrap().root.unwrap();
//! let sql = to_sql(&root, &schema).unwrap();
//! assert_eq!(sql, "(status > 499 and equals(labels['app'], 'web'))");
//! ```

pub mod error;
pub mod field;
pub mod generator;
pub mod helpers;

pub use error::{GeneratorError, GeneratorResult};
pub use field::{Field, Schema, ValueKind};
pub use generator::{expression_to_sql, to_sql};
