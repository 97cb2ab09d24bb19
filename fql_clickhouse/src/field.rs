//! Field registry for SQL generation
//!
//! A [`Schema`] maps query field names to the ClickHouse columns behind
//! them. The column type decides how segmented keys address into the
//! field: `Map(...)` columns by map key, `Array(...)` columns by numeric
//! index, `JSON` columns by dotted path, and `jsonstring` marks a String
//! column holding serialized JSON that must be read with the `JSONExtract*`
//! family.
//!
//! Schemas are written as TOML:
//!
//! ```toml
//! [fields.status]
//! type = "UInt16"
//!
//! [fields.level]
//! type = "String"
//! values = ["debug", "info", "warning", "error"]
//!
//! [fields.payload]
//! type = "String"
//! jsonstring = true
//!
//! [fields.labels]
//! type = "Map(String, String)"
//! ```

use crate::error::{GeneratorError, GeneratorResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Value category a column normalizes to, for operation validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One queryable field backed by a ClickHouse column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Field {
    #[serde(skip)]
    name: String,
    #[serde(rename = "type")]
    column_type: String,
    #[serde(default)]
    jsonstring: bool,
    #[serde(default)]
    values: Vec<String>,
}

impl Field {
    pub fn new(name: &str, column_type: &str) -> Self {
        Self {
            name: name.to_string(),
            column_type: column_type.to_string(),
            jsonstring: false,
            values: Vec::new(),
        }
    }

    pub fn with_jsonstring(mut self) -> Self {
        self.jsonstring = true;
        self
    }

    pub fn with_values(mut self, values: &[&str]) -> Self {
        self.values = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &str {
        &self.column_type
    }

    pub fn jsonstring(&self) -> bool {
        self.jsonstring
    }

    /// Allow-list of accepted values; empty means unrestricted.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn is_map(&self) -> bool {
        self.base_type().starts_with("Map(")
    }

    pub fn is_array(&self) -> bool {
        self.base_type().starts_with("Array(")
    }

    pub fn is_json(&self) -> bool {
        self.base_type() == "JSON"
    }

    /// Value category of the column, when it has a scalar one. Containers
    /// and dates have none and skip operation validation.
    pub fn normalized_kind(&self) -> Option<ValueKind> {
        let base = self.base_type();
        if base == "Bool" {
            Some(ValueKind::Bool)
        } else if base.starts_with("Int") || base.starts_with("UInt") {
            Some(ValueKind::Int)
        } else if base.starts_with("Float") {
            Some(ValueKind::Float)
        } else if base == "String" || base.starts_with("FixedString(") || base.starts_with("LowCardinality(String") {
            Some(ValueKind::String)
        } else {
            None
        }
    }

    /// Column type with a `Nullable` wrapper peeled off.
    fn base_type(&self) -> &str {
        self.column_type
            .strip_prefix("Nullable(")
            .and_then(|t| t.strip_suffix(')'))
            .unwrap_or(&self.column_type)
    }
}

/// Named collection of fields, the generator's view of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Schema {
    #[serde(default)]
    fields: HashMap<String, Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a schema from TOML text.
    pub fn from_toml_str(text: &str) -> GeneratorResult<Self> {
        let mut schema: Schema =
            toml::from_str(text).map_err(|err| GeneratorError::schema(&err.to_string()))?;
        // Field names live in the map keys
        for (name, field) in schema.fields.iter_mut() {
            field.name = name.clone();
        }
        Ok(schema)
    }

    /// Load a schema from a TOML file.
    pub fn from_toml_file(path: &Path) -> GeneratorResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            GeneratorError::schema(&format!("{}: {}", path.display(), err))
        })?;
        Self::from_toml_str(&text)
    }
}
