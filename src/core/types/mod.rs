pub mod row;
pub mod schema;

pub use row::Row;
pub use schema::{ColumnDef, ForeignKeyDef, Schema, MAX_IDENTIFIER_LEN};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Float,
    Text,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Text => write!(f, "TEXT"),
        }
    }
}

/// A single cell value. The `Text` variant exclusively owns its buffer:
/// cloning a value duplicates the buffer, dropping it releases it. The
/// variant in use must match the owning column's declared [`DataType`];
/// mutation entry points enforce this before a value reaches a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn get_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::Text(_) => DataType::Text,
        }
    }

    /// The zero value for a column type: `0`, `0.0`, or the empty string.
    #[must_use]
    pub fn zero_of(data_type: DataType) -> Self {
        match data_type {
            DataType::Integer => Value::Integer(0),
            DataType::Float => Value::Float(0.0),
            DataType::Text => Value::Text(String::new()),
        }
    }
}
