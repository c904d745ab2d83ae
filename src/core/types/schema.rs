// src/core/types/schema.rs
use crate::core::common::DbError;
use crate::core::types::{DataType, Value};
use serde::{Deserialize, Serialize};

/// Upper bound on table and column names, in bytes. Longer identifiers are
/// silently truncated, snapped to a character boundary.
pub const MAX_IDENTIFIER_LEN: usize = 49;

/// Truncates an identifier to [`MAX_IDENTIFIER_LEN`] bytes.
#[must_use]
pub fn truncate_identifier(name: &str) -> String {
    if name.len() <= MAX_IDENTIFIER_LEN {
        return name.to_string();
    }
    let mut end = MAX_IDENTIFIER_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
}

impl ColumnDef {
    #[must_use]
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: truncate_identifier(name),
            data_type,
            is_primary_key: false,
            is_foreign_key: false,
        }
    }

    /// A column carrying an independent uniqueness constraint.
    #[must_use]
    pub fn primary_key(name: &str, data_type: DataType) -> Self {
        Self { is_primary_key: true, ..Self::new(name, data_type) }
    }
}

/// Names another table and column that a column of the owning table
/// references. `column_index` is the owning column's position in the
/// schema; columns resolve their descriptor by that index rather than
/// holding a back-pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyDef {
    pub referenced_table: String,
    pub referenced_column: String,
    pub column_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    #[must_use]
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Schema { columns }
    }

    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == column_name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Checks that `value`'s variant matches the column's declared type.
    pub fn check_value(&self, col_index: usize, value: &Value) -> Result<(), DbError> {
        let column = self.columns.get(col_index).ok_or_else(|| {
            DbError::InvalidArgument(format!("column index {} out of range", col_index))
        })?;
        if value.get_type() != column.data_type {
            return Err(DbError::TypeMismatch {
                expected: column.data_type,
                found: value.get_type(),
            });
        }
        Ok(())
    }
}
