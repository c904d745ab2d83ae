//! Named table: a typed column schema, a growable row vector, and the
//! foreign-key descriptors declared on its columns.
//!
//! The table exclusively owns its schema, rows, row-internal string buffers
//! and descriptors. Methods here are the storage primitives; constraint
//! checking (primary-key uniqueness, referential integrity, locking) lives
//! one level up in [`crate::core::engine::Database`], which resolves other
//! tables through the catalog.

mod alter;
mod render;

use crate::core::common::DbError;
use crate::core::types::schema::truncate_identifier;
use crate::core::types::{ColumnDef, DataType, ForeignKeyDef, Row, Schema, Value};
use serde::{Deserialize, Serialize};

/// Row capacity a table starts with when no configuration says otherwise.
pub const TABLE_INITIAL_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    schema: Schema,
    rows: Vec<Row>,
    foreign_keys: Vec<ForeignKeyDef>,
}

impl Table {
    /// Creates an empty table with the default row capacity.
    ///
    /// Incoming column descriptors are value-copied: names are truncated to
    /// the identifier bound, `is_primary_key` is honored, and
    /// `is_foreign_key` is cleared — foreign keys are declared afterwards
    /// via [`Table::add_foreign_key`].
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidArgument` when the name is empty or the
    /// column list is empty.
    pub fn new(name: &str, columns: Vec<ColumnDef>) -> Result<Self, DbError> {
        Self::with_capacity(name, columns, TABLE_INITIAL_CAPACITY)
    }

    /// Like [`Table::new`] with an explicit starting row capacity.
    pub fn with_capacity(
        name: &str,
        columns: Vec<ColumnDef>,
        capacity: usize,
    ) -> Result<Self, DbError> {
        if name.is_empty() {
            return Err(DbError::InvalidArgument("table name must not be empty".to_string()));
        }
        if columns.is_empty() {
            return Err(DbError::InvalidArgument(format!(
                "table '{}' must have at least one column",
                name
            )));
        }
        let columns = columns
            .into_iter()
            .map(|col| ColumnDef {
                name: truncate_identifier(&col.name),
                data_type: col.data_type,
                is_primary_key: col.is_primary_key,
                is_foreign_key: false,
            })
            .collect();
        Ok(Self {
            name: truncate_identifier(name),
            schema: Schema::new(columns),
            rows: Vec::with_capacity(capacity),
            foreign_keys: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.schema.len()
    }

    /// Current row capacity; grows by doubling, never shrinks.
    pub fn row_capacity(&self) -> usize {
        self.rows.capacity()
    }

    pub fn foreign_keys(&self) -> &[ForeignKeyDef] {
        &self.foreign_keys
    }

    /// The descriptor declared on the column at `col_index`, if any.
    pub fn foreign_key_for(&self, col_index: usize) -> Option<&ForeignKeyDef> {
        self.foreign_keys.iter().find(|fk| fk.column_index == col_index)
    }

    /// Appends a row, doubling the row vector's capacity when it is full.
    ///
    /// This is the storage primitive: no constraint checks run here. The row
    /// is assumed to match the current schema in length and cell types.
    pub fn push_row(&mut self, row: Row) {
        if self.rows.len() == self.rows.capacity() {
            self.rows.reserve_exact(self.rows.capacity().max(1));
        }
        self.rows.push(row);
    }

    /// Re-inserts a row at `row_index`, shifting subsequent rows right by
    /// one; an index at or beyond the tail appends. Grows like
    /// [`Table::push_row`]. Like the other storage primitives, no
    /// constraint checks run here.
    pub fn insert_row_at(&mut self, row_index: usize, row: Row) {
        if self.rows.len() == self.rows.capacity() {
            self.rows.reserve_exact(self.rows.capacity().max(1));
        }
        let index = row_index.min(self.rows.len());
        self.rows.insert(index, row);
    }

    /// Detaches and returns the row at `row_index`; subsequent rows shift
    /// left by one, preserving order.
    pub fn remove_row(&mut self, row_index: usize) -> Result<Row, DbError> {
        if row_index >= self.rows.len() {
            return Err(DbError::InvalidArgument(format!(
                "row index {} out of range for table '{}'",
                row_index, self.name
            )));
        }
        Ok(self.rows.remove(row_index))
    }

    /// Writes one cell and returns the previous value, transferring
    /// ownership of any string buffer in the pre-image to the caller.
    ///
    /// No constraint checks run here; the value's variant must still match
    /// the column type.
    pub fn replace_value(
        &mut self,
        row_index: usize,
        col_index: usize,
        value: Value,
    ) -> Result<Value, DbError> {
        if row_index >= self.rows.len() {
            return Err(DbError::InvalidArgument(format!(
                "row index {} out of range for table '{}'",
                row_index, self.name
            )));
        }
        self.schema.check_value(col_index, &value)?;
        Ok(std::mem::replace(&mut self.rows[row_index].values[col_index], value))
    }

    /// Declares a foreign key on `column_name` referencing
    /// `referenced_table.referenced_column`. A descriptor already declared
    /// on the column is replaced. The referenced table need not exist yet;
    /// resolution happens at check time through the catalog.
    pub fn add_foreign_key(
        &mut self,
        column_name: &str,
        referenced_table: &str,
        referenced_column: &str,
    ) -> Result<(), DbError> {
        let col_index = self
            .schema
            .get_column_index(column_name)
            .ok_or_else(|| DbError::ColumnNotFound(column_name.to_string()))?;
        self.foreign_keys.retain(|fk| fk.column_index != col_index);
        self.foreign_keys.push(ForeignKeyDef {
            referenced_table: truncate_identifier(referenced_table),
            referenced_column: truncate_identifier(referenced_column),
            column_index: col_index,
        });
        self.schema.columns[col_index].is_foreign_key = true;
        Ok(())
    }

    /// Removes the foreign key declared on `column_name` and clears the
    /// column's flag.
    pub fn remove_foreign_key(&mut self, column_name: &str) -> Result<(), DbError> {
        let col_index = self
            .schema
            .get_column_index(column_name)
            .ok_or_else(|| DbError::ColumnNotFound(column_name.to_string()))?;
        let fk_index = self
            .foreign_keys
            .iter()
            .position(|fk| fk.column_index == col_index)
            .ok_or_else(|| DbError::ForeignKeyNotFound(column_name.to_string()))?;
        self.foreign_keys.remove(fk_index);
        self.schema.columns[col_index].is_foreign_key = false;
        Ok(())
    }

    /// Names of the tables this table references, deduplicated, in
    /// declaration order.
    pub fn get_referenced_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for fk in &self.foreign_keys {
            if !names.iter().any(|n| n == &fk.referenced_table) {
                names.push(fk.referenced_table.clone());
            }
        }
        names
    }
}
