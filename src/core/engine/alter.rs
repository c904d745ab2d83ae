//! Engine-level schema alteration. These apply immediately and are never
//! captured by the undo log: a schema change cannot be rolled back.

use super::Database;
use crate::core::common::DbError;
use crate::core::table::Table;
use crate::core::types::{ColumnDef, DataType, Value};

impl Database {
    /// Appends a column to the named table, filling every existing row
    /// with `default_value`.
    pub fn add_column(
        &mut self,
        table_name: &str,
        column_name: &str,
        data_type: DataType,
        default_value: Value,
    ) -> Result<(), DbError> {
        self.catalog
            .table_mut(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?
            .add_column(column_name, data_type, default_value)
    }

    /// Drops the named column from the named table, cascading to any
    /// foreign-key descriptor the column owns.
    pub fn drop_column(&mut self, table_name: &str, column_name: &str) -> Result<(), DbError> {
        self.catalog
            .table_mut(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?
            .drop_column(column_name)
    }

    /// Rebuilds the named table under a new schema and returns the result.
    ///
    /// Cells survive when name and type match; everything else becomes the
    /// type's zero value. The original stays registered untouched — the
    /// caller decides whether to swap the result in via
    /// [`Database::remove_table`] and [`Database::add_table`].
    pub fn transform_table(
        &self,
        table_name: &str,
        new_columns: Vec<ColumnDef>,
    ) -> Result<Table, DbError> {
        self.catalog
            .table(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?
            .transform(new_columns)
    }
}
