//! Row mutation: insert, update, delete.
//!
//! Every mutation resolves its table by name, takes the coarse table lock
//! when a transaction is active, runs the constraint checks, applies the
//! change through the table's storage primitives, and appends an undo
//! record. A mutation that fails after taking a lock releases only the lock
//! it newly acquired; locks held from earlier mutations of the same
//! transaction stay until commit or rollback.

use super::Database;
use crate::core::common::{DbError, TransactionId};
use crate::core::transaction::UndoOperation;
use crate::core::types::{Row, Value};
use log::warn;

impl Database {
    /// Appends a row built from `values` to the named table.
    ///
    /// Checks run in order: arity and cell types against the schema, then
    /// referential existence for every foreign-key column, then uniqueness
    /// for every primary-key column.
    ///
    /// # Errors
    ///
    /// `DbError::TableNotFound`, `DbError::LockConflict`,
    /// `DbError::InvalidArgument` (arity), `DbError::TypeMismatch`,
    /// `DbError::ForeignKeyViolation`, `DbError::PrimaryKeyViolation`.
    pub fn insert_row(&mut self, table_name: &str, values: Vec<Value>) -> Result<(), DbError> {
        self.locked_mutation(table_name, |db| db.insert_row_checked(table_name, values))
    }

    /// Overwrites one cell, after the same referential and uniqueness
    /// checks as insert, scoped to the target column. The pre-image is
    /// captured into the undo log, string buffer and all.
    pub fn update_row(
        &mut self,
        table_name: &str,
        row_index: usize,
        col_index: usize,
        new_value: Value,
    ) -> Result<(), DbError> {
        self.locked_mutation(table_name, |db| {
            db.update_row_checked(table_name, row_index, col_index, new_value)
        })
    }

    /// Detaches the row at `row_index`; subsequent rows shift left by one.
    /// Under an active transaction the whole row moves into the undo log,
    /// otherwise it is dropped.
    pub fn delete_row(&mut self, table_name: &str, row_index: usize) -> Result<(), DbError> {
        self.locked_mutation(table_name, |db| db.delete_row_checked(table_name, row_index))
    }

    /// Lock wrapper shared by the three mutations: verifies the table
    /// exists, tags the table lock with the active transaction, runs `op`,
    /// and on failure gives back a lock this call acquired.
    fn locked_mutation(
        &mut self,
        table_name: &str,
        op: impl FnOnce(&mut Self) -> Result<(), DbError>,
    ) -> Result<(), DbError> {
        if self.catalog.table(table_name).is_none() {
            return Err(DbError::TableNotFound(table_name.to_string()));
        }
        let transaction_id = self.transaction_manager.current_transaction_id();
        let newly_locked = match transaction_id {
            Some(id) => self.lock_manager.acquire_lock(id, table_name)?,
            None => false,
        };
        let result = op(self);
        if result.is_err() && newly_locked {
            if let Some(id) = transaction_id {
                self.lock_manager.release_lock(id, table_name);
            }
        }
        result
    }

    fn insert_row_checked(&mut self, table_name: &str, values: Vec<Value>) -> Result<(), DbError> {
        {
            let table = self
                .catalog
                .table(table_name)
                .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;
            let schema = table.schema();
            if values.len() != schema.len() {
                return Err(DbError::InvalidArgument(format!(
                    "expected {} values for table '{}', got {}",
                    schema.len(),
                    table_name,
                    values.len()
                )));
            }
            for (i, value) in values.iter().enumerate() {
                schema.check_value(i, value)?;
            }
            for (i, column) in schema.columns.iter().enumerate() {
                if column.is_foreign_key {
                    self.catalog.check_foreign_key_constraint(table, i, &values[i])?;
                }
            }
            for (i, column) in schema.columns.iter().enumerate() {
                if !column.is_primary_key {
                    continue;
                }
                if table.rows().iter().any(|row| row.values[i] == values[i]) {
                    warn!(
                        "primary key violation on {}.{}",
                        table_name, column.name
                    );
                    return Err(DbError::PrimaryKeyViolation {
                        table: table_name.to_string(),
                        column: column.name.clone(),
                    });
                }
            }
        }

        let table = self
            .catalog
            .table_mut(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;
        table.push_row(Row::new(values));
        let row_index = table.num_rows() - 1;
        self.transaction_manager.record_undo(UndoOperation::RevertInsert {
            table: table_name.to_string(),
            row_index,
        });
        Ok(())
    }

    fn update_row_checked(
        &mut self,
        table_name: &str,
        row_index: usize,
        col_index: usize,
        new_value: Value,
    ) -> Result<(), DbError> {
        {
            let table = self
                .catalog
                .table(table_name)
                .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;
            if row_index >= table.num_rows() {
                return Err(DbError::InvalidArgument(format!(
                    "row index {} out of range for table '{}'",
                    row_index, table_name
                )));
            }
            let schema = table.schema();
            schema.check_value(col_index, &new_value)?;
            let column = &schema.columns[col_index];
            if column.is_foreign_key {
                self.catalog.check_foreign_key_constraint(table, col_index, &new_value)?;
            }
            if column.is_primary_key {
                let duplicate = table
                    .rows()
                    .iter()
                    .enumerate()
                    .any(|(i, row)| i != row_index && row.values[col_index] == new_value);
                if duplicate {
                    warn!(
                        "primary key violation on {}.{}",
                        table_name, column.name
                    );
                    return Err(DbError::PrimaryKeyViolation {
                        table: table_name.to_string(),
                        column: column.name.clone(),
                    });
                }
            }
        }

        let old_value = self
            .catalog
            .table_mut(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?
            .replace_value(row_index, col_index, new_value)?;
        self.transaction_manager.record_undo(UndoOperation::RevertUpdate {
            table: table_name.to_string(),
            row_index,
            col_index,
            old_value,
        });
        Ok(())
    }

    fn delete_row_checked(&mut self, table_name: &str, row_index: usize) -> Result<(), DbError> {
        let table = self
            .catalog
            .table_mut(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;
        let row = table.remove_row(row_index)?;
        // Moves the detached row into the undo log when a transaction is
        // active; otherwise the snapshot is dropped here.
        self.transaction_manager.record_undo(UndoOperation::RevertDelete {
            table: table_name.to_string(),
            row_index,
            row,
        });
        Ok(())
    }

    /// The transaction currently holding the named table's lock, if any.
    pub fn lock_holder(&self, table_name: &str) -> Option<TransactionId> {
        self.lock_manager.holder(table_name)
    }
}
