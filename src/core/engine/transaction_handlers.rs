//! Transaction lifecycle: begin, commit with deferred foreign-key
//! validation, rollback by reverse undo replay.

use super::Database;
use crate::core::common::{DbError, TransactionId};
use crate::core::transaction::{TransactionState, UndoOperation};
use log::{debug, warn};

impl Database {
    /// Opens a transaction.
    ///
    /// # Errors
    ///
    /// Returns `DbError::TransactionAlreadyActive` while another
    /// transaction is open; only one can be active process-wide.
    pub fn begin_transaction(&mut self) -> Result<TransactionId, DbError> {
        self.transaction_manager.begin_transaction(self.config.undo_log_capacity)
    }

    /// Commits the active transaction.
    ///
    /// Every row touched by an insert or update is re-validated against the
    /// catalog's current state: the referenced value may have disappeared
    /// since the mutation-time check. On any violation the transaction is
    /// fully rolled back and `DbError::CommitForeignKeyViolation` is
    /// returned. On success the undo log is dropped and all locks tagged
    /// with this transaction are released.
    pub fn commit_transaction(&mut self) -> Result<(), DbError> {
        let Some(tx) = self.transaction_manager.get_active_transaction() else {
            return Err(DbError::NoActiveTransaction);
        };

        let mut violation: Option<(String, String)> = None;
        'records: for op in &tx.undo_log {
            let (table_name, row_index) = match op {
                UndoOperation::RevertInsert { table, row_index }
                | UndoOperation::RevertUpdate { table, row_index, .. } => (table, *row_index),
                UndoOperation::RevertDelete { .. } => continue,
            };
            let Some(table) = self.catalog.table(table_name) else {
                continue;
            };
            // A later delete in the same transaction may have removed or
            // shifted the recorded row; whatever is gone needs no re-check.
            let Some(row) = table.rows().get(row_index) else {
                continue;
            };
            for (i, column) in table.schema().columns.iter().enumerate() {
                if !column.is_foreign_key {
                    continue;
                }
                if self
                    .catalog
                    .check_foreign_key_constraint(table, i, &row.values[i])
                    .is_err()
                {
                    violation = Some((table_name.clone(), column.name.clone()));
                    break 'records;
                }
            }
        }

        if let Some((table, column)) = violation {
            warn!(
                "commit of transaction {} failed: foreign key on {}.{} no longer satisfied",
                self.transaction_manager
                    .current_transaction_id()
                    .map_or(0, |id| id.0),
                table,
                column
            );
            self.rollback_transaction()?;
            return Err(DbError::CommitForeignKeyViolation { table, column });
        }

        let mut tx = self
            .transaction_manager
            .take_active()
            .ok_or(DbError::NoActiveTransaction)?;
        tx.set_state(TransactionState::Committed);
        self.lock_manager.release_locks(tx.id);
        debug!("committed transaction {}", tx.id);
        Ok(())
    }

    /// Rolls back the active transaction by replaying its undo log in
    /// reverse order, then releases its locks.
    ///
    /// Replay goes through the tables' storage primitives, which never
    /// append undo records, so reversal cannot re-log itself. Each record
    /// exactly inverts the mutation it was logged for, with deleted rows
    /// returning to their recorded index; every record therefore replays
    /// against the same table state its mutation left behind, and the row
    /// indices stored in earlier records stay accurate.
    pub fn rollback_transaction(&mut self) -> Result<(), DbError> {
        let mut tx = self
            .transaction_manager
            .take_active()
            .ok_or(DbError::NoActiveTransaction)?;
        debug!(
            "rolling back transaction {} ({} undo records)",
            tx.id,
            tx.undo_log.len()
        );
        for op in tx.undo_log.drain(..).rev() {
            self.apply_undo(op);
        }
        self.lock_manager.release_locks(tx.id);
        tx.set_state(TransactionState::Aborted);
        Ok(())
    }

    fn apply_undo(&mut self, op: UndoOperation) {
        match op {
            UndoOperation::RevertInsert { table, row_index } => {
                if let Some(t) = self.catalog.table_mut(&table) {
                    if t.remove_row(row_index).is_err() {
                        warn!("undo: stale row index {} for table '{}'", row_index, table);
                    }
                }
            }
            UndoOperation::RevertUpdate { table, row_index, col_index, old_value } => {
                if let Some(t) = self.catalog.table_mut(&table) {
                    if t.replace_value(row_index, col_index, old_value).is_err() {
                        warn!(
                            "undo: stale cell ({}, {}) for table '{}'",
                            row_index, col_index, table
                        );
                    }
                }
            }
            UndoOperation::RevertDelete { table, row_index, row } => {
                if let Some(t) = self.catalog.table_mut(&table) {
                    t.insert_row_at(row_index, row);
                }
            }
        }
    }
}
