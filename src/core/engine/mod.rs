//! The engine façade: one [`Database`] owns the catalog, the
//! active-transaction slot, and the table locks, and orchestrates every
//! operation that needs more than one of them — constraint-checked row
//! mutation, schema alteration, and commit/rollback with deferred
//! foreign-key validation.
//!
//! Tables are addressed by name throughout; the catalog resolves names at
//! each call, so row and column indices are the only positional state a
//! caller holds, and those are invalidated by structural changes as usual.

mod alter;
mod mutation;
mod transaction_handlers;

#[cfg(test)]
mod tests;

use crate::core::catalog::Catalog;
use crate::core::common::DbError;
use crate::core::config::Config;
use crate::core::table::Table;
use crate::core::transaction::{LockManager, TransactionManager};
use crate::core::types::ColumnDef;
use std::path::Path;

#[derive(Debug)]
pub struct Database {
    catalog: Catalog,
    transaction_manager: TransactionManager,
    lock_manager: LockManager,
    config: Config,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Creates an empty database with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_config(Config::default())
    }

    #[must_use]
    pub fn new_with_config(config: Config) -> Self {
        Self {
            catalog: Catalog::with_capacity(config.initial_catalog_capacity),
            transaction_manager: TransactionManager::new(),
            lock_manager: LockManager::new(),
            config,
        }
    }

    /// Creates an empty database configured from a TOML file; missing file
    /// means defaults.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Configuration` if the file cannot be read or
    /// parsed.
    pub fn new_from_config_file(config_path: impl AsRef<Path>) -> Result<Self, DbError> {
        let config = Config::load_from_file(config_path.as_ref())?;
        Ok(Self::new_with_config(config))
    }

    /// Builds a table from `columns` and registers it under `name`.
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidArgument` on an empty name or column list
    /// and `DbError::DuplicateTable` when the name is taken.
    pub fn create_table(&mut self, name: &str, columns: Vec<ColumnDef>) -> Result<(), DbError> {
        let table = Table::with_capacity(name, columns, self.config.initial_table_capacity)?;
        self.catalog.add_table(table)
    }

    /// Registers an externally built table, e.g. the result of
    /// [`Database::transform_table`].
    pub fn add_table(&mut self, table: Table) -> Result<(), DbError> {
        self.catalog.add_table(table)
    }

    /// Unregisters the named table and hands it to the caller.
    pub fn remove_table(&mut self, name: &str) -> Option<Table> {
        self.catalog.remove_table(name)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.catalog.table(name)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Direct mutable catalog access. Mutations made through this handle
    /// bypass locks, constraint checks and the undo log.
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Declares a foreign key on `table_name.column_name` referencing
    /// `referenced_table.referenced_column`.
    pub fn add_foreign_key(
        &mut self,
        table_name: &str,
        column_name: &str,
        referenced_table: &str,
        referenced_column: &str,
    ) -> Result<(), DbError> {
        self.catalog
            .table_mut(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?
            .add_foreign_key(column_name, referenced_table, referenced_column)
    }

    pub fn remove_foreign_key(
        &mut self,
        table_name: &str,
        column_name: &str,
    ) -> Result<(), DbError> {
        self.catalog
            .table_mut(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?
            .remove_foreign_key(column_name)
    }

    /// Re-checks every foreign-key cell of the named table against the
    /// catalog's current state.
    ///
    /// # Errors
    ///
    /// Returns the first `DbError::ForeignKeyViolation` encountered.
    pub fn validate_foreign_keys(&self, table_name: &str) -> Result<(), DbError> {
        let table = self
            .catalog
            .table(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;
        for fk in table.foreign_keys() {
            for row in table.rows() {
                self.catalog.check_foreign_key_constraint(
                    table,
                    fk.column_index,
                    &row.values[fk.column_index],
                )?;
            }
        }
        Ok(())
    }

    /// Names of the tables referenced by the named table's foreign keys.
    pub fn get_referenced_tables(&self, table_name: &str) -> Result<Vec<String>, DbError> {
        let table = self
            .catalog
            .table(table_name)
            .ok_or_else(|| DbError::TableNotFound(table_name.to_string()))?;
        Ok(table.get_referenced_tables())
    }
}

impl Drop for Database {
    /// Teardown rolls back a still-active transaction before the catalog
    /// goes away: uncommitted mutations are reverted, never silently kept.
    fn drop(&mut self) {
        if self.transaction_manager.get_active_transaction().is_some() {
            let _ = self.rollback_transaction();
        }
    }
}
