//! Process-local registry of named tables.
//!
//! The catalog exclusively owns its tables. Names are unique; lookup is a
//! linear scan and registration order is preserved. A table's presence in
//! the catalog does not imply referential closure — foreign-key descriptors
//! may name tables that are not (or are no longer) registered, so every
//! referential check resolves names freshly at the use site.

use crate::core::common::DbError;
use crate::core::table::Table;
use crate::core::types::Value;
use log::warn;

/// Table slots the catalog starts with when no configuration says otherwise.
pub const CATALOG_INITIAL_CAPACITY: usize = 10;

#[derive(Debug)]
pub struct Catalog {
    tables: Vec<Table>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(CATALOG_INITIAL_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { tables: Vec::with_capacity(capacity) }
    }

    /// Registers a table.
    ///
    /// # Errors
    ///
    /// Returns `DbError::DuplicateTable` when a table with the same name is
    /// already registered.
    pub fn add_table(&mut self, table: Table) -> Result<(), DbError> {
        if self.tables.iter().any(|t| t.name() == table.name()) {
            return Err(DbError::DuplicateTable(table.name().to_string()));
        }
        self.tables.push(table);
        Ok(())
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name() == name)
    }

    /// Unregisters and returns the named table, transferring ownership to
    /// the caller.
    pub fn remove_table(&mut self, name: &str) -> Option<Table> {
        let index = self.tables.iter().position(|t| t.name() == name)?;
        Some(self.tables.remove(index))
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Checks that `value` is an existing cell of the column referenced by
    /// the foreign key declared on `table`'s column at `col_index`.
    ///
    /// Columns without a foreign-key flag pass trivially. The check fails
    /// when the referenced table or column cannot be resolved, when the
    /// referenced column's type differs from the source column's, or when
    /// no row of the referenced table carries an equal value (strings
    /// compare byte-wise).
    pub fn check_foreign_key_constraint(
        &self,
        table: &Table,
        col_index: usize,
        value: &Value,
    ) -> Result<(), DbError> {
        let column = table.schema().columns.get(col_index).ok_or_else(|| {
            DbError::InvalidArgument(format!("column index {} out of range", col_index))
        })?;
        if !column.is_foreign_key {
            return Ok(());
        }
        let Some(fk) = table.foreign_key_for(col_index) else {
            return Ok(());
        };
        let violation = || DbError::ForeignKeyViolation {
            table: table.name().to_string(),
            column: column.name.clone(),
        };

        let Some(ref_table) = self.table(&fk.referenced_table) else {
            warn!(
                "foreign key on {}.{}: referenced table '{}' not found",
                table.name(),
                column.name,
                fk.referenced_table
            );
            return Err(violation());
        };
        let Some(ref_col_index) = ref_table.schema().get_column_index(&fk.referenced_column)
        else {
            warn!(
                "foreign key on {}.{}: column '{}' not found in table '{}'",
                table.name(),
                column.name,
                fk.referenced_column,
                fk.referenced_table
            );
            return Err(violation());
        };
        if ref_table.schema().columns[ref_col_index].data_type != column.data_type {
            return Err(violation());
        }
        if ref_table.rows().iter().any(|row| row.values[ref_col_index] == *value) {
            return Ok(());
        }
        warn!(
            "foreign key violation: value not present in {}.{}",
            fk.referenced_table, fk.referenced_column
        );
        Err(violation())
    }
}
