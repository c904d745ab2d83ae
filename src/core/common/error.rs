// Consider using the 'thiserror' crate if it simplifies things.
// For now, a manual definition:
use crate::core::common::types::TransactionId;
use crate::core::types::DataType;

/// Main error type for engine operations. Each variant corresponds to one
/// caller-observable outcome; diagnostics beyond these are advisory and go
/// through the `log` facade.
#[derive(Debug, Clone, PartialEq)]
pub enum DbError {
    /// Empty identifier, out-of-range index, empty column list.
    InvalidArgument(String),
    /// Configuration file could not be read or parsed.
    Configuration(String),
    /// A table with this name is already registered in the catalog.
    DuplicateTable(String),
    TableNotFound(String),
    ColumnNotFound(String),
    /// No foreign key is declared on the named column.
    ForeignKeyNotFound(String),
    /// A cell value's variant does not match the owning column's type.
    TypeMismatch { expected: DataType, found: DataType },
    /// Uniqueness constraint check failed at mutation time.
    PrimaryKeyViolation { table: String, column: String },
    /// Referential check failed at mutation time.
    ForeignKeyViolation { table: String, column: String },
    /// Deferred referential check failed at commit; the transaction has been
    /// rolled back before this error is returned.
    CommitForeignKeyViolation { table: String, column: String },
    /// The table is locked by another transaction.
    LockConflict { table: String, holder: TransactionId },
    TransactionAlreadyActive(TransactionId),
    NoActiveTransaction,
}

impl std::fmt::Display for DbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbError::InvalidArgument(s) => write!(f, "Invalid argument: {}", s),
            DbError::Configuration(s) => write!(f, "Configuration error: {}", s),
            DbError::DuplicateTable(name) => write!(f, "Table '{}' already exists", name),
            DbError::TableNotFound(name) => write!(f, "Table '{}' not found", name),
            DbError::ColumnNotFound(name) => write!(f, "Column '{}' not found", name),
            DbError::ForeignKeyNotFound(col) => {
                write!(f, "No foreign key declared on column '{}'", col)
            }
            DbError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            DbError::PrimaryKeyViolation { table, column } => {
                write!(f, "Primary key violation on {}.{}", table, column)
            }
            DbError::ForeignKeyViolation { table, column } => {
                write!(f, "Foreign key violation on {}.{}", table, column)
            }
            DbError::CommitForeignKeyViolation { table, column } => {
                write!(f, "Foreign key violation on {}.{} at commit", table, column)
            }
            DbError::LockConflict { table, holder } => {
                write!(f, "Table '{}' is locked by transaction {}", table, holder)
            }
            DbError::TransactionAlreadyActive(id) => {
                write!(f, "Transaction {} is already active", id)
            }
            DbError::NoActiveTransaction => write!(f, "No active transaction"),
        }
    }
}

impl std::error::Error for DbError {}
