//! Single-writer transactions: undo records, the active-transaction slot,
//! and coarse per-table locks.

pub mod lock_manager;
pub mod manager;

pub use lock_manager::LockManager;
pub use manager::TransactionManager;

use crate::core::common::TransactionId;
use crate::core::types::{Row, Value};

/// Undo records a fresh transaction reserves space for when no
/// configuration says otherwise.
pub const UNDO_LOG_INITIAL_CAPACITY: usize = 100;

/// Represents the state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction is currently active and ongoing.
    Active,
    /// Transaction has been successfully committed.
    Committed,
    /// Transaction has been aborted and changes rolled back.
    Aborted,
}

/// One reversal record. Tables are referenced by name and resolved through
/// the catalog when the record is replayed; pre-image data (`old_value`,
/// `row`) is owned outright so reconstruction never aliases the live table.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoOperation {
    /// A row was appended at `row_index`; reverting removes it.
    RevertInsert { table: String, row_index: usize },
    /// A cell was overwritten; reverting moves `old_value` (and any string
    /// buffer it owns) back into the row.
    RevertUpdate { table: String, row_index: usize, col_index: usize, old_value: Value },
    /// A row was detached from `row_index`; reverting re-inserts the
    /// snapshot at that position, so the row indices stored by earlier
    /// records of the same transaction stay accurate during reverse
    /// replay.
    RevertDelete { table: String, row_index: usize, row: Row },
}

/// Represents a transaction in the system.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// A unique identifier for the transaction.
    pub id: TransactionId,
    /// The current state of the transaction.
    pub state: TransactionState,
    pub undo_log: Vec<UndoOperation>,
}

impl Transaction {
    /// Creates a new transaction with the given ID and an initial state of
    /// `Active`.
    #[must_use]
    pub fn new(id: TransactionId) -> Self {
        Self::with_undo_capacity(id, UNDO_LOG_INITIAL_CAPACITY)
    }

    #[must_use]
    pub fn with_undo_capacity(id: TransactionId, capacity: usize) -> Self {
        Self {
            id,
            state: TransactionState::Active,
            undo_log: Vec::with_capacity(capacity),
        }
    }

    /// Sets the state of the transaction.
    pub fn set_state(&mut self, state: TransactionState) {
        self.state = state;
    }

    /// Adds an undo operation to the transaction's undo log.
    pub fn add_undo_operation(&mut self, op: UndoOperation) {
        self.undo_log.push(op);
    }
}
