use crate::core::common::{DbError, TransactionId};
use crate::core::transaction::{Transaction, UndoOperation};

/// Owns the single active-transaction slot and the monotonic id counter.
///
/// At most one transaction is active at any moment; ids are assigned from a
/// strictly increasing counter starting at 1 and are never reused.
#[derive(Debug)]
pub struct TransactionManager {
    active_transaction: Option<Transaction>,
    next_transaction_id: u64,
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionManager {
    #[must_use]
    pub fn new() -> Self {
        Self { active_transaction: None, next_transaction_id: 1 }
    }

    /// Opens a transaction with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `DbError::TransactionAlreadyActive` while another
    /// transaction occupies the slot.
    pub fn begin_transaction(&mut self, undo_capacity: usize) -> Result<TransactionId, DbError> {
        if let Some(active) = &self.active_transaction {
            return Err(DbError::TransactionAlreadyActive(active.id));
        }
        let id = TransactionId(self.next_transaction_id);
        self.next_transaction_id += 1;
        self.active_transaction = Some(Transaction::with_undo_capacity(id, undo_capacity));
        Ok(id)
    }

    pub fn get_active_transaction(&self) -> Option<&Transaction> {
        self.active_transaction.as_ref()
    }

    pub fn get_active_transaction_mut(&mut self) -> Option<&mut Transaction> {
        self.active_transaction.as_mut()
    }

    pub fn current_transaction_id(&self) -> Option<TransactionId> {
        self.active_transaction.as_ref().map(|tx| tx.id)
    }

    /// Clears the slot and hands the transaction (with its undo log) to the
    /// caller for commit validation or rollback replay.
    pub fn take_active(&mut self) -> Option<Transaction> {
        self.active_transaction.take()
    }

    /// Appends an undo record to the active transaction; does nothing when
    /// no transaction is active.
    pub fn record_undo(&mut self, op: UndoOperation) {
        if let Some(tx) = self.active_transaction.as_mut() {
            tx.add_undo_operation(op);
        }
    }
}
