// src/core/transaction/lock_manager.rs
use crate::core::common::{DbError, TransactionId};
use std::collections::{HashMap, HashSet};

/// Coarse per-table exclusive locks keyed by transaction id.
///
/// Locks are advisory: they reject mutations issued under a non-owning
/// transaction identity, they do not provide thread safety. Because only
/// one transaction can be active process-wide, deadlock is structurally
/// impossible; the conflict path is kept for future multi-writer work.
#[derive(Debug, Default)]
pub struct LockManager {
    /// Table name → holding transaction.
    lock_table: HashMap<String, TransactionId>,
    /// Transaction → tables it holds locks on, for bulk release.
    transaction_locks: HashMap<TransactionId, HashSet<String>>,
}

impl LockManager {
    #[must_use]
    pub fn new() -> Self {
        Self { lock_table: HashMap::new(), transaction_locks: HashMap::new() }
    }

    /// Acquires the exclusive lock on `table_name` for `transaction_id`.
    /// Re-acquisition by the holder is a no-op.
    ///
    /// Returns `true` when the lock was newly acquired by this call, so a
    /// failed mutation can release exactly what it took.
    ///
    /// # Errors
    ///
    /// Returns `DbError::LockConflict` when another transaction holds the
    /// lock.
    pub fn acquire_lock(
        &mut self,
        transaction_id: TransactionId,
        table_name: &str,
    ) -> Result<bool, DbError> {
        match self.lock_table.get(table_name) {
            Some(holder) if *holder != transaction_id => Err(DbError::LockConflict {
                table: table_name.to_string(),
                holder: *holder,
            }),
            Some(_) => Ok(false),
            None => {
                self.lock_table.insert(table_name.to_string(), transaction_id);
                self.transaction_locks
                    .entry(transaction_id)
                    .or_default()
                    .insert(table_name.to_string());
                Ok(true)
            }
        }
    }

    /// Releases one table lock, if `transaction_id` holds it.
    pub fn release_lock(&mut self, transaction_id: TransactionId, table_name: &str) {
        if self.lock_table.get(table_name) == Some(&transaction_id) {
            self.lock_table.remove(table_name);
            if let Some(held) = self.transaction_locks.get_mut(&transaction_id) {
                held.remove(table_name);
                if held.is_empty() {
                    self.transaction_locks.remove(&transaction_id);
                }
            }
        }
    }

    /// Releases every lock held by `transaction_id`.
    pub fn release_locks(&mut self, transaction_id: TransactionId) {
        if let Some(held) = self.transaction_locks.remove(&transaction_id) {
            for table_name in held {
                self.lock_table.remove(&table_name);
            }
        }
    }

    pub fn holder(&self, table_name: &str) -> Option<TransactionId> {
        self.lock_table.get(table_name).copied()
    }
}
