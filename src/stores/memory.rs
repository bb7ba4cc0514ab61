//! Implements an in-memory transaction store.
//!
//! Used when SQLite is not available. Each store owns its transactions, so
//! two stores never see each other's data.

use crate::{
    Error,
    database_id::TransactionId,
    stores::{Backend, TransactionStore},
    transaction::{Transaction, TransactionBuilder, TransactionQuery, sort_transactions},
};

/// Stores transactions in a `Vec` for the lifetime of the store.
#[derive(Debug, Clone)]
pub struct MemoryTransactionStore {
    /// Transactions in insertion order.
    transactions: Vec<Transaction>,
    next_id: TransactionId,
}

impl MemoryTransactionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            next_id: 1,
        }
    }
}

impl Default for MemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionStore for MemoryTransactionStore {
    fn backend(&self) -> Backend {
        Backend::Ephemeral
    }

    fn insert(&mut self, builder: TransactionBuilder) -> Result<TransactionId, Error> {
        let id = self.next_id;
        self.next_id += 1;
        self.transactions.push(builder.finalise(id));

        Ok(id)
    }

    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        self.transactions
            .iter()
            .find(|transaction| transaction.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn get_query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|transaction| query.matches(transaction))
            .cloned()
            .collect();

        sort_transactions(&mut transactions);

        Ok(transactions)
    }

    fn delete(&mut self, id: TransactionId) -> Result<(), Error> {
        self.transactions.retain(|transaction| transaction.id != id);

        Ok(())
    }

    fn count(&self) -> Result<usize, Error> {
        Ok(self.transactions.len())
    }
}
