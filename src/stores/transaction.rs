//! Defines the transaction store trait.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    aggregate::{self, MonthlyTotals},
    clock::Clock,
    database_id::TransactionId,
    transaction::{Transaction, TransactionBuilder, TransactionQuery},
};

/// Which kind of storage a [TransactionStore] keeps its transactions in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// A SQLite database that survives restarts.
    #[default]
    Durable,
    /// Memory owned by the store, gone when the store is dropped.
    Ephemeral,
}

/// Handles the creation, retrieval and deletion of transactions.
///
/// Every implementation must give the same results for the same sequence of
/// calls: IDs start at 1 and are never reused, and queries are ordered by
/// [compare_transactions](crate::transaction::compare_transactions).
pub trait TransactionStore {
    /// Which kind of storage this store uses.
    fn backend(&self) -> Backend;

    /// Add a transaction to the store and return the ID assigned to it.
    fn insert(&mut self, builder: TransactionBuilder) -> Result<TransactionId, Error>;

    /// Retrieve a transaction from the store.
    ///
    /// Returns [Error::NotFound] if there is no transaction with `id`.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Retrieve transactions from the store in the way defined by `query`,
    /// most recent first.
    fn get_query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Remove the transaction with `id`.
    ///
    /// Deleting a transaction that does not exist succeeds and changes nothing.
    fn delete(&mut self, id: TransactionId) -> Result<(), Error>;

    /// The number of transactions in the store.
    fn count(&self) -> Result<usize, Error>;

    /// Retrieve every transaction, most recent first.
    fn all(&self) -> Result<Vec<Transaction>, Error> {
        self.get_query(&TransactionQuery::default())
    }

    /// Income and expense totals for the calendar month containing
    /// `clock.now()`.
    fn monthly_totals(&self, clock: &dyn Clock) -> Result<MonthlyTotals, Error> {
        let month = aggregate::month_range(clock.now(), clock.timezone());
        let transactions = self.get_query(&TransactionQuery::default().between(month))?;

        Ok(aggregate::totals(&transactions))
    }
}

impl<S: TransactionStore + ?Sized> TransactionStore for Box<S> {
    fn backend(&self) -> Backend {
        (**self).backend()
    }

    fn insert(&mut self, builder: TransactionBuilder) -> Result<TransactionId, Error> {
        (**self).insert(builder)
    }

    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        (**self).get(id)
    }

    fn get_query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        (**self).get_query(query)
    }

    fn delete(&mut self, id: TransactionId) -> Result<(), Error> {
        (**self).delete(id)
    }

    fn count(&self) -> Result<usize, Error> {
        (**self).count()
    }

    fn all(&self) -> Result<Vec<Transaction>, Error> {
        (**self).all()
    }

    fn monthly_totals(&self, clock: &dyn Clock) -> Result<MonthlyTotals, Error> {
        (**self).monthly_totals(clock)
    }
}
