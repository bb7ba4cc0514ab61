//! The ledger ties a store to a clock and is what front ends talk to.

use crate::{
    Error,
    aggregate::{self, MonthlyTotals, Summary},
    clock::{Clock, SystemClock},
    database_id::TransactionId,
    stores::{Backend, TransactionStore},
    transaction::{Transaction, TransactionBuilder, TransactionQuery},
};

/// Records transactions and answers questions about them.
///
/// Mutating methods take `&mut self`, so every operation on a ledger
/// finishes before the next one starts.
#[derive(Debug)]
pub struct Ledger<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: TransactionStore, C: Clock> Ledger<S, C> {
    /// Create a ledger that keeps transactions in `store` and reads the
    /// time from `clock`.
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Which kind of storage the ledger is using.
    pub fn backend(&self) -> Backend {
        self.store.backend()
    }

    /// Record a new transaction.
    ///
    /// # Errors
    /// Returns any error from the store, e.g. [Error::SqlError].
    pub fn add(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let id = self.store.insert(builder.clone())?;
        let transaction = builder.finalise(id);

        tracing::info!(
            "Added transaction {id}: \"{}\" {} ({})",
            transaction.title,
            transaction.amount,
            if transaction.is_income {
                "income"
            } else {
                "expense"
            }
        );

        Ok(transaction)
    }

    /// Remove a transaction. Removing one that does not exist is not an error.
    ///
    /// # Errors
    /// Returns any error from the store, e.g. [Error::SqlError].
    pub fn delete(&mut self, id: TransactionId) -> Result<(), Error> {
        self.store.delete(id)?;
        tracing::info!("Deleted transaction {id}");

        Ok(())
    }

    /// Get a single transaction.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with `id`.
    pub fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        self.store.get(id)
    }

    /// The transactions selected by `query`, most recent first.
    ///
    /// # Errors
    /// Returns any error from the store, e.g. [Error::SqlError].
    pub fn transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let transactions = self.store.get_query(query)?;
        tracing::debug!("{query:?} matched {} transactions", transactions.len());

        Ok(transactions)
    }

    /// Every transaction, most recent first.
    ///
    /// # Errors
    /// Returns any error from the store, e.g. [Error::SqlError].
    pub fn all(&self) -> Result<Vec<Transaction>, Error> {
        self.store.all()
    }

    /// Total income minus total expenses over every transaction.
    ///
    /// # Errors
    /// Returns any error from the store, e.g. [Error::SqlError].
    pub fn balance(&self) -> Result<f64, Error> {
        Ok(aggregate::balance(&self.store.all()?))
    }

    /// Income and expenses for the current calendar month.
    ///
    /// # Errors
    /// Returns any error from the store, e.g. [Error::SqlError].
    pub fn monthly_totals(&self) -> Result<MonthlyTotals, Error> {
        self.store.monthly_totals(&self.clock)
    }

    /// The balance and the current month's totals, computed from one read
    /// of the store.
    ///
    /// # Errors
    /// Returns any error from the store, e.g. [Error::SqlError].
    pub fn summary(&self) -> Result<Summary, Error> {
        let transactions = self.store.all()?;

        Ok(Summary {
            balance: aggregate::balance(&transactions),
            month: aggregate::monthly_totals(
                &transactions,
                self.clock.now(),
                self.clock.timezone(),
            ),
        })
    }
}
