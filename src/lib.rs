//! Pursebook is a personal income and expense tracker.
//!
//! This library provides the transaction store behind the app: a durable
//! SQLite backend, an in-memory fallback with the same behaviour, filtering
//! of the stored transactions, and the balance and monthly totals derived
//! from them.

#![warn(missing_docs)]

pub mod aggregate;
pub mod clock;
pub mod config;
mod database_id;
#[cfg(feature = "sqlite")]
pub mod db;
pub mod format;
pub mod ledger;
pub mod logging;
pub mod stores;
pub mod timezone;
pub mod transaction;

pub use aggregate::{MonthlyTotals, Summary};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use database_id::TransactionId;
pub use ledger::Ledger;
pub use stores::{Backend, MemoryTransactionStore, TransactionStore, open_store};
pub use timezone::LocalTimezone;
#[cfg(feature = "sqlite")]
pub use stores::SQLiteTransactionStore;
pub use transaction::{
    Category, CategoryFilter, Transaction, TransactionBuilder, TransactionQuery, parse_amount,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction was given a title that is empty or only whitespace.
    #[error("the transaction title cannot be empty")]
    EmptyTitle,

    /// A transaction was given an amount that is zero, negative or not a
    /// finite number.
    ///
    /// Amounts are magnitudes, whether money came in or went out is recorded
    /// separately as income or expense.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    NonPositiveAmount(f64),

    /// The text entered for an amount could not be read as a number.
    #[error("\"{0}\" is not a number")]
    UnparseableAmount(String),

    /// A date could not be parsed from user input.
    ///
    /// Callers should pass in the offending string.
    #[error("could not parse the date \"{0}\", expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The requested transaction was not found.
    ///
    /// Deleting a transaction that does not exist is not an error, so this
    /// only comes from looking up a single transaction.
    #[error("the requested transaction could not be found")]
    NotFound,

    /// The durable backend could not be opened on this platform.
    ///
    /// [open_store] recovers from this by using the in-memory backend, so
    /// callers of the store never see it.
    #[error("the durable backend is unavailable: {0}")]
    BackendUnavailable(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[cfg(feature = "sqlite")]
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
