//! Contains the [TransactionStore] trait, its implementations, and the
//! selection of a backend at start up.

mod memory;
mod transaction;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryTransactionStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SQLiteTransactionStore;
pub use transaction::{Backend, TransactionStore};

use crate::{Error, config::Config};

/// Whether this build can use the durable backend.
pub fn durable_backend_available() -> bool {
    cfg!(feature = "sqlite")
}

/// Open the store requested by `config`.
///
/// If the durable backend is requested but this build lacks SQLite, a
/// warning is logged and an empty in-memory store is returned instead.
///
/// # Errors
/// Returns an [Error::SqlError] if the database file cannot be opened or
/// initialized, e.g. because it is not a SQLite database.
pub fn open_store(config: &Config) -> Result<Box<dyn TransactionStore + Send>, Error> {
    if config.backend == Backend::Ephemeral {
        tracing::info!("Using an in-memory store, transactions will not be saved.");
        return Ok(Box::new(MemoryTransactionStore::new()));
    }

    match open_durable_store(config) {
        Ok(store) => {
            tracing::info!("Using the database at {:?}", config.db_path);
            Ok(store)
        }
        Err(Error::BackendUnavailable(reason)) => {
            tracing::warn!(
                "The durable backend is unavailable: {reason}. \
                 Falling back to an in-memory store, transactions will not be saved."
            );
            Ok(Box::new(MemoryTransactionStore::new()))
        }
        Err(error) => Err(error),
    }
}

#[cfg(feature = "sqlite")]
fn open_durable_store(config: &Config) -> Result<Box<dyn TransactionStore + Send>, Error> {
    let connection = rusqlite::Connection::open(&config.db_path)?;
    let store = SQLiteTransactionStore::new(connection)?;

    Ok(Box::new(store))
}

#[cfg(not(feature = "sqlite"))]
fn open_durable_store(_config: &Config) -> Result<Box<dyn TransactionStore + Send>, Error> {
    Err(Error::BackendUnavailable(
        "this build does not include SQLite".to_owned(),
    ))
}
