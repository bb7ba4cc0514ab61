//! The SQLite backend for the durable store.

mod transaction;

pub use transaction::SQLiteTransactionStore;
