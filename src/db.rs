//! Database setup for the durable store.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::Error;

/// The version of the schema created by [initialize].
pub const SCHEMA_VERSION: i64 = 1;

/// Create the tables the app needs if they do not exist yet.
///
/// Safe to call on every start up, existing data is left untouched.
///
/// # Errors
/// Returns an [Error::SqlError] if the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;
    transaction.pragma_update(None, "user_version", SCHEMA_VERSION)?;

    transaction.commit()?;

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                date INTEGER NOT NULL,
                isIncome INTEGER NOT NULL,
                category TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT INTO sqlite_sequence (name, seq)
         SELECT 'transactions', 0
         WHERE NOT EXISTS (SELECT 1 FROM sqlite_sequence WHERE name = 'transactions')",
        (),
    )?;

    // Queries are always ordered by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);",
        (),
    )?;

    Ok(())
}
