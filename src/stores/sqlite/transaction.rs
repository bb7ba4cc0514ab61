//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, params_from_iter, types::Type, types::Value};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TransactionId,
    db::initialize,
    stores::{Backend, TransactionStore},
    transaction::{
        CategoryFilter, Transaction, TransactionBuilder, TransactionQuery, from_epoch_millis,
        to_epoch_millis,
    },
};

/// Stores transactions in the `transactions` table of a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// This function will create the `transactions` table if it does not
    /// exist yet.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the database cannot be initialized.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    fn backend(&self) -> Backend {
        Backend::Durable
    }

    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is some SQL error.
    fn insert(&mut self, builder: TransactionBuilder) -> Result<TransactionId, Error> {
        let connection = self.lock()?;

        let id = connection
            .prepare(
                "INSERT INTO transactions (title, amount, date, isIncome, category)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id",
            )?
            .query_row(
                (
                    builder.title,
                    builder.amount,
                    to_epoch_millis(builder.date),
                    builder.is_income,
                    builder.category,
                ),
                |row| row.get(0),
            )?;

        Ok(id)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let transaction = self
            .lock()?
            .prepare(
                "SELECT id, title, amount, date, isIncome, category FROM transactions WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], map_transaction_row)?;

        Ok(transaction)
    }

    /// Query for transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn get_query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut query_string_parts =
            vec!["SELECT id, title, amount, date, isIncome, category FROM transactions".to_string()];
        let mut where_clause_parts = vec![];
        let mut query_parameters = vec![];

        if let CategoryFilter::Only(category) = &query.category {
            where_clause_parts.push(format!("category = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(category.clone()));
        }

        if let Some(is_income) = query.is_income {
            where_clause_parts.push(format!("isIncome = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Integer(i64::from(is_income)));
        }

        if let Some(date_range) = &query.date_range {
            where_clause_parts.push(format!(
                "date BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Integer(millis_at_or_after(*date_range.start())));
            query_parameters.push(Value::Integer(millis_at_or_before(*date_range.end())));
        }

        if !where_clause_parts.is_empty() {
            query_string_parts.push(String::from("WHERE ") + &where_clause_parts.join(" AND "));
        }

        // Sort by date, and then ID to keep the insertion order of transactions on the same date
        query_string_parts.push("ORDER BY date DESC, id ASC".to_string());

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        self.lock()?
            .prepare(&query_string)?
            .query_map(params, map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    /// Delete a transaction from the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn delete(&mut self, id: TransactionId) -> Result<(), Error> {
        let rows_affected = self
            .lock()?
            .execute("DELETE FROM transactions WHERE id = ?1", (id,))?;

        if rows_affected == 0 {
            tracing::debug!("Tried to delete transaction {id} which does not exist");
        }

        Ok(())
    }

    /// Get the total number of transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is some SQL error.
    fn count(&self) -> Result<usize, Error> {
        let count: i64 =
            self.lock()?
                .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))?;

        usize::try_from(count)
            .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(0, count).into())
    }
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let amount = row.get(2)?;
    let date = from_epoch_millis(row.get(3)?).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(error))
    })?;
    let is_income = row.get(4)?;
    let category = row.get(5)?;

    Ok(Transaction {
        id,
        title,
        amount,
        date,
        is_income,
        category,
    })
}

/// The first whole millisecond at or after `date`.
fn millis_at_or_after(date: OffsetDateTime) -> i64 {
    let nanos = date.unix_timestamp_nanos();
    let millis = nanos.div_euclid(1_000_000);

    if nanos.rem_euclid(1_000_000) == 0 {
        millis as i64
    } else {
        millis as i64 + 1
    }
}

/// The last whole millisecond at or before `date`.
fn millis_at_or_before(date: OffsetDateTime) -> i64 {
    date.unix_timestamp_nanos().div_euclid(1_000_000) as i64
}

#[cfg(test)]
mod sqlite_transaction_store_tests {
    use rusqlite::Connection;
    use time::{
        Duration,
        macros::{date, datetime, offset},
    };

    use crate::{
        Error,
        stores::{Backend, TransactionStore},
        transaction::{Category, Transaction, TransactionQuery},
    };

    use super::{SQLiteTransactionStore, millis_at_or_after, millis_at_or_before};

    fn get_store() -> SQLiteTransactionStore {
        let conn = Connection::open_in_memory().unwrap();
        SQLiteTransactionStore::new(conn).unwrap()
    }

    #[test]
    fn insert_succeeds() {
        let mut store = get_store();

        let result = store.insert(Transaction::build("Groceries", 12.3).unwrap());

        assert_eq!(result, Ok(1));
        assert_eq!(store.backend(), Backend::Durable);
    }

    #[test]
    fn get_transaction_by_id_succeeds() {
        let mut store = get_store();
        let builder = Transaction::build("Salary", 5000.0)
            .unwrap()
            .income()
            .category(Category::Salary.as_str())
            .date(datetime!(2025-01-31 17:00:00.250 UTC));
        let id = store.insert(builder.clone()).unwrap();

        let selected_transaction = store.get(id);

        assert_eq!(Ok(builder.finalise(id)), selected_transaction);
    }

    #[test]
    fn get_transaction_fails_on_invalid_id() {
        let mut store = get_store();
        let id = store
            .insert(Transaction::build("Bus", 3.0).unwrap())
            .unwrap();

        let maybe_transaction = store.get(id + 654);

        assert_eq!(maybe_transaction, Err(Error::NotFound));
    }

    #[test]
    fn stores_date_as_epoch_millis_and_flag_as_integer() {
        let mut store = get_store();
        store
            .insert(
                Transaction::build("Gig", 80.0)
                    .unwrap()
                    .income()
                    .date(datetime!(1970-01-01 0:00:01 UTC)),
            )
            .unwrap();

        let (date, is_income): (i64, i64) = store
            .lock()
            .unwrap()
            .query_row("SELECT date, isIncome FROM transactions", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();

        assert_eq!(date, 1000);
        assert_eq!(is_income, 1);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut store = get_store();
        store.insert(Transaction::build("A", 1.0).unwrap()).unwrap();
        let second = store.insert(Transaction::build("B", 2.0).unwrap()).unwrap();

        store.delete(second).unwrap();
        let third = store.insert(Transaction::build("C", 3.0).unwrap()).unwrap();

        assert_eq!(third, 3);
    }

    #[test]
    fn get_transactions_by_date_range_in_offset() {
        let mut store = get_store();
        let inside = [
            datetime!(2024-03-01 0:00 +13),
            datetime!(2024-03-31 23:59:59.999 +13),
        ];
        let outside = [
            datetime!(2024-02-29 23:59:59.999 +13),
            datetime!(2024-04-01 0:00 +13),
        ];
        let mut want = Vec::new();
        for date in inside {
            let builder = Transaction::build("in", 1.0).unwrap().date(date);
            let id = store.insert(builder.clone()).unwrap();
            want.push(builder.finalise(id));
        }
        for date in outside {
            store
                .insert(Transaction::build("out", 1.0).unwrap().date(date))
                .unwrap();
        }
        want.reverse();

        let got = store
            .get_query(&TransactionQuery::default().dates(
                date!(2024 - 03 - 01),
                date!(2024 - 03 - 31),
                offset!(+13),
            ))
            .unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn sub_millisecond_bounds_round_inwards() {
        let midnight = datetime!(2024-01-01 0:00 UTC);
        let start = midnight + Duration::nanoseconds(100);
        let end = midnight + Duration::nanoseconds(1_999_900);

        assert_eq!(millis_at_or_after(start), 1_704_067_200_001);
        assert_eq!(millis_at_or_before(end), 1_704_067_200_001);
    }

    #[test]
    fn count_of_empty_store_is_zero() {
        let store = get_store();

        assert_eq!(store.count(), Ok(0));
    }

    #[test]
    fn count_ignores_deleted() {
        let mut store = get_store();
        for i in 1..=5 {
            store
                .insert(Transaction::build("t", i as f64).unwrap())
                .unwrap();
        }

        store.delete(2).unwrap();
        store.delete(2).unwrap();

        assert_eq!(store.count(), Ok(4));
    }

    #[test]
    fn data_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pursebook.db");
        let builder = Transaction::build("Rent", 400.0)
            .unwrap()
            .category(Category::Bills.as_str())
            .date(datetime!(2025-02-01 9:00 UTC));

        let id = {
            let mut store = SQLiteTransactionStore::new(Connection::open(&path).unwrap()).unwrap();
            store.insert(builder.clone()).unwrap()
        };

        let mut store = SQLiteTransactionStore::new(Connection::open(&path).unwrap()).unwrap();
        let next_id = store
            .insert(Transaction::build("Power", 90.0).unwrap())
            .unwrap();

        assert_eq!(store.get(id), Ok(builder.finalise(id)));
        assert_eq!(next_id, id + 1);
    }
}
