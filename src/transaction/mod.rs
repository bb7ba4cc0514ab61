//! Transactions and the queries that select them.
//!
//! This module contains:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The fixed `Category` set and the `CategoryFilter` used in queries
//! - `TransactionQuery` and the ordering shared by every store

mod category;
mod core;
mod query;

pub use category::{ALL_CATEGORIES, Category, CategoryFilter, UnknownCategory};
pub use self::core::{Transaction, TransactionBuilder, parse_amount};
pub(crate) use self::core::{from_epoch_millis, to_epoch_millis};
pub use query::{TransactionQuery, compare_transactions, day_range, sort_transactions};
