//! Defines the core data model for transactions.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::TransactionId, transaction::Category};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build] and insert the
/// builder into a [TransactionStore](crate::TransactionStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID assigned by the store when the transaction was inserted.
    pub id: TransactionId,
    /// A short description of what the transaction was for.
    pub title: String,
    /// The amount of money spent or earned, always greater than zero.
    pub amount: f64,
    /// When the transaction happened, in UTC with millisecond precision.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Whether money was earned (`true`) or spent (`false`).
    pub is_income: bool,
    /// The category name, usually one of [Category].
    pub category: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder::new] for discoverability.
    ///
    /// # Errors
    /// See [TransactionBuilder::new].
    pub fn build(title: &str, amount: f64) -> Result<TransactionBuilder, Error> {
        TransactionBuilder::new(title, amount)
    }

    /// The amount with the sign implied by whether it is income or an expense.
    ///
    /// Only for display, the stored amount is always positive.
    pub fn signed_amount(&self) -> f64 {
        if self.is_income {
            self.amount
        } else {
            -self.amount
        }
    }
}

/// A validated transaction that has not been given an ID yet.
///
/// The only way to get a builder is through [TransactionBuilder::new], which
/// checks the title and amount, so stores can insert any builder they are
/// given without checking it again.
///
/// # Examples
///
/// ```
/// use pursebook::{Category, Transaction};
/// use time::macros::datetime;
///
/// let builder = Transaction::build("Pay day", 2500.0)
///     .unwrap()
///     .income()
///     .category(Category::Salary.as_str())
///     .date(datetime!(2025-01-15 9:00 UTC));
///
/// let transaction = builder.finalise(1);
///
/// assert_eq!(transaction.amount, 2500.0);
/// assert!(transaction.is_income);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    pub(crate) title: String,
    pub(crate) amount: f64,
    pub(crate) date: OffsetDateTime,
    pub(crate) is_income: bool,
    pub(crate) category: String,
}

impl TransactionBuilder {
    /// Start building an expense dated now in the `Other` category.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyTitle] if `title` is empty after trimming whitespace,
    /// - or [Error::NonPositiveAmount] if `amount` is not a finite number
    ///   greater than zero.
    pub fn new(title: &str, amount: f64) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }

        Ok(Self {
            title: title.to_owned(),
            amount: validate_amount(amount)?,
            date: normalise_date(OffsetDateTime::now_utc()),
            is_income: false,
            category: Category::Other.as_str().to_owned(),
        })
    }

    /// Mark the transaction as income.
    pub fn income(self) -> Self {
        self.is_income(true)
    }

    /// Mark the transaction as an expense.
    pub fn expense(self) -> Self {
        self.is_income(false)
    }

    /// Set whether the transaction is income.
    pub fn is_income(mut self, is_income: bool) -> Self {
        self.is_income = is_income;
        self
    }

    /// Set the category name.
    ///
    /// Any string is accepted, [Category] lists the ones offered to users.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set when the transaction happened.
    ///
    /// The date is converted to UTC and truncated to whole milliseconds,
    /// which is the precision the durable store keeps.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = normalise_date(date);
        self
    }

    /// Turn the builder into a [Transaction] with the ID a store assigned.
    pub fn finalise(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            title: self.title,
            amount: self.amount,
            date: self.date,
            is_income: self.is_income,
            category: self.category,
        }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Parse an amount typed in by the user.
///
/// # Errors
/// This function will return a:
/// - [Error::UnparseableAmount] if `text` is not a number,
/// - or [Error::NonPositiveAmount] if the number is not greater than zero.
pub fn parse_amount(text: &str) -> Result<f64, Error> {
    let text = text.trim();
    let amount: f64 = text
        .parse()
        .map_err(|_| Error::UnparseableAmount(text.to_owned()))?;

    validate_amount(amount)
}

fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::NonPositiveAmount(amount))
    }
}

fn normalise_date(date: OffsetDateTime) -> OffsetDateTime {
    let date = date.to_offset(UtcOffset::UTC);

    date.replace_millisecond(date.millisecond()).unwrap_or(date)
}

/// Convert a date to milliseconds since the Unix epoch.
#[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
pub(crate) fn to_epoch_millis(date: OffsetDateTime) -> i64 {
    (date.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Convert milliseconds since the Unix epoch back into a UTC date.
#[cfg_attr(not(feature = "sqlite"), allow(dead_code))]
pub(crate) fn from_epoch_millis(
    millis: i64,
) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
}

// ============================================================================
// TESTS
// ============================================================================
