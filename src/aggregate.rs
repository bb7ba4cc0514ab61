//! Totals derived from the stored transactions.
//!
//! Provides the running balance over every transaction and the income and
//! expense totals for the calendar month containing a given instant.
//! Everything here is recalculated from the transactions passed in.

use std::ops::RangeInclusive;

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::{
    timezone::LocalTimezone,
    transaction::{Transaction, day_range},
};

/// Money earned and spent over some period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// The sum of income amounts.
    pub income: f64,
    /// The sum of expense amounts, as a positive number.
    pub expense: f64,
}

impl MonthlyTotals {
    /// Income minus expenses.
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// The figures shown on the overview: the balance over all time and the
/// totals for the current month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Total income minus total expenses over every transaction.
    pub balance: f64,
    /// Income and expenses for the current calendar month.
    pub month: MonthlyTotals,
}

/// Sums income and expenses separately.
///
/// # Arguments
/// * `transactions` - The transactions to add up
///
/// # Returns
/// The totals over every transaction passed in, callers pick the period by
/// what they pass.
pub fn totals<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> MonthlyTotals {
    transactions
        .into_iter()
        .fold(MonthlyTotals::default(), |mut totals, transaction| {
            if transaction.is_income {
                totals.income += transaction.amount;
            } else {
                totals.expense += transaction.amount;
            }

            totals
        })
}

/// Calculates the running balance, total income minus total expenses.
///
/// Pass every transaction, not a filtered view, to get the account balance.
pub fn balance(transactions: &[Transaction]) -> f64 {
    totals(transactions).net()
}

/// The totals for the transactions dated within the calendar month of `now`
/// in `timezone`.
pub fn monthly_totals(
    transactions: &[Transaction],
    now: OffsetDateTime,
    timezone: impl Into<LocalTimezone>,
) -> MonthlyTotals {
    let month = month_range(now, timezone);

    totals(
        transactions
            .iter()
            .filter(|transaction| month.contains(&transaction.date)),
    )
}

/// The first to the last instant of the calendar month containing `now`.
///
/// The month is measured in `timezone`, and each end of the month uses the
/// offset in effect on that day.
pub fn month_range(
    now: OffsetDateTime,
    timezone: impl Into<LocalTimezone>,
) -> RangeInclusive<OffsetDateTime> {
    let timezone = timezone.into();
    let today = timezone.to_local(now).date();
    let first_day = today - Duration::days(i64::from(today.day()) - 1);

    // 31 days after the first of any month lands early in the next month.
    let next_month = first_day + Duration::days(31);
    let last_day = next_month - Duration::days(i64::from(next_month.day()));

    day_range(first_day, last_day, timezone)
}
