//! Filtering and ordering of transactions.
//!
//! A [TransactionQuery] is applied the same way by every store: the
//! in-memory store calls [TransactionQuery::matches] on each transaction and
//! the SQLite store renders the same predicates as a `WHERE` clause. Either
//! way results are ordered by [sort_transactions].

use std::{cmp::Ordering, ops::RangeInclusive};

use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};

use crate::{
    timezone::LocalTimezone,
    transaction::{CategoryFilter, Transaction},
};

/// Defines which transactions [TransactionStore::get_query](crate::TransactionStore::get_query)
/// returns.
///
/// The default query matches every transaction. Predicates that are set
/// must all match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Only include transactions in this category.
    pub category: CategoryFilter,
    /// Only include income (`Some(true)`) or expenses (`Some(false)`).
    pub is_income: Option<bool>,
    /// Only include transactions dated within this range (inclusive).
    pub date_range: Option<RangeInclusive<OffsetDateTime>>,
}

impl TransactionQuery {
    /// Restrict the query to a category.
    pub fn category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    /// Restrict the query to income or expenses, `None` includes both.
    pub fn is_income(mut self, is_income: Option<bool>) -> Self {
        self.is_income = is_income;
        self
    }

    /// Restrict the query to transactions between two instants (inclusive).
    pub fn between(mut self, date_range: RangeInclusive<OffsetDateTime>) -> Self {
        self.date_range = Some(date_range);
        self
    }

    /// Restrict the query to transactions on the days from `start` to `end`
    /// (inclusive) in `timezone`.
    pub fn dates(self, start: Date, end: Date, timezone: impl Into<LocalTimezone>) -> Self {
        self.between(day_range(start, end, timezone))
    }

    /// Whether `transaction` passes every predicate of the query.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.category.matches(&transaction.category)
            && self
                .is_income
                .is_none_or(|is_income| is_income == transaction.is_income)
            && self
                .date_range
                .as_ref()
                .is_none_or(|range| range.contains(&transaction.date))
    }
}

/// The instants from the start of the day `start` to the end of the day `end`
/// in `timezone`.
pub fn day_range(
    start: Date,
    end: Date,
    timezone: impl Into<LocalTimezone>,
) -> RangeInclusive<OffsetDateTime> {
    let timezone = timezone.into();
    let first_instant = timezone.start_of_day(start);
    let last_instant = match end.next_day() {
        Some(next_day) => timezone.start_of_day(next_day) - Duration::nanoseconds(1),
        None => PrimitiveDateTime::MAX.assume_utc(),
    };

    first_instant..=last_instant
}

/// Order transactions from most to least recent.
///
/// Transactions on the same date keep the order they were inserted in.
pub fn compare_transactions(a: &Transaction, b: &Transaction) -> Ordering {
    b.date.cmp(&a.date).then(a.id.cmp(&b.id))
}

/// Sort transactions with [compare_transactions].
pub fn sort_transactions(transactions: &mut [Transaction]) {
    transactions.sort_by(compare_transactions);
}

#[cfg(test)]
mod tests {
    use time::{
        Date, PrimitiveDateTime,
        macros::{date, datetime, offset},
    };

    use crate::{
        timezone::get_local_timezone,
        transaction::{Category, CategoryFilter, Transaction},
    };

    use super::{TransactionQuery, day_range, sort_transactions};

    fn transaction(
        id: i64,
        category: Category,
        is_income: bool,
        date: time::OffsetDateTime,
    ) -> Transaction {
        Transaction::build("test", 10.0)
            .unwrap()
            .is_income(is_income)
            .category(category.as_str())
            .date(date)
            .finalise(id)
    }

    #[test]
    fn default_query_matches_everything() {
        let query = TransactionQuery::default();

        assert!(query.matches(&transaction(
            1,
            Category::Food,
            false,
            datetime!(2024-01-05 12:00 UTC)
        )));
        assert!(query.matches(&transaction(
            2,
            Category::Salary,
            true,
            datetime!(1999-12-31 23:59 UTC)
        )));
    }

    #[test]
    fn predicates_are_conjunctive() {
        let a = transaction(1, Category::Food, false, datetime!(2024-01-05 12:00 UTC));
        let b = transaction(2, Category::Salary, true, datetime!(2024-01-10 12:00 UTC));
        let c = transaction(3, Category::Food, false, datetime!(2024-02-01 12:00 UTC));
        let query = TransactionQuery::default()
            .category(Category::Food)
            .is_income(Some(false))
            .dates(date!(2024 - 01 - 01), date!(2024 - 01 - 31), offset!(UTC));

        let got: Vec<_> = [a.clone(), b, c]
            .into_iter()
            .filter(|transaction| query.matches(transaction))
            .collect();

        assert_eq!(got, vec![a]);
    }

    #[test]
    fn type_filter_matches_flag() {
        let income = transaction(1, Category::Salary, true, datetime!(2024-01-05 12:00 UTC));
        let expense = transaction(2, Category::Food, false, datetime!(2024-01-05 12:00 UTC));

        let income_query = TransactionQuery::default().is_income(Some(true));
        let expense_query = TransactionQuery::default().is_income(Some(false));

        assert!(income_query.matches(&income));
        assert!(!income_query.matches(&expense));
        assert!(expense_query.matches(&expense));
        assert!(!expense_query.matches(&income));
    }

    #[test]
    fn date_range_includes_boundary_days() {
        let query =
            TransactionQuery::default().dates(date!(2024 - 01 - 01), date!(2024 - 01 - 31), offset!(UTC));

        let cases = [
            (datetime!(2024-01-01 0:00 UTC), true),
            (datetime!(2024-01-31 23:59:59.999 UTC), true),
            (datetime!(2023-12-31 23:59:59.999 UTC), false),
            (datetime!(2024-02-01 0:00 UTC), false),
        ];

        for (date, want) in cases {
            let got = query.matches(&transaction(1, Category::Food, false, date));
            assert_eq!(got, want, "date {date} should be included: {want}");
        }
    }

    #[test]
    fn day_range_uses_offset() {
        let range = day_range(date!(2024 - 03 - 01), date!(2024 - 03 - 01), offset!(+13));

        assert_eq!(*range.start(), datetime!(2024-02-29 11:00 UTC));
        assert_eq!(*range.end(), datetime!(2024-03-01 10:59:59.999999999 UTC));
    }

    #[test]
    fn day_range_uses_offset_of_each_day() {
        // Auckland moves from +12 to +13 on 28 September 2025.
        let auckland = get_local_timezone("Pacific/Auckland").unwrap();

        let range = day_range(date!(2025 - 09 - 01), date!(2025 - 10 - 01), auckland);

        assert_eq!(*range.start(), datetime!(2025-08-31 12:00 UTC));
        assert_eq!(*range.end(), datetime!(2025-10-01 10:59:59.999999999 UTC));
    }

    #[test]
    fn day_range_excludes_day_before_daylight_saving_boundary() {
        let auckland = get_local_timezone("Pacific/Auckland").unwrap();
        let query = TransactionQuery::default().dates(
            date!(2025 - 10 - 01),
            date!(2025 - 10 - 31),
            auckland,
        );

        // 2025-09-30 23:30 +13
        let day_before = transaction(1, Category::Food, false, datetime!(2025-09-30 10:30 UTC));
        // 2025-10-01 00:30 +13
        let first_day = transaction(2, Category::Food, false, datetime!(2025-09-30 11:30 UTC));

        assert!(!query.matches(&day_before));
        assert!(query.matches(&first_day));
    }

    #[test]
    fn day_range_to_last_date_does_not_overflow() {
        let range = day_range(date!(2024 - 01 - 01), Date::MAX, offset!(UTC));

        assert_eq!(*range.end(), PrimitiveDateTime::MAX.assume_utc());
    }

    #[test]
    fn all_category_filter_is_disabled() {
        let query = TransactionQuery::default().category(CategoryFilter::All);

        assert!(query.matches(&transaction(
            1,
            Category::Education,
            false,
            datetime!(2024-01-05 12:00 UTC)
        )));
    }

    #[test]
    fn sort_is_descending_by_date_then_insertion_order() {
        let mut transactions = vec![
            transaction(1, Category::Food, false, datetime!(2024-01-01 9:00 UTC)),
            transaction(2, Category::Food, false, datetime!(2024-01-03 9:00 UTC)),
            transaction(3, Category::Food, false, datetime!(2024-01-02 9:00 UTC)),
            transaction(4, Category::Food, false, datetime!(2024-01-03 9:00 UTC)),
        ];

        sort_transactions(&mut transactions);

        let ids: Vec<_> = transactions.iter().map(|transaction| transaction.id).collect();
        assert_eq!(ids, vec![2, 4, 3, 1]);
    }
}
