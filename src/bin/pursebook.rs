use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use time::{Date, PrimitiveDateTime, macros::format_description};

use pursebook::{
    Backend, Category, CategoryFilter, Config, Ledger, LocalTimezone, SystemClock, Transaction,
    TransactionId, TransactionQuery, TransactionStore,
    config::{DEFAULT_DB_PATH, DEFAULT_TIMEZONE},
    format::{format_currency, format_signed},
    logging::setup_logging,
    open_store, parse_amount,
    transaction::{ALL_CATEGORIES, day_range},
};

/// Track personal income and expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database.
    #[arg(long, env = "PURSEBOOK_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db_path: PathBuf,

    /// The canonical name of your timezone, e.g. "Pacific/Auckland".
    ///
    /// Decides which day a transaction falls on and where months start.
    #[arg(long, env = "PURSEBOOK_TIMEZONE", default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Keep transactions in memory for this run only.
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a transaction.
    Add {
        /// What the money was for, e.g. "Groceries".
        #[arg(long)]
        title: String,

        /// How much money, always a positive number.
        #[arg(long)]
        amount: String,

        /// Record income instead of an expense.
        #[arg(long)]
        income: bool,

        /// Defaults to "Other", or "Other Income" for income.
        #[arg(long)]
        category: Option<Category>,

        /// The day of the transaction as YYYY-MM-DD, defaults to now.
        #[arg(long)]
        date: Option<String>,
    },
    /// List transactions, most recent first.
    List {
        /// Only show this category, "All" shows every category.
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: CategoryFilter,

        /// Only show income.
        #[arg(long, conflicts_with = "expense")]
        income: bool,

        /// Only show expenses.
        #[arg(long)]
        expense: bool,

        /// First day to include as YYYY-MM-DD.
        #[arg(long)]
        from: Option<String>,

        /// Last day to include as YYYY-MM-DD.
        #[arg(long)]
        to: Option<String>,

        /// Print the transactions as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Delete a transaction.
    Delete {
        /// The ID shown by `list`.
        id: TransactionId,
    },
    /// Show total income minus total expenses.
    Balance,
    /// Show income and expenses for the current month.
    Month,
}

fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = Config {
        db_path: args.db_path,
        timezone: args.timezone,
        backend: if args.ephemeral {
            Backend::Ephemeral
        } else {
            Backend::Durable
        },
    };
    let timezone = config.local_timezone()?;
    let mut ledger = Ledger::new(open_store(&config)?, SystemClock::new(timezone));

    match args.command {
        Command::Add {
            title,
            amount,
            income,
            category,
            date,
        } => {
            let category = category.unwrap_or_else(|| default_category(income));
            if !Category::for_kind(income).contains(&category) {
                tracing::warn!(
                    "{category} is not usually used for {}",
                    if income { "income" } else { "expenses" }
                );
            }
            let mut builder = Transaction::build(&title, parse_amount(&amount)?)?
                .is_income(income)
                .category(category.as_str());

            if let Some(date) = date {
                builder = builder.date(timezone.start_of_day(parse_date(&date)?));
            }

            let transaction = ledger.add(builder)?;
            println!("Added transaction {}", transaction.id);
            warn_if_not_saved(&ledger);
        }
        Command::List {
            category,
            income,
            expense,
            from,
            to,
            json,
        } => {
            let query = build_query(
                category,
                income,
                expense,
                from.as_deref(),
                to.as_deref(),
                timezone,
            )?;
            let transactions = ledger.transactions(&query)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&transactions)?);
            } else {
                print_transactions(&transactions, timezone);
            }
        }
        Command::Delete { id } => {
            ledger.delete(id)?;
            println!("Deleted transaction {id}");
        }
        Command::Balance => {
            println!("Balance: {}", format_currency(ledger.balance()?));
        }
        Command::Month => {
            let totals = ledger.monthly_totals()?;
            println!("Income:   {}", format_currency(totals.income));
            println!("Expenses: {}", format_currency(totals.expense));
            println!("Net:      {}", format_currency(totals.net()));
        }
    }

    Ok(())
}

fn default_category(income: bool) -> Category {
    if income {
        Category::OtherIncome
    } else {
        Category::Other
    }
}

/// Turn the `list` options into a query. A missing `from` or `to` leaves
/// that end of the date range open.
fn build_query(
    category: CategoryFilter,
    income: bool,
    expense: bool,
    from: Option<&str>,
    to: Option<&str>,
    timezone: LocalTimezone,
) -> Result<TransactionQuery, pursebook::Error> {
    let is_income = match (income, expense) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    let query = TransactionQuery::default()
        .category(category)
        .is_income(is_income);

    if from.is_none() && to.is_none() {
        return Ok(query);
    }

    let start = match from {
        Some(from) => {
            let day = parse_date(from)?;
            *day_range(day, day, timezone).start()
        }
        None => PrimitiveDateTime::MIN.assume_utc(),
    };
    let end = match to {
        Some(to) => {
            let day = parse_date(to)?;
            *day_range(day, day, timezone).end()
        }
        None => PrimitiveDateTime::MAX.assume_utc(),
    };

    Ok(query.between(start..=end))
}

fn parse_date(text: &str) -> Result<Date, pursebook::Error> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| pursebook::Error::InvalidDate(text.to_owned()))
}

fn print_transactions(transactions: &[Transaction], timezone: LocalTimezone) {
    if transactions.is_empty() {
        println!("No transactions.");
        return;
    }

    for transaction in transactions {
        println!(
            "{:>5}  {}  {:<30}  {:<15}  {:>12}",
            transaction.id,
            timezone.to_local(transaction.date).date(),
            transaction.title,
            transaction.category,
            format_signed(transaction)
        );
    }
}

fn warn_if_not_saved<S: TransactionStore, C: pursebook::Clock>(ledger: &Ledger<S, C>) {
    if ledger.backend() == Backend::Ephemeral {
        eprintln!("Note: the in-memory store is in use, this transaction will not be saved.");
    }
}

#[cfg(test)]
mod tests {
    use pursebook::{
        Category, CategoryFilter, Error, Transaction, TransactionQuery,
        timezone::get_local_timezone,
    };
    use time::{
        PrimitiveDateTime,
        macros::{datetime, offset},
    };

    use super::{build_query, default_category, parse_date};

    #[test]
    fn no_options_match_everything() {
        let query = build_query(CategoryFilter::All, false, false, None, None, offset!(UTC).into())
            .unwrap();

        assert_eq!(query, TransactionQuery::default());
    }

    #[test]
    fn income_and_expense_flags_set_type() {
        let income = build_query(CategoryFilter::All, true, false, None, None, offset!(UTC).into())
            .unwrap();
        let expense = build_query(CategoryFilter::All, false, true, None, None, offset!(UTC).into())
            .unwrap();

        assert_eq!(income.is_income, Some(true));
        assert_eq!(expense.is_income, Some(false));
    }

    #[test]
    fn category_is_passed_through() {
        let query = build_query(
            CategoryFilter::from(Category::Food),
            false,
            false,
            None,
            None,
            offset!(UTC).into(),
        )
        .unwrap();

        assert_eq!(query.category, CategoryFilter::Only("Food".to_owned()));
    }

    #[test]
    fn from_without_to_is_open_ended() {
        let query = build_query(
            CategoryFilter::All,
            false,
            false,
            Some("2025-03-01"),
            None,
            offset!(UTC).into(),
        )
        .unwrap();

        assert_eq!(
            query.date_range,
            Some(datetime!(2025-03-01 0:00 UTC)..=PrimitiveDateTime::MAX.assume_utc())
        );
    }

    #[test]
    fn to_without_from_is_open_ended() {
        let query = build_query(
            CategoryFilter::All,
            false,
            false,
            None,
            Some("2025-03-01"),
            offset!(UTC).into(),
        )
        .unwrap();

        assert_eq!(
            query.date_range,
            Some(
                PrimitiveDateTime::MIN.assume_utc()
                    ..=datetime!(2025-03-01 23:59:59.999999999 UTC)
            )
        );
    }

    #[test]
    fn date_options_use_offset_of_each_day() {
        let auckland = get_local_timezone("Pacific/Auckland").unwrap();

        let query = build_query(
            CategoryFilter::All,
            false,
            false,
            Some("2025-07-01"),
            Some("2025-12-01"),
            auckland,
        )
        .unwrap();

        assert_eq!(
            query.date_range,
            Some(datetime!(2025-06-30 12:00 UTC)..=datetime!(2025-12-01 10:59:59.999999999 UTC))
        );
    }

    #[test]
    fn invalid_date_is_reported() {
        let result = build_query(
            CategoryFilter::All,
            false,
            false,
            Some("1st of March"),
            None,
            offset!(UTC).into(),
        );

        assert_eq!(result, Err(Error::InvalidDate("1st of March".to_owned())));
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn default_category_depends_on_type() {
        assert_eq!(default_category(true), Category::OtherIncome);
        assert_eq!(default_category(false), Category::Other);

        let income = Transaction::build("Gift", 20.0)
            .unwrap()
            .income()
            .category(default_category(true).as_str())
            .finalise(1);

        assert_eq!(income.category, "Other Income");
    }
}
