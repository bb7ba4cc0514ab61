//! Currency formatting for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::transaction::Transaction;

/// Format `number` as dollars and cents, e.g. "$1,234.50" or "-$12.30".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| currency_formatter("$"));
    let negative_fmt = NEGATIVE_FMT.get_or_init(|| currency_formatter("-$"));

    let formatted_string = if number < 0.0 {
        match negative_fmt {
            Some(negative_fmt) => negative_fmt.fmt_string(number.abs()),
            None => format!("-${:.2}", number.abs()),
        }
    } else if number > 0.0 {
        match positive_fmt {
            Some(positive_fmt) => positive_fmt.fmt_string(number),
            None => format!("${number:.2}"),
        }
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "$0.00".to_owned();
    };

    pad_cents(formatted_string)
}

/// Format the amount of `transaction` with a sign: positive for income and
/// negative for expenses.
pub fn format_signed(transaction: &Transaction) -> String {
    let formatted = format_currency(transaction.amount);

    if transaction.is_income {
        format!("+{formatted}")
    } else {
        format!("-{formatted}")
    }
}

fn currency_formatter(prefix: &str) -> Option<Formatter> {
    match Formatter::currency(prefix) {
        Ok(formatter) => Some(formatter.precision(Precision::Decimals(2))),
        Err(error) => {
            tracing::warn!("Could not create currency formatter for {prefix:?}: {error:?}");
            None
        }
    }
}

/// numfmt drops trailing zeros, e.g. "12.30" comes out as "12.3".
fn pad_cents(mut formatted_string: String) -> String {
    let decimals = match formatted_string.rfind('.') {
        Some(position) => formatted_string.len() - position - 1,
        None => {
            formatted_string.push('.');
            0
        }
    };

    for _ in decimals..2 {
        formatted_string.push('0');
    }

    formatted_string
}
