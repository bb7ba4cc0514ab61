//! Settings needed to open a ledger.

use std::path::PathBuf;

use crate::{
    Error,
    stores::Backend,
    timezone::{LocalTimezone, get_local_timezone},
};

/// The database file used when no path is given.
pub const DEFAULT_DB_PATH: &str = "pursebook.db";

/// The timezone used when none is given.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

/// How and where the ledger stores its transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// File path to the SQLite database used by the durable backend.
    pub db_path: PathBuf,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Decides where days and calendar months start.
    pub timezone: String,

    /// The backend to use. The durable backend falls back to the ephemeral
    /// one if it cannot be opened.
    pub backend: Backend,
}

impl Config {
    /// Look up [Config::timezone].
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the timezone is not a valid,
    /// canonical timezone name.
    pub fn local_timezone(&self) -> Result<LocalTimezone, Error> {
        get_local_timezone(&self.timezone)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            timezone: DEFAULT_TIMEZONE.to_owned(),
            backend: Backend::Durable,
        }
    }
}
