//! Sets up the `tracing` subscriber used by the binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// The filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a pretty, human readable subscriber that writes to stderr.
///
/// The level defaults to [DEFAULT_LOG_FILTER] and can be overridden with the
/// `RUST_LOG` environment variable, e.g. `RUST_LOG=pursebook=debug`.
/// Calling this more than once has no effect.
pub fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    if let Err(error) = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_log)
        .try_init()
    {
        tracing::debug!("Logging was already set up: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::setup_logging;

    #[test]
    fn setup_logging_twice_does_not_panic() {
        setup_logging();
        setup_logging();
    }
}
