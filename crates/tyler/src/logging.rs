//! Diagnostic logging to stderr.
//!
//! User-facing output goes through [`crate::ui`]; this subscriber only
//! carries `tracing` diagnostics. The filter comes from `TYLER_LOG`
//! (standard `EnvFilter` syntax), falling back to `warn`, or `debug`
//! with `--verbose`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "TYLER_LOG";

fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Build the filter: an explicit `TYLER_LOG` wins over `--verbose`.
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();
    let _ = tracing_subscriber::registry()
        .with(filter(verbose))
        .with(fmt)
        .try_init();
}
