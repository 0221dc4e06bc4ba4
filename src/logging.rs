//! Logging initialization.
//!
//! Diagnostics go to stderr so they never mix with the rendered document.
//! The filter is read from `YYT_LOG` (EnvFilter syntax, e.g. `yyt=trace`);
//! without it the level is `warn`, or `debug` in verbose mode.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "YYT_LOG";

/// Default filter directive for the given verbosity
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global stderr subscriber. Safe to call more than once.
pub fn init(verbose: bool, color: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(color)
        .try_init();
}
