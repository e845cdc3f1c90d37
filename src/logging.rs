// src/logging.rs
// =============================================================================
// Sets up structured logging with tracing-subscriber.
//
// Logs go to stderr so a JSON report on stdout can be piped cleanly.
// RUST_LOG wins when set; otherwise "info" (or "debug" with --verbose).
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init: a second call (e.g. from tests) is not an error worth dying for
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
