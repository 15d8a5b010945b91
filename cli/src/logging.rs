//! Logging setup.
//!
//! Uses tracing-subscriber with an `EnvFilter`; a `tracing_log` bridge
//! captures the library's `log::*` calls so `[STORE_HTTP]`/`[EXECUTOR]`
//! events land in the same output stream.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging for the CLI process.
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` selects debug, and
/// the default is warnings only so query output stays clean.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_log::LogTracer::init();
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
