// src/cli/logging.rs
//! Diagnostic logging on stderr, kept apart from the report on stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` wins unless `verbose` is set.
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("ouro_core=debug,ouro=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ouro_core=info"))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
