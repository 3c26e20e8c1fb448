//! Tracing subscriber setup for binaries.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the filter is `info`, or `debug` for
/// the everglen crates when `verbose` is true. Calling this twice is a no-op.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "info,everglen_core=debug,everglen_models=debug,everglen_narrative=debug,everglen_database=debug,everglen_server=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let fmt_layer = fmt::layer().with_target(true).with_level(true);

    // A subscriber may already be installed by a test harness
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
