use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the tracing subscriber; `RUST_LOG` overrides `verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "vnfolio=debug" } else { "off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time())
        .with(filter)
        .init();
}
