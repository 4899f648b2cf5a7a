use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes console logging on stderr.
///
/// `RUST_LOG` overrides the default `trail_atlas=info` directive.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trail_atlas=info"));

    // Stderr keeps stdout clean for the summary output
    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    // try_init: a second call (tests, embedding) is a no-op
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
