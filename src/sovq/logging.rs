use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber, writing to stderr so stdout stays
/// clean for command output.
///
/// `RUST_LOG` wins when set; otherwise `fallback` is used. Safe to call more
/// than once: later calls are ignored.
pub fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
