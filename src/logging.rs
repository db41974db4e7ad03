use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber. Defaults to `info` when
/// `RUST_LOG` is unset; safe to call once at startup.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
