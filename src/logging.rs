use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber for embedders that want the
/// library's logs. Respects `RUST_LOG`, defaults to `info`, and is safe to
/// call when a subscriber is already installed.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
