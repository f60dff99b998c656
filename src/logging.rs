use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is not set. Verbose diagnostics are `info!`
/// events switched on by the `verbose` options, not by the filter.
pub const DEFAULT_DIRECTIVE: &str = "info";

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the fmt subscriber on stderr.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
