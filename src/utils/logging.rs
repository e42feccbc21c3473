use tracing_subscriber::{EnvFilter, fmt};

/// Send logs to stderr so stdout stays free for channel and MCP traffic.
pub fn init() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();
}
