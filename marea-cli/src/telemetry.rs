use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber for the CLI session.
///
/// Diagnostics go to stderr so command output stays clean for piping.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
