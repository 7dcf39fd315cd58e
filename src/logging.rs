use tracing::Level;

/// Initialize tracing for the application
///
/// Diagnostics go to stderr, apart from progress lines and
/// Markdown written to stdout. Only warnings are shown unless `verbose`.
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .try_init()
}
