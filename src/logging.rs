use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "KILN_LOG";

/// Install the stderr subscriber. Safe to call more than once; only the
/// first call wins.
pub fn init(verbose: bool) {
    let default = if verbose { "kiln=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
