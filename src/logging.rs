use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "metrobus_rules=info";

/// Install a `tracing` fmt subscriber for the host process.
///
/// Reads `RUST_LOG`, falling back to [`DEFAULT_FILTER`]. Returns `false`
/// when a global subscriber was already set (e.g. by another test).
pub fn init() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
