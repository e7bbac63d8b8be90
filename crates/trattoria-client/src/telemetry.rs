//! Tracing subscriber setup

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a fmt subscriber filtered by `RUST_LOG`
///
/// Returns `false` if a global subscriber was already installed, which makes
/// repeated calls (e.g. from several tests) harmless.
pub fn init_tracing() -> bool {
    fmt().with_env_filter(env_filter()).try_init().is_ok()
}

/// Install a JSON-formatted subscriber filtered by `RUST_LOG`
pub fn init_json_tracing() -> bool {
    fmt().json().with_env_filter(env_filter()).try_init().is_ok()
}
