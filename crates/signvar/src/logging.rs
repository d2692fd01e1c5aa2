#![forbid(unsafe_code)]

//! JSON log output for hosts without their own subscriber.

use tracing_subscriber::EnvFilter;

/// Install a global JSON subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Returns `false` if a global
/// subscriber is already installed.
pub fn init_json(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
