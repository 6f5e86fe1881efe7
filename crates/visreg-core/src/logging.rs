//! Tracing subscriber setup
//!
//! Test runners that host visreg call [`init`] once at startup. `RUST_LOG`
//! overrides the default filter.

use tracing_subscriber::EnvFilter;

use crate::{Result, VisregError};

/// Install a formatted subscriber, falling back to `default_filter` when
/// `RUST_LOG` is unset
pub fn init(default_filter: &str) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| VisregError::Other(format!("Failed to install subscriber: {}", e)))
}

/// Install a subscriber that writes through the test harness
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
