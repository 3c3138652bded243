#![forbid(unsafe_code)]

//! Logging support.
//!
//! The engine emits `tracing` events: `debug` for navigation, evictions and
//! open/close, `trace` for gesture transitions and decode completions. Hosts
//! decide where they go. Native tools and tests can enable the
//! `tracing-json` feature and call [`init_json_logging`].

#[cfg(feature = "tracing-json")]
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "LIGHTBOX_LOG";

/// Install a global JSON subscriber filtered by `LIGHTBOX_LOG` (falling back
/// to `default_directive`, e.g. `"lightbox_core=debug"`).
///
/// Returns `false` when a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
