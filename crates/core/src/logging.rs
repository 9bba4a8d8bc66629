//! Structured logging bootstrap for AlgoForge.
//!
//! Library code only emits `tracing` events; binaries and tests pick one of
//! the initializers below. `RUST_LOG` always takes precedence over the
//! configured level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

fn filter_or(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(default_level))
}

/// Falls back to `info` when `level` is not a valid directive.
fn configured_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize human-readable logging at `info` unless `RUST_LOG` says otherwise.
///
/// # Example
/// ```no_run
/// use algoforge_core::logging;
///
/// logging::init();
/// tracing::info!("resolver ready");
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(filter_or("info"))
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .init();
}

/// Initialize JSON logging for log aggregation.
///
/// # Example
/// ```no_run
/// use algoforge_core::logging;
///
/// logging::init_json();
/// tracing::info!(mechanism = "AES/CMAC", "resolved");
/// ```
pub fn init_json() {
    tracing_subscriber::registry()
        .with(filter_or("info"))
        .with(fmt::layer().json().with_target(true).with_thread_ids(true))
        .init();
}

/// Initialize from a [`LoggingConfig`]. Returns `false` if a global
/// subscriber was already installed.
pub fn init_with(config: &LoggingConfig) -> bool {
    let registry = tracing_subscriber::registry().with(filter_or(&config.level));
    if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init()
            .is_ok()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
            .is_ok()
    }
}
