//! Logging setup for kinema binaries
//!
//! Logs go to stderr so that reports printed on stdout stay machine-readable.
//! The default level applies unless `RUST_LOG` names other directives:
//! ```bash
//! RUST_LOG=debug cargo run --bin roundtrip_check
//! RUST_LOG=kinema_manifolds=debug cargo run --bin roundtrip_check
//! ```

use crate::error::{KinemaError, KinemaResult};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::SystemTime;

/// Initialize the tracing subscriber at INFO level
///
/// # Example
/// ```no_run
/// kinema::init_logger()?;
/// tracing::info!("sweep started");
/// # Ok::<(), kinema::KinemaError>(())
/// ```
pub fn init_logger() -> KinemaResult<()> {
    init_logger_with_level(Level::INFO)
}

/// Initialize the tracing subscriber with a custom default level
///
/// Fails if a global subscriber is already installed.
pub fn init_logger_with_level(default_level: Level) -> KinemaResult<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level, &directives))
        .with_writer(std::io::stderr)
        .with_timer(SystemTime)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|err| KinemaError::Logging(err.to_string()))
}

/// Filter that applies `directives` on top of `default_level`.
///
/// Malformed directives are skipped rather than rejected.
pub fn env_filter(default_level: Level, directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(directives)
}
