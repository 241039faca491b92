//! Logging setup for binaries and tests embedding the retarget core

use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber
///
/// `RUST_LOG` takes precedence over `log_level`, which defaults to INFO.
/// Fails if a global subscriber is already installed.
pub fn init_logging(log_level: Option<Level>) -> Result<(), String> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = log_level.unwrap_or(Level::INFO);
        EnvFilter::new(format!("pow_core={}", level))
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Failed to set global default subscriber: {}", e))?;

    info!("Logging initialized to stdout");
    Ok(())
}

/// Parse a level name such as `"debug"`, falling back to INFO
pub fn parse_level(name: &str) -> Level {
    name.parse().unwrap_or(Level::INFO)
}
