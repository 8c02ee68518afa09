//! Logging setup for Hiroba binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are shown at the default level.
const LIBRARY_CRATES: [&str; 2] = ["hiroba_server", "hiroba_shared"];

/// Build the filter directive used when `RUST_LOG` is not set.
///
/// The binary name is normalized the same way Cargo normalizes crate names
/// (`hiroba-server` becomes `hiroba_server`), so a binary that shares its
/// name with the library is only listed once.
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut targets: Vec<String> = LIBRARY_CRATES.iter().map(|c| c.to_string()).collect();
    if !targets.contains(&binary_target) {
        targets.push(binary_target);
    }
    // HTTP request spans from TraceLayer.
    targets.push("tower_http".to_string());

    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The level can be overridden with the `RUST_LOG` environment variable.
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::setup_logger;
///
/// setup_logger("hiroba-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
