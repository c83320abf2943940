//! Logging setup for the Agora binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Directives are emitted for the server library, this shared crate and the
/// binary itself. The `RUST_LOG` environment variable takes precedence.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "agora-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use agora_shared::logger::setup_logger;
///
/// setup_logger("agora-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_directives(binary_name: &str, level: &str) -> String {
    format!(
        "agora_server={level},{}={level},{}={level},tower_http={level}",
        env!("CARGO_PKG_NAME").replace('-', "_"),
        binary_name.replace('-', "_"),
    )
}
