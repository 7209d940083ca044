use std::time::Duration;

use eyecare_domain::{EyeCareError, LoggingConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the configured level. Output goes to stderr so
/// command results on stdout stay machine-readable. Calling this more than
/// once keeps the first subscriber.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.with_target(false).try_init()
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"directory::list_doctors"`).
/// * `elapsed` - Duration the command execution took.
/// * `success` - Whether the command completed successfully.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert an `EyeCareError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &EyeCareError) -> &'static str {
    match error {
        EyeCareError::Config(_) => "config",
        EyeCareError::Network(_) => "network",
        EyeCareError::Server(_) => "server",
        EyeCareError::Client(_) => "client",
        EyeCareError::Auth(_) => "auth",
        EyeCareError::NotFound(_) => "not_found",
        EyeCareError::InvalidInput(_) => "invalid_input",
        EyeCareError::Decode(_) => "decode",
        EyeCareError::Storage(_) => "storage",
        EyeCareError::Cancelled(_) => "cancelled",
        EyeCareError::Internal(_) => "internal",
    }
}
