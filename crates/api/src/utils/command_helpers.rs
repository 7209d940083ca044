//! Command execution helpers
//!
//! Provides utilities to reduce boilerplate when implementing commands with
//! timing and logging.

use std::future::Future;
use std::time::Instant;

use eyecare_domain::Result as DomainResult;
use tracing::debug;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command with timing and logging, converting its error to the
/// `String` form returned at the command boundary.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn my_command(ctx: &AppContext) -> Result<MyResponse, String> {
///     execute_command("my_module::my_command", || async {
///         ctx.some_service.do_something().await
///     })
///     .await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> Result<T, String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let elapsed = start.elapsed();
    if let Err(err) = &result {
        debug!(command = command_name, error_type = error_label(err), error = %err, "command failed");
    }
    log_command_execution(command_name, elapsed, result.is_ok());

    result.map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use eyecare_domain::EyeCareError;

    use super::*;

    #[tokio::test]
    async fn errors_become_display_strings() {
        let result: Result<(), String> = execute_command("test::fails", || async {
            Err(EyeCareError::Auth("no logged-in user".into()))
        })
        .await;

        assert_eq!(result, Err("Authentication error: no logged-in user".to_string()));
    }

    #[tokio::test]
    async fn values_pass_through() {
        let result = execute_command("test::succeeds", || async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
    }
}
