//! Conversions from external infrastructure errors into domain errors.

use eyecare_domain::EyeCareError;
use reqwest::{Error as HttpError, StatusCode};
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub EyeCareError);

impl From<InfraError> for EyeCareError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<EyeCareError> for InfraError {
    fn from(value: EyeCareError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoEyeCareError {
    fn into_eyecare(self) -> EyeCareError;
}

/* -------------------------------------------------------------------------- */
/* HTTP status → EyeCareError */
/* -------------------------------------------------------------------------- */

/// Map a non-success status onto the error taxonomy.
///
/// 429 and 5xx are transient (`Server`); other 4xx are terminal (`Client`).
pub fn status_error(status: StatusCode, detail: &str) -> EyeCareError {
    let code = status.as_u16();
    let mut message =
        format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));
    if !detail.is_empty() {
        message.push_str(": ");
        message.push_str(detail);
    }

    match code {
        401 | 403 => EyeCareError::Auth(message),
        404 => EyeCareError::NotFound(message),
        429 => EyeCareError::Server(message),
        400..=499 => EyeCareError::Client(message),
        500..=599 => EyeCareError::Server(message),
        _ => EyeCareError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → EyeCareError */
/* -------------------------------------------------------------------------- */

impl IntoEyeCareError for HttpError {
    fn into_eyecare(self) -> EyeCareError {
        if self.is_timeout() {
            return EyeCareError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return EyeCareError::Network(format!("HTTP connection failure: {self}"));
        }

        if let Some(status) = self.status() {
            return status_error(status, "");
        }

        if self.is_decode() {
            return EyeCareError::Decode(format!("failed to decode response body: {self}"));
        }

        if self.is_builder() {
            return EyeCareError::Config(format!("invalid HTTP request: {self}"));
        }

        EyeCareError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_eyecare())
    }
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → EyeCareError */
/* -------------------------------------------------------------------------- */

impl IntoEyeCareError for SqlError {
    fn into_eyecare(self) -> EyeCareError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => EyeCareError::Storage("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        EyeCareError::Storage("database is locked".into())
                    }
                    ErrorCode::ReadOnly => {
                        EyeCareError::Storage("database is read-only".into())
                    }
                    ErrorCode::CannotOpen => {
                        EyeCareError::Storage(format!("unable to open database: {message}"))
                    }
                    _ => EyeCareError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => EyeCareError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                EyeCareError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                EyeCareError::Storage(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => EyeCareError::Storage(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => EyeCareError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_eyecare())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → EyeCareError */
/* -------------------------------------------------------------------------- */

impl IntoEyeCareError for r2d2::Error {
    fn into_eyecare(self) -> EyeCareError {
        EyeCareError::Storage(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_eyecare())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
