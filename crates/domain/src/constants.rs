//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Backend
pub const DEFAULT_API_BASE_URL: &str = "https://strabismuscare.onrender.com";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_USER_AGENT: &str = concat!("eyecare-portal/", env!("CARGO_PKG_VERSION"));

// Retry (matches the resilience defaults: 3 attempts, 1s base)
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Session store
pub const SESSION_USER_KEY: &str = "user";
pub const NO_SESSION_MESSAGE: &str = "no logged-in user";
pub const DOCTOR_CACHE_KEY: &str = "cache.doctors";
pub const PATIENT_CACHE_KEY: &str = "cache.patients";

// Directory
pub const DEFAULT_TOP_DOCTORS: usize = 5;

// Record placeholders for fields the backend leaves out
pub const UNKNOWN_PATIENT_NAME: &str = "Unknown Patient";
pub const UNKNOWN_DOCTOR_NAME: &str = "Unknown Doctor";
pub const UNKNOWN_VALUE: &str = "Unknown";
pub const UNKNOWN_MEDICATION: &str = "Unknown medication";
pub const DEFAULT_DOSAGE: &str = "As prescribed";
pub const DEFAULT_FREQUENCY: &str = "As directed";
pub const NO_DIAGNOSIS: &str = "No diagnosis";
pub const TEMP_ID_PREFIX: &str = "temp-";
