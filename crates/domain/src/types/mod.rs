//! Domain types and models
//!
//! Record types decode leniently from whatever the backend sends; see
//! [`crate::utils::lenient`].

pub mod auth;
pub mod doctor;
pub mod patient;
pub mod record;
pub mod user;

pub use auth::{AppointmentRequest, AuthResponse, LoginRequest, RegisterRequest};
pub use doctor::Doctor;
pub use patient::{Medication, Patient};
pub use record::MedicalRecord;
pub use user::{ProfileUpdate, User, UserEnvelope, UserRole};

/// Generate a placeholder id for records the backend sent without one.
pub(crate) fn temp_id() -> String {
    format!("{}{}", crate::constants::TEMP_ID_PREFIX, uuid::Uuid::new_v4())
}

/// Case-insensitive substring match; an empty needle matches everything.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
