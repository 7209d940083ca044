//! Request and response bodies for account and booking endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::UserRole;
use crate::utils::lenient;

/// Body of `POST /login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Build a login body; the email is trimmed and lower-cased.
    pub fn new(email: &str, password: impl Into<String>) -> Self {
        Self { email: normalize_email(email), password: password.into() }
    }
}

/// Response of `POST /login` and `POST /register`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient::non_empty_string")]
    pub user_id: Option<String>,
}

/// Body of `POST /register`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_info: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_info: Option<Value>,
}

impl RegisterRequest {
    pub fn new(name: &str, email: &str, role: UserRole, password: impl Into<String>) -> Self {
        Self {
            name: name.trim().to_string(),
            email: normalize_email(email),
            role,
            password: password.into(),
            doctor_info: None,
            patient_info: None,
        }
    }

    /// Attach the doctor profile (contact, address, specialty, tenure...).
    pub fn with_doctor_info(mut self, info: Value) -> Self {
        self.doctor_info = Some(info);
        self
    }

    pub fn with_patient_info(mut self, info: Value) -> Self {
        self.patient_info = Some(info);
        self
    }
}

/// Body of `POST /appointments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub doctor_id: String,
    pub patient_id: String,
    pub date: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Trim and lower-case an email address the way the backend stores it.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
