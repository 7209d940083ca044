//! Port interfaces for the portal backend and the session store
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use eyecare_domain::{AppointmentRequest, LoginRequest, RegisterRequest, Result};
use serde_json::Value;

/// One request against the portal backend per call
///
/// Implementations return the decoded JSON body as received and map HTTP
/// failures onto [`eyecare_domain::EyeCareError`]. Retrying is the caller's
/// concern.
#[async_trait]
pub trait PortalApi: Send + Sync {
    // Accounts

    /// `POST /login`
    async fn login(&self, request: &LoginRequest) -> Result<Value>;

    /// `POST /register`
    async fn register(&self, request: &RegisterRequest) -> Result<Value>;

    /// `GET /user/{id}`
    async fn get_user(&self, user_id: &str) -> Result<Value>;

    /// `PUT /user/{id}`
    async fn update_user(&self, user_id: &str, changes: &Value) -> Result<Value>;

    // Doctors

    /// `GET /doctors`
    async fn list_doctors(&self) -> Result<Value>;

    /// `GET /doctors/{id}`
    async fn get_doctor(&self, doctor_id: &str) -> Result<Value>;

    /// `GET /doctors/search`; absent parameters are not sent
    async fn search_doctors(&self, name: Option<&str>, specialty: Option<&str>) -> Result<Value>;

    /// `GET /doctors/doctor/{userId}`
    async fn doctor_profile(&self, user_id: &str) -> Result<Value>;

    /// `POST /doctors`
    async fn create_doctor(&self, doctor: &Value) -> Result<Value>;

    /// `PUT /doctors/{id}`
    async fn update_doctor(&self, doctor_id: &str, changes: &Value) -> Result<Value>;

    // Patients

    /// `GET /patients`
    async fn list_patients(&self) -> Result<Value>;

    /// `GET /patients/{id}`
    async fn get_patient(&self, patient_id: &str) -> Result<Value>;

    /// `GET /patients/search`; absent parameters are not sent
    async fn search_patients(
        &self,
        name: Option<&str>,
        medical_history: Option<&str>,
    ) -> Result<Value>;

    /// `GET /patients/patient/{userId}`
    async fn patient_profile(&self, user_id: &str) -> Result<Value>;

    /// `POST /patients`
    async fn create_patient(&self, patient: &Value) -> Result<Value>;

    /// `PUT /patients/{id}`
    async fn update_patient(&self, patient_id: &str, changes: &Value) -> Result<Value>;

    // Appointments and reports

    /// `POST /appointments`
    async fn book_appointment(&self, request: &AppointmentRequest) -> Result<Value>;

    /// `GET /reports/patient/{patientId}`
    async fn patient_reports(&self, patient_id: &str) -> Result<Value>;

    /// `GET /reports/{id}`
    async fn get_report(&self, report_id: &str) -> Result<Value>;

    /// `POST /reports`
    async fn create_report(&self, report: &Value) -> Result<Value>;

    /// `PUT /reports/{id}`
    async fn update_report(&self, report_id: &str, report: &Value) -> Result<Value>;

    /// `DELETE /reports/{id}`
    async fn delete_report(&self, report_id: &str) -> Result<Value>;
}

/// Persisted string key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
