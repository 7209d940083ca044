//! Doctor and patient directory commands

use eyecare_core::SearchOutcome;
use eyecare_domain::constants::{DEFAULT_TOP_DOCTORS, UNKNOWN_PATIENT_NAME};
use eyecare_domain::{AppointmentRequest, Doctor, MedicalRecord, Patient};
use serde_json::Value;

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Fetch all doctors and remember them for search fallback.
pub async fn list_doctors(ctx: &AppContext) -> Result<Vec<Doctor>, String> {
    execute_command("directory::list_doctors", || async move {
        let doctors = ctx.directory.doctors().await?;
        ctx.remember_doctors(&doctors).await;
        Ok(doctors)
    })
    .await
}

/// Best-rated doctors, `limit` defaulting to five.
pub async fn top_doctors(ctx: &AppContext, limit: Option<usize>) -> Result<Vec<Doctor>, String> {
    execute_command("directory::top_doctors", || {
        ctx.directory.top_doctors(limit.unwrap_or(DEFAULT_TOP_DOCTORS))
    })
    .await
}

/// One doctor by id.
pub async fn doctor(ctx: &AppContext, doctor_id: &str) -> Result<Doctor, String> {
    execute_command("directory::doctor", || ctx.directory.doctor(doctor_id)).await
}

/// Search doctors, falling back to the last listed doctors.
pub async fn search_doctors(
    ctx: &AppContext,
    query: &str,
    specialty: Option<&str>,
) -> Result<SearchOutcome<Doctor>, String> {
    execute_command("directory::search_doctors", || async move {
        let cached = ctx.cached_doctors().await;
        ctx.directory.search_doctors(query, specialty, &cached).await
    })
    .await
}

/// Fetch all patients and remember them for search fallback.
pub async fn list_patients(ctx: &AppContext) -> Result<Vec<Patient>, String> {
    execute_command("directory::list_patients", || async move {
        let patients = ctx.directory.patients().await?;
        ctx.remember_patients(&patients).await;
        Ok(patients)
    })
    .await
}

pub async fn patient(ctx: &AppContext, patient_id: &str) -> Result<Patient, String> {
    execute_command("directory::patient", || ctx.directory.patient(patient_id)).await
}

/// Search patients, falling back to the last listed patients.
pub async fn search_patients(
    ctx: &AppContext,
    query: &str,
) -> Result<SearchOutcome<Patient>, String> {
    execute_command("directory::search_patients", || async move {
        let cached = ctx.cached_patients().await;
        ctx.directory.search_patients(query, &cached).await
    })
    .await
}

/// Medical records of a patient.
///
/// Without an explicit name, the name from the last patient listing is used.
pub async fn patient_records(
    ctx: &AppContext,
    patient_id: &str,
    patient_name: Option<&str>,
) -> Result<Vec<MedicalRecord>, String> {
    execute_command("directory::patient_records", || async move {
        let name = match patient_name {
            Some(name) => name.to_string(),
            None => ctx
                .cached_patients()
                .await
                .into_iter()
                .find(|patient| patient.id == patient_id)
                .map_or_else(|| UNKNOWN_PATIENT_NAME.to_string(), |patient| patient.name),
        };
        ctx.directory.patient_records(patient_id, &name).await
    })
    .await
}

pub async fn report(ctx: &AppContext, report_id: &str) -> Result<MedicalRecord, String> {
    execute_command("directory::report", || ctx.directory.report(report_id)).await
}

/// File a medical report given as a JSON object.
pub async fn create_report(ctx: &AppContext, report: &Value) -> Result<Value, String> {
    execute_command("directory::create_report", || ctx.directory.create_report(report)).await
}

pub async fn update_report(
    ctx: &AppContext,
    report_id: &str,
    changes: &Value,
) -> Result<Value, String> {
    execute_command("directory::update_report", || {
        ctx.directory.update_report(report_id, changes)
    })
    .await
}

pub async fn delete_report(ctx: &AppContext, report_id: &str) -> Result<(), String> {
    execute_command("directory::delete_report", || ctx.directory.delete_report(report_id)).await
}

pub async fn book_appointment(
    ctx: &AppContext,
    request: &AppointmentRequest,
) -> Result<Value, String> {
    execute_command("directory::book_appointment", || ctx.directory.book_appointment(request))
        .await
}
