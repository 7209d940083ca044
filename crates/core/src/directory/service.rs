//! Doctor and patient directory service - core business logic

use std::sync::Arc;

use eyecare_domain::{AppointmentRequest, Doctor, EyeCareError, MedicalRecord, Patient, Result};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::fetch::Fetcher;
use crate::normalize::{accepted, decode_record, normalize_records, RecordKind};
use crate::ports::PortalApi;

/// Where search results came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    /// The backend search endpoint
    Remote,
    /// Client-side filtering of a previously fetched list
    LocalFallback,
}

/// Search results with their provenance
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SearchOutcome<T> {
    pub results: Vec<T>,
    pub source: ResultSource,
}

/// Directory service
pub struct DirectoryService {
    api: Arc<dyn PortalApi>,
    fetcher: Fetcher,
}

impl DirectoryService {
    /// Create a new directory service
    pub fn new(api: Arc<dyn PortalApi>, fetcher: Fetcher) -> Self {
        Self { api, fetcher }
    }

    /// Abandon in-flight fetches when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.fetcher = self.fetcher.with_cancellation(token);
        self
    }

    /// All doctors, in backend order
    pub async fn doctors(&self) -> Result<Vec<Doctor>> {
        let payload = self.fetcher.fetch("list doctors", || self.api.list_doctors()).await?;
        let doctors = normalize_records(&payload, RecordKind::Doctors);
        info!(count = doctors.len(), "fetched doctors");
        Ok(doctors)
    }

    /// The `limit` best-rated doctors; unrated doctors rank as 0 and ties
    /// keep backend order.
    pub async fn top_doctors(&self, limit: usize) -> Result<Vec<Doctor>> {
        let mut doctors = self.doctors().await?;
        rank_by_rating(&mut doctors);
        doctors.truncate(limit);
        Ok(doctors)
    }

    /// One doctor by id
    pub async fn doctor(&self, doctor_id: &str) -> Result<Doctor> {
        let doctor_id = required(doctor_id, "doctor id")?;
        let payload = self.fetcher.fetch("get doctor", || self.api.get_doctor(doctor_id)).await?;
        decode_record(&payload, &format!("doctor {doctor_id}"))
    }

    /// Search doctors by name, optionally narrowed to a specialty.
    ///
    /// The endpoint is tried once; when it fails, `cached` is filtered
    /// locally on name or specialty instead. Cancellation is never masked by
    /// the fallback.
    pub async fn search_doctors(
        &self,
        query: &str,
        specialty: Option<&str>,
        cached: &[Doctor],
    ) -> Result<SearchOutcome<Doctor>> {
        let name = non_blank(query);
        let specialty = specialty.and_then(non_blank);
        let fetched = self
            .fetcher
            .attempt_once("search doctors", || self.api.search_doctors(name, specialty))
            .await;

        match fetched {
            Ok(payload) => Ok(SearchOutcome {
                results: normalize_records(&payload, RecordKind::Doctors),
                source: ResultSource::Remote,
            }),
            Err(err @ EyeCareError::Cancelled(_)) => Err(err),
            Err(err) => {
                warn!(error = %err, "doctor search failed; filtering cached doctors");
                Ok(SearchOutcome {
                    results: filter_doctors(cached, query.trim()),
                    source: ResultSource::LocalFallback,
                })
            }
        }
    }

    /// All patients, in backend order
    pub async fn patients(&self) -> Result<Vec<Patient>> {
        let payload = self.fetcher.fetch("list patients", || self.api.list_patients()).await?;
        let patients = normalize_records(&payload, RecordKind::Patients);
        info!(count = patients.len(), "fetched patients");
        Ok(patients)
    }

    /// One patient by id
    pub async fn patient(&self, patient_id: &str) -> Result<Patient> {
        let patient_id = required(patient_id, "patient id")?;
        let payload =
            self.fetcher.fetch("get patient", || self.api.get_patient(patient_id)).await?;
        decode_record(&payload, &format!("patient {patient_id}"))
    }

    /// Search patients by name or medical history.
    ///
    /// Falls back to filtering `cached` the same way as
    /// [`search_doctors`](Self::search_doctors).
    pub async fn search_patients(
        &self,
        query: &str,
        cached: &[Patient],
    ) -> Result<SearchOutcome<Patient>> {
        let term = non_blank(query);
        let fetched = self
            .fetcher
            .attempt_once("search patients", || self.api.search_patients(term, term))
            .await;

        match fetched {
            Ok(payload) => Ok(SearchOutcome {
                results: normalize_records(&payload, RecordKind::Patients),
                source: ResultSource::Remote,
            }),
            Err(err @ EyeCareError::Cancelled(_)) => Err(err),
            Err(err) => {
                warn!(error = %err, "patient search failed; filtering cached patients");
                Ok(SearchOutcome {
                    results: filter_patients(cached, query.trim()),
                    source: ResultSource::LocalFallback,
                })
            }
        }
    }

    /// Medical reports of one patient, attributed to that patient where the
    /// backend left the patient fields out.
    pub async fn patient_records(
        &self,
        patient_id: &str,
        patient_name: &str,
    ) -> Result<Vec<MedicalRecord>> {
        let patient_id = required(patient_id, "patient id")?;
        let payload = self
            .fetcher
            .fetch("patient records", || self.api.patient_reports(patient_id))
            .await?;
        let records: Vec<MedicalRecord> = normalize_records(&payload, RecordKind::Records);
        info!(patient_id, count = records.len(), "fetched medical records");
        Ok(records.into_iter().map(|record| record.for_patient(patient_id, patient_name)).collect())
    }

    /// One medical report by id
    pub async fn report(&self, report_id: &str) -> Result<MedicalRecord> {
        let report_id = required(report_id, "report id")?;
        let payload = self.fetcher.fetch("get report", || self.api.get_report(report_id)).await?;
        decode_record(&payload, &format!("report {report_id}"))
    }

    /// File a new medical report. Attempted once.
    pub async fn create_report(&self, report: &Value) -> Result<Value> {
        if !report.is_object() {
            return Err(EyeCareError::InvalidInput("report must be a JSON object".to_string()));
        }
        let response = accepted(self.api.create_report(report).await?, "failed to create report")?;
        info!("medical report created");
        Ok(response)
    }

    /// Replace the fields of a medical report. Attempted once.
    pub async fn update_report(&self, report_id: &str, changes: &Value) -> Result<Value> {
        let report_id = required(report_id, "report id")?;
        if !changes.is_object() {
            return Err(EyeCareError::InvalidInput("report must be a JSON object".to_string()));
        }
        let response = accepted(
            self.api.update_report(report_id, changes).await?,
            "failed to update report",
        )?;
        info!(report_id, "medical report updated");
        Ok(response)
    }

    /// Delete a medical report. Attempted once.
    pub async fn delete_report(&self, report_id: &str) -> Result<()> {
        let report_id = required(report_id, "report id")?;
        accepted(self.api.delete_report(report_id).await?, "failed to delete report")?;
        info!(report_id, "medical report deleted");
        Ok(())
    }

    /// Book an appointment. Bookings are not idempotent, so exactly one
    /// request is made.
    pub async fn book_appointment(&self, request: &AppointmentRequest) -> Result<Value> {
        if request.doctor_id.is_empty() || request.patient_id.is_empty() {
            return Err(EyeCareError::InvalidInput(
                "doctor and patient are required to book".to_string(),
            ));
        }
        let response = self.api.book_appointment(request).await?;
        info!(doctor_id = %request.doctor_id, "appointment booked");
        Ok(response)
    }
}

/// Order by rating, best first; the sort is stable so ties keep their order.
pub fn rank_by_rating(doctors: &mut [Doctor]) {
    doctors.sort_by(|a, b| b.rating_or_zero().total_cmp(&a.rating_or_zero()));
}

/// Doctors whose name or specialty contains `query`, ignoring case
pub fn filter_doctors(doctors: &[Doctor], query: &str) -> Vec<Doctor> {
    doctors.iter().filter(|doctor| doctor.matches_query(query)).cloned().collect()
}

/// Patients whose name or medical history contains `query`, ignoring case
pub fn filter_patients(patients: &[Patient], query: &str) -> Vec<Patient> {
    patients.iter().filter(|patient| patient.matches_query(query)).cloned().collect()
}

fn non_blank(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    non_blank(value).ok_or_else(|| EyeCareError::InvalidInput(format!("{what} is required")))
}
