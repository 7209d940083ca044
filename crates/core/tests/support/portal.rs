use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use eyecare_core::ports::PortalApi;
use eyecare_domain::{
    AppointmentRequest, EyeCareError, LoginRequest, RegisterRequest, Result as DomainResult,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// Scripted in-memory mock for `PortalApi`.
///
/// Each endpoint answers from its own queue of results. The last queued
/// result repeats once the others are used up, so a single scripted failure
/// fails every call. Every call is recorded with its arguments.
#[derive(Default, Clone)]
pub struct MockPortalApi {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    scripts: HashMap<&'static str, VecDeque<DomainResult<Value>>>,
    calls: Vec<(&'static str, Value)>,
}

impl MockPortalApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `result` for `endpoint`.
    pub fn respond(self, endpoint: &'static str, result: DomainResult<Value>) -> Self {
        self.inner.lock().scripts.entry(endpoint).or_default().push_back(result);
        self
    }

    /// Queue `times` copies of `error` for `endpoint`.
    pub fn fail(self, endpoint: &'static str, error: EyeCareError, times: usize) -> Self {
        (0..times).fold(self, |api, _| api.respond(endpoint, Err(error.clone())))
    }

    /// Arguments of every call made to `endpoint`, in order.
    pub fn calls(&self, endpoint: &str) -> Vec<Value> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|(name, _)| *name == endpoint)
            .map(|(_, args)| args.clone())
            .collect()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls(endpoint).len()
    }

    fn answer(&self, endpoint: &'static str, args: Value) -> DomainResult<Value> {
        let mut inner = self.inner.lock();
        inner.calls.push((endpoint, args));
        let Some(queue) = inner.scripts.get_mut(endpoint) else {
            return Err(EyeCareError::NotFound(format!("no scripted response for {endpoint}")));
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

#[async_trait]
impl PortalApi for MockPortalApi {
    async fn login(&self, request: &LoginRequest) -> DomainResult<Value> {
        self.answer("login", serde_json::to_value(request).unwrap())
    }

    async fn register(&self, request: &RegisterRequest) -> DomainResult<Value> {
        self.answer("register", serde_json::to_value(request).unwrap())
    }

    async fn get_user(&self, user_id: &str) -> DomainResult<Value> {
        self.answer("get_user", json!({ "id": user_id }))
    }

    async fn update_user(&self, user_id: &str, changes: &Value) -> DomainResult<Value> {
        self.answer("update_user", json!({ "id": user_id, "changes": changes }))
    }

    async fn list_doctors(&self) -> DomainResult<Value> {
        self.answer("list_doctors", Value::Null)
    }

    async fn get_doctor(&self, doctor_id: &str) -> DomainResult<Value> {
        self.answer("get_doctor", json!({ "id": doctor_id }))
    }

    async fn search_doctors(
        &self,
        name: Option<&str>,
        specialty: Option<&str>,
    ) -> DomainResult<Value> {
        self.answer("search_doctors", json!({ "name": name, "specialty": specialty }))
    }

    async fn doctor_profile(&self, user_id: &str) -> DomainResult<Value> {
        self.answer("doctor_profile", json!({ "id": user_id }))
    }

    async fn create_doctor(&self, doctor: &Value) -> DomainResult<Value> {
        self.answer("create_doctor", doctor.clone())
    }

    async fn update_doctor(&self, doctor_id: &str, changes: &Value) -> DomainResult<Value> {
        self.answer("update_doctor", json!({ "id": doctor_id, "changes": changes }))
    }

    async fn list_patients(&self) -> DomainResult<Value> {
        self.answer("list_patients", Value::Null)
    }

    async fn get_patient(&self, patient_id: &str) -> DomainResult<Value> {
        self.answer("get_patient", json!({ "id": patient_id }))
    }

    async fn search_patients(
        &self,
        name: Option<&str>,
        medical_history: Option<&str>,
    ) -> DomainResult<Value> {
        self.answer("search_patients", json!({ "name": name, "medicalHistory": medical_history }))
    }

    async fn patient_profile(&self, user_id: &str) -> DomainResult<Value> {
        self.answer("patient_profile", json!({ "id": user_id }))
    }

    async fn create_patient(&self, patient: &Value) -> DomainResult<Value> {
        self.answer("create_patient", patient.clone())
    }

    async fn update_patient(&self, patient_id: &str, changes: &Value) -> DomainResult<Value> {
        self.answer("update_patient", json!({ "id": patient_id, "changes": changes }))
    }

    async fn book_appointment(&self, request: &AppointmentRequest) -> DomainResult<Value> {
        self.answer("book_appointment", serde_json::to_value(request).unwrap())
    }

    async fn patient_reports(&self, patient_id: &str) -> DomainResult<Value> {
        self.answer("patient_reports", json!({ "id": patient_id }))
    }

    async fn get_report(&self, report_id: &str) -> DomainResult<Value> {
        self.answer("get_report", json!({ "id": report_id }))
    }

    async fn create_report(&self, report: &Value) -> DomainResult<Value> {
        self.answer("create_report", report.clone())
    }

    async fn update_report(&self, report_id: &str, report: &Value) -> DomainResult<Value> {
        self.answer("update_report", json!({ "id": report_id, "report": report }))
    }

    async fn delete_report(&self, report_id: &str) -> DomainResult<Value> {
        self.answer("delete_report", json!({ "id": report_id }))
    }
}
