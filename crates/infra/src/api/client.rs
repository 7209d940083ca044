//! HTTP implementation of the portal backend port

use async_trait::async_trait;
use eyecare_core::ports::PortalApi;
use eyecare_domain::{
    ApiConfig, AppointmentRequest, EyeCareError, LoginRequest, RegisterRequest, Result,
};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use crate::errors::{status_error, InfraError};
use crate::http::HttpClient;

/// Longest error body excerpt carried into an error message
const MAX_ERROR_DETAIL_CHARS: usize = 200;

/// Portal API client
#[derive(Debug, Clone)]
pub struct PortalApiClient {
    http: HttpClient,
    base_url: Url,
}

impl PortalApiClient {
    /// Create a client for the backend rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`EyeCareError::Config`] unless `base_url` is an absolute
    /// http(s) URL.
    pub fn new(http: HttpClient, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| EyeCareError::Config(format!("invalid API base URL {base_url}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(EyeCareError::Config(format!(
                "API base URL must be http(s): {base_url}"
            )));
        }
        Ok(Self { http, base_url })
    }

    /// Create a client and its HTTP transport from configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(HttpClient::from_config(config)?, &config.base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments under the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| EyeCareError::Config(format!("cannot extend base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Endpoint with the present query parameters appended.
    fn search_endpoint(&self, segments: &[&str], params: &[(&str, Option<&str>)]) -> Result<Url> {
        let mut url = self.endpoint(segments)?;
        let present: Vec<(&str, &str)> =
            params.iter().filter_map(|(key, value)| value.map(|v| (*key, v))).collect();
        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Value> {
        self.call(Method::GET, url, None).await
    }

    /// Send one request and decode its JSON body.
    #[instrument(skip(self, body), fields(method = %method, path = %url.path()))]
    async fn call(&self, method: Method, url: Url, body: Option<Value>) -> Result<Value> {
        debug!(url = %url, "portal request");

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = &body {
            request = request.json(body);
        }
        let response = self.http.send(request).await?;

        let status = response.status();
        let text = response.text().await.map_err(InfraError::from)?;
        if !status.is_success() {
            debug!(url = %url, %status, "portal request rejected");
            return Err(status_error(status, &error_detail(&text)));
        }

        let payload = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                EyeCareError::Decode(format!("{} returned invalid JSON: {e}", url.path()))
            })?
        };

        info!(path = %url.path(), %status, "portal request successful");
        Ok(payload)
    }
}

/// Human-readable reason from an error body: its `message` or `error` field
/// when it is JSON, otherwise a bounded excerpt of the text.
fn error_detail(body: &str) -> String {
    let body = body.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(reason) =
            ["message", "error"].iter().find_map(|key| map.get(*key).and_then(Value::as_str))
        {
            return reason.to_string();
        }
    }
    body.chars().take(MAX_ERROR_DETAIL_CHARS).collect()
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| EyeCareError::Internal(format!("failed to encode request body: {e}")))
}

#[async_trait]
impl PortalApi for PortalApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<Value> {
        self.call(Method::POST, self.endpoint(&["login"])?, Some(to_body(request)?)).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Value> {
        self.call(Method::POST, self.endpoint(&["register"])?, Some(to_body(request)?)).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Value> {
        self.get(self.endpoint(&["user", user_id])?).await
    }

    async fn update_user(&self, user_id: &str, changes: &Value) -> Result<Value> {
        self.call(Method::PUT, self.endpoint(&["user", user_id])?, Some(changes.clone())).await
    }

    async fn list_doctors(&self) -> Result<Value> {
        self.get(self.endpoint(&["doctors"])?).await
    }

    async fn get_doctor(&self, doctor_id: &str) -> Result<Value> {
        self.get(self.endpoint(&["doctors", doctor_id])?).await
    }

    async fn search_doctors(&self, name: Option<&str>, specialty: Option<&str>) -> Result<Value> {
        let url = self.search_endpoint(
            &["doctors", "search"],
            &[("name", name), ("specialty", specialty)],
        )?;
        self.get(url).await
    }

    async fn doctor_profile(&self, user_id: &str) -> Result<Value> {
        self.get(self.endpoint(&["doctors", "doctor", user_id])?).await
    }

    async fn create_doctor(&self, doctor: &Value) -> Result<Value> {
        self.call(Method::POST, self.endpoint(&["doctors"])?, Some(doctor.clone())).await
    }

    async fn update_doctor(&self, doctor_id: &str, changes: &Value) -> Result<Value> {
        self.call(Method::PUT, self.endpoint(&["doctors", doctor_id])?, Some(changes.clone())).await
    }

    async fn list_patients(&self) -> Result<Value> {
        self.get(self.endpoint(&["patients"])?).await
    }

    async fn get_patient(&self, patient_id: &str) -> Result<Value> {
        self.get(self.endpoint(&["patients", patient_id])?).await
    }

    async fn search_patients(
        &self,
        name: Option<&str>,
        medical_history: Option<&str>,
    ) -> Result<Value> {
        let url = self.search_endpoint(
            &["patients", "search"],
            &[("name", name), ("medicalHistory", medical_history)],
        )?;
        self.get(url).await
    }

    async fn patient_profile(&self, user_id: &str) -> Result<Value> {
        self.get(self.endpoint(&["patients", "patient", user_id])?).await
    }

    async fn create_patient(&self, patient: &Value) -> Result<Value> {
        self.call(Method::POST, self.endpoint(&["patients"])?, Some(patient.clone())).await
    }

    async fn update_patient(&self, patient_id: &str, changes: &Value) -> Result<Value> {
        let url = self.endpoint(&["patients", patient_id])?;
        self.call(Method::PUT, url, Some(changes.clone())).await
    }

    async fn book_appointment(&self, request: &AppointmentRequest) -> Result<Value> {
        self.call(Method::POST, self.endpoint(&["appointments"])?, Some(to_body(request)?)).await
    }

    async fn patient_reports(&self, patient_id: &str) -> Result<Value> {
        self.get(self.endpoint(&["reports", "patient", patient_id])?).await
    }

    async fn get_report(&self, report_id: &str) -> Result<Value> {
        self.get(self.endpoint(&["reports", report_id])?).await
    }

    async fn create_report(&self, report: &Value) -> Result<Value> {
        self.call(Method::POST, self.endpoint(&["reports"])?, Some(report.clone())).await
    }

    async fn update_report(&self, report_id: &str, report: &Value) -> Result<Value> {
        self.call(Method::PUT, self.endpoint(&["reports", report_id])?, Some(report.clone())).await
    }

    async fn delete_report(&self, report_id: &str) -> Result<Value> {
        self.call(Method::DELETE, self.endpoint(&["reports", report_id])?, None).await
    }
}
