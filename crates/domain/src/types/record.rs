//! Medical reports attached to a patient

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{NO_DIAGNOSIS, UNKNOWN_DOCTOR_NAME};
use crate::types::Medication;
use crate::utils::lenient;

/// A medical report with every display field filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RecordPayload")]
pub struct MedicalRecord {
    #[serde(rename = "_id")]
    pub id: String,
    /// Empty when the backend omitted it; see [`MedicalRecord::for_patient`]
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    /// RFC 3339 timestamp
    pub date: String,
    pub diagnosis: String,
    pub symptoms: Vec<String>,
    pub treatment: String,
    pub medications: Vec<Medication>,
    pub notes: String,
    pub follow_up: String,
    pub vitals: Option<Value>,
    pub attachments: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl MedicalRecord {
    /// Attribute the record to the patient it was requested for, where the
    /// backend left the patient fields out.
    pub fn for_patient(mut self, patient_id: &str, patient_name: &str) -> Self {
        if self.patient_id.is_empty() {
            self.patient_id = patient_id.to_string();
        }
        if self.patient_name.is_empty() {
            self.patient_name = patient_name.to_string();
        }
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordPayload {
    #[serde(rename = "_id", default, deserialize_with = "lenient::non_empty_string")]
    object_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    patient_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    patient_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    doctor_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    doctor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    diagnosis: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    symptoms: Vec<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    treatment: Option<String>,
    #[serde(default, deserialize_with = "lenient::medications")]
    medications: Vec<Medication>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    follow_up: Option<String>,
    #[serde(default, deserialize_with = "lenient::present")]
    vitals: Option<Value>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    attachments: Vec<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    updated_at: Option<String>,
}

impl From<RecordPayload> for MedicalRecord {
    fn from(raw: RecordPayload) -> Self {
        let date = raw.date.unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        Self {
            id: raw.object_id.or(raw.id).unwrap_or_else(super::temp_id),
            patient_id: raw.patient_id.unwrap_or_default(),
            patient_name: raw.patient_name.unwrap_or_default(),
            doctor_id: raw.doctor_id.unwrap_or_default(),
            doctor_name: raw.doctor_name.unwrap_or_else(|| UNKNOWN_DOCTOR_NAME.to_string()),
            diagnosis: raw.diagnosis.unwrap_or_else(|| NO_DIAGNOSIS.to_string()),
            symptoms: raw.symptoms,
            treatment: raw.treatment.unwrap_or_default(),
            medications: raw.medications,
            notes: raw.notes.unwrap_or_default(),
            follow_up: raw.follow_up.unwrap_or_default(),
            vitals: raw.vitals,
            attachments: raw.attachments,
            created_at: raw.created_at.unwrap_or_else(|| date.clone()),
            updated_at: raw.updated_at.unwrap_or_else(|| date.clone()),
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_fields_get_placeholders() {
        let record: MedicalRecord = serde_json::from_value(json!({"symptoms": "blurred"})).unwrap();
        assert!(record.id.starts_with("temp-"));
        assert_eq!(record.doctor_name, "Unknown Doctor");
        assert_eq!(record.diagnosis, "No diagnosis");
        assert!(record.symptoms.is_empty());
        assert!(chrono::DateTime::parse_from_rfc3339(&record.date).is_ok());
        assert_eq!(record.created_at, record.date);
        assert_eq!(record.updated_at, record.date);
    }

    #[test]
    fn backend_id_wins_over_virtual_id() {
        let decoded: MedicalRecord =
            serde_json::from_value(json!({"_id": "a1", "id": "a1-virtual", "name": "Dr. A"})).unwrap();
        assert_eq!(decoded.id, "a1");

        let decoded: MedicalRecord = serde_json::from_value(json!({"id": "a2"})).unwrap();
        assert_eq!(decoded.id, "a2");
    }

    #[test]
    fn timestamps_default_to_record_date() {
        let record: MedicalRecord = serde_json::from_value(json!({
            "_id": "r1",
            "date": "2024-05-06T10:00:00.000Z",
            "updatedAt": "2024-05-07T09:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(record.created_at, "2024-05-06T10:00:00.000Z");
        assert_eq!(record.updated_at, "2024-05-07T09:00:00.000Z");
    }

    #[test]
    fn patient_fields_fall_back_to_requesting_patient() {
        let record: MedicalRecord = serde_json::from_value(json!({"_id": "r2"})).unwrap();
        let record = record.for_patient("p1", "Sam");
        assert_eq!(record.patient_id, "p1");
        assert_eq!(record.patient_name, "Sam");

        let record: MedicalRecord =
            serde_json::from_value(json!({"patientId": "p7", "patientName": "Ana"})).unwrap();
        let record = record.for_patient("p1", "Sam");
        assert_eq!(record.patient_id, "p7");
        assert_eq!(record.patient_name, "Ana");
    }
}
