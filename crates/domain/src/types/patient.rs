//! Patient records as shown in the directory

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{UNKNOWN_PATIENT_NAME, UNKNOWN_VALUE};
use crate::utils::lenient;

/// One prescribed medication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// A patient with every display field filled in
///
/// Decoding never fails on an object: missing fields get placeholders and
/// visit details missing at the top level are taken from `vitals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PatientPayload")]
pub struct Patient {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub medical_history: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<Medication>,
    pub last_visit: Option<String>,
    pub upcoming_appointment: Option<String>,
    pub blood_type: Option<String>,
    pub profile_image: Option<String>,
    pub vitals: Option<Value>,
    pub contact: Option<Value>,
    pub insurance_info: Option<Value>,
    pub emergency_contact: Option<Value>,
    pub notes: String,
    pub status: String,
    pub updated_at: String,
}

impl Patient {
    /// Whether the name or any medical-history entry contains `query`,
    /// ignoring case.
    pub fn matches_query(&self, query: &str) -> bool {
        super::contains_ignore_case(&self.name, query)
            || self.medical_history.iter().any(|entry| super::contains_ignore_case(entry, query))
    }

    /// Whether the backend sent this patient without an id.
    pub fn has_temporary_id(&self) -> bool {
        self.id.starts_with(crate::constants::TEMP_ID_PREFIX)
    }
}

/// Wire form of [`Patient`] before placeholders are applied
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatientPayload {
    #[serde(rename = "_id", default, deserialize_with = "lenient::non_empty_string")]
    object_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    age: u32,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    medical_history: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    allergies: Vec<String>,
    #[serde(default, deserialize_with = "lenient::medications")]
    medications: Vec<Medication>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    last_visit: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    upcoming_appointment: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    blood_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    profile_image: Option<String>,
    #[serde(default, deserialize_with = "lenient::present")]
    vitals: Option<Value>,
    #[serde(default, deserialize_with = "lenient::present")]
    contact: Option<Value>,
    #[serde(default, deserialize_with = "lenient::present")]
    insurance_info: Option<Value>,
    #[serde(default, deserialize_with = "lenient::present")]
    emergency_contact: Option<Value>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    updated_at: Option<String>,
}

impl From<PatientPayload> for Patient {
    fn from(raw: PatientPayload) -> Self {
        let from_vitals = |key: &str| {
            raw.vitals
                .as_ref()
                .and_then(|vitals| vitals.get(key))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        let last_visit = raw.last_visit.clone().or_else(|| from_vitals("lastVisit"));
        let upcoming_appointment =
            raw.upcoming_appointment.clone().or_else(|| from_vitals("upcomingAppointment"));
        let blood_type = raw.blood_type.clone().or_else(|| from_vitals("bloodType"));

        Self {
            id: raw.object_id.or(raw.id).unwrap_or_else(super::temp_id),
            name: raw.name.unwrap_or_else(|| UNKNOWN_PATIENT_NAME.to_string()),
            age: raw.age,
            gender: raw.gender.unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
            medical_history: raw.medical_history,
            allergies: raw.allergies,
            medications: raw.medications,
            last_visit,
            upcoming_appointment,
            blood_type,
            profile_image: raw.profile_image,
            vitals: raw.vitals,
            contact: raw.contact,
            insurance_info: raw.insurance_info,
            emergency_contact: raw.emergency_contact,
            notes: raw.notes.unwrap_or_default(),
            status: raw.status.unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
            updated_at: raw.updated_at.unwrap_or_default(),
        }
    }
}
