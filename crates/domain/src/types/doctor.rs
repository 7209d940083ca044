//! Doctor directory entries

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::lenient;

/// A doctor as listed by the directory endpoints
///
/// Fields the client does not interpret are kept in `extra` and written back
/// unchanged on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DoctorPayload")]
pub struct Doctor {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire form of [`Doctor`]; `_id` wins over `id` when both are sent
#[derive(Debug, Deserialize)]
struct DoctorPayload {
    #[serde(rename = "_id", default, deserialize_with = "lenient::non_empty_string")]
    object_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    specialty: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    rating: Option<f64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<DoctorPayload> for Doctor {
    fn from(raw: DoctorPayload) -> Self {
        Self {
            id: raw.object_id.or(raw.id),
            name: raw.name,
            specialty: raw.specialty,
            rating: raw.rating,
            extra: raw.extra,
        }
    }
}

impl Doctor {
    /// Rating used for ordering; unrated doctors rank as 0.
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(crate::constants::UNKNOWN_DOCTOR_NAME)
    }

    /// Whether the name or specialty contains `query`, ignoring case.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        [&self.name, &self.specialty]
            .into_iter()
            .flatten()
            .any(|field| super::contains_ignore_case(field, query))
    }

    /// Whether the specialty contains `specialty`, ignoring case.
    pub fn has_specialty(&self, specialty: &str) -> bool {
        self.specialty.as_deref().is_some_and(|s| super::contains_ignore_case(s, specialty))
    }
}
