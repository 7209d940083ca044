//! User account types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::impl_wire_name_conversions;
use crate::utils::lenient;

/// Role chosen at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Doctor,
    Patient,
    #[default]
    #[serde(other)]
    Unknown,
}

impl_wire_name_conversions!(UserRole {
    Doctor => "doctor",
    Patient => "patient",
    Unknown => "unknown",
});

/// A user account as returned by `GET /user/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UserPayload")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: UserRole,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    #[serde(rename = "_id", default, deserialize_with = "lenient::non_empty_string")]
    object_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    email: Option<String>,
    #[serde(default)]
    role: UserRole,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<UserPayload> for User {
    fn from(raw: UserPayload) -> Self {
        Self {
            id: raw.object_id.or(raw.id),
            name: raw.name,
            email: raw.email,
            role: raw.role,
            extra: raw.extra,
        }
    }
}

/// Response envelope of the user endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UserEnvelope {
    pub success: bool,
    pub message: Option<String>,
    pub user: Option<User>,
}

impl UserEnvelope {
    /// The user, if the backend reported success and sent one.
    pub fn into_user(self) -> Option<User> {
        if self.success {
            self.user
        } else {
            None
        }
    }
}

/// Account settings edited by the logged-in user
///
/// `name` goes to the account and to the role record; the other fields go to
/// the role record only, and are left out of the body when unset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl ProfileUpdate {
    pub fn new(name: &str) -> Self {
        Self { name: name.trim().to_string(), ..Self::default() }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_profile_image(mut self, uri: impl Into<String>) -> Self {
        self.profile_image = Some(uri.into());
        self
    }
}
