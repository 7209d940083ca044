//! Login session service - core business logic
//!
//! The logged-in user is identified by the user id kept in the session store
//! under [`SESSION_USER_KEY`]; every account operation starts from it.

use std::sync::Arc;

use eyecare_domain::constants::{NO_SESSION_MESSAGE, SESSION_USER_KEY};
use eyecare_domain::{
    AuthResponse, EyeCareError, LoginRequest, ProfileUpdate, RegisterRequest, Result, User,
    UserEnvelope, UserRole,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::fetch::Fetcher;
use crate::normalize::{accepted, single_record};
use crate::ports::{KeyValueStore, PortalApi};

/// Role-specific profile of the logged-in user
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RoleProfile {
    pub role: UserRole,
    pub profile: Value,
}

/// Session service
pub struct SessionService {
    api: Arc<dyn PortalApi>,
    store: Arc<dyn KeyValueStore>,
    fetcher: Fetcher,
}

impl SessionService {
    /// Create a new session service
    pub fn new(api: Arc<dyn PortalApi>, store: Arc<dyn KeyValueStore>, fetcher: Fetcher) -> Self {
        Self { api, store, fetcher }
    }

    /// Log in and remember the user id.
    ///
    /// Login is attempted once; an unsuccessful response becomes
    /// [`EyeCareError::Auth`] carrying the backend's message.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let request = LoginRequest::new(email, password);
        if request.email.is_empty() || request.password.is_empty() {
            return Err(EyeCareError::InvalidInput("email and password are required".to_string()));
        }

        let response: AuthResponse = serde_json::from_value(self.api.login(&request).await?)?;
        let user_id = accepted_user_id(response, "login failed")?;
        self.store.set(SESSION_USER_KEY, &user_id).await?;
        info!(user_id = %user_id, "user logged in");
        Ok(user_id)
    }

    /// Create an account and, when the backend returns its id, remember it
    /// as the logged-in user.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<String>> {
        if request.name.is_empty() || request.email.is_empty() || request.password.is_empty() {
            return Err(EyeCareError::InvalidInput(
                "name, email and password are required".to_string(),
            ));
        }

        let response: AuthResponse = serde_json::from_value(self.api.register(request).await?)?;
        if !response.success {
            return Err(EyeCareError::Auth(
                response.message.unwrap_or_else(|| "registration failed".to_string()),
            ));
        }
        if let Some(user_id) = &response.user_id {
            self.store.set(SESSION_USER_KEY, user_id).await?;
            info!(user_id = %user_id, role = %request.role, "account registered");
        }
        Ok(response.user_id)
    }

    /// Id of the logged-in user, if any
    pub async fn current_user_id(&self) -> Result<Option<String>> {
        Ok(self.store.get(SESSION_USER_KEY).await?.filter(|id| !id.is_empty()))
    }

    /// Account of the logged-in user
    pub async fn current_user(&self) -> Result<User> {
        let user_id = self.require_user_id().await?;
        let payload =
            self.fetcher.fetch("current user", || self.api.get_user(&user_id)).await?;
        let envelope: UserEnvelope = serde_json::from_value(payload)?;
        let message = envelope.message.clone();
        envelope.into_user().ok_or_else(|| {
            EyeCareError::NotFound(message.unwrap_or_else(|| format!("user {user_id}")))
        })
    }

    /// Doctor or patient profile of the logged-in user.
    ///
    /// `None` when the role has no profile kind or no profile exists yet.
    pub async fn role_profile(&self) -> Result<Option<RoleProfile>> {
        let (user_id, user) = self.current_account().await?;
        self.profile_for(&user_id, user.role).await
    }

    /// Role profile of the logged-in user, creating an empty one when the
    /// backend has none yet. The create request is attempted once.
    pub async fn ensure_role_profile(&self) -> Result<Option<RoleProfile>> {
        let (user_id, user) = self.current_account().await?;
        if let Some(profile) = self.profile_for(&user_id, user.role).await? {
            return Ok(Some(profile));
        }
        self.create_role_record(&user_id, &user, &Value::Null).await
    }

    /// Save account settings.
    ///
    /// The account name is written first, then the role record, which is
    /// created when missing. Each write is attempted once. Returns the role
    /// profile as saved, or `None` for users without a profile kind.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Option<RoleProfile>> {
        let name = update.name.trim();
        if name.is_empty() {
            return Err(EyeCareError::InvalidInput("name is required".to_string()));
        }
        let user_id = self.require_user_id().await?;
        accepted(
            self.api.update_user(&user_id, &json!({ "name": name })).await?,
            "failed to update user info",
        )?;
        info!(user_id = %user_id, "account name updated");

        let mut fields = serde_json::to_value(update)
            .map_err(|e| EyeCareError::Internal(format!("failed to encode profile: {e}")))?;
        fields["name"] = json!(name);

        let (_, user) = self.current_account().await?;
        let existing = self.profile_for(&user_id, user.role).await?;
        let Some((mut profile, profile_id)) =
            existing.and_then(|p| record_id(&p.profile).map(|id| (p, id)))
        else {
            return self.create_role_record(&user_id, &user, &fields).await;
        };

        let response = match user.role {
            UserRole::Doctor => self.api.update_doctor(&profile_id, &fields).await?,
            UserRole::Patient => self.api.update_patient(&profile_id, &fields).await?,
            UserRole::Unknown => return Ok(None),
        };
        accepted(response, &format!("failed to update {} profile", user.role))?;
        merge_fields(&mut profile.profile, &fields);
        info!(
            user_id = %user_id,
            profile_id = %profile_id,
            role = %user.role,
            "role profile updated"
        );
        Ok(Some(profile))
    }

    /// Set a new password for the logged-in user. Attempted once.
    pub async fn change_password(&self, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(EyeCareError::InvalidInput("new password is required".to_string()));
        }
        let user_id = self.require_user_id().await?;
        let response: AuthResponse = serde_json::from_value(
            self.api.update_user(&user_id, &json!({ "password": new_password })).await?,
        )?;
        if !response.success {
            return Err(EyeCareError::Client(
                response.message.unwrap_or_else(|| "failed to update password".to_string()),
            ));
        }
        info!(user_id = %user_id, "password changed");
        Ok(())
    }

    /// Forget the logged-in user and confirm the store no longer holds it.
    pub async fn logout(&self) -> Result<()> {
        self.store.remove(SESSION_USER_KEY).await?;
        if self.store.get(SESSION_USER_KEY).await?.is_some() {
            warn!("session key still present after removal");
            return Err(EyeCareError::Storage("failed to clear the session".to_string()));
        }
        info!("user logged out");
        Ok(())
    }

    /// Stored user id with its account. The id from the session is kept
    /// when the account omits its own.
    async fn current_account(&self) -> Result<(String, User)> {
        let user = self.current_user().await?;
        let user_id = match &user.id {
            Some(id) => id.clone(),
            None => self.require_user_id().await?,
        };
        Ok((user_id, user))
    }

    async fn profile_for(&self, user_id: &str, role: UserRole) -> Result<Option<RoleProfile>> {
        let fetched = match role {
            UserRole::Doctor => {
                self.fetcher.fetch("doctor profile", || self.api.doctor_profile(user_id)).await
            }
            UserRole::Patient => {
                self.fetcher.fetch("patient profile", || self.api.patient_profile(user_id)).await
            }
            UserRole::Unknown => {
                debug!(user_id, "user has no role profile");
                return Ok(None);
            }
        };

        let payload = match fetched {
            Ok(payload) => payload,
            Err(EyeCareError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        let profile = single_record(&payload).cloned();
        Ok(profile.map(|profile| RoleProfile { role, profile }))
    }

    /// Create the doctor or patient record for `user`, seeded with `fields`.
    async fn create_role_record(
        &self,
        user_id: &str,
        user: &User,
        fields: &Value,
    ) -> Result<Option<RoleProfile>> {
        let mut record = json!({
            "userId": user_id,
            "name": user.name.clone().unwrap_or_default(),
            "contact": "",
            "address": "",
        });
        merge_fields(&mut record, fields);

        let response = match user.role {
            UserRole::Doctor => self.api.create_doctor(&record).await?,
            UserRole::Patient => self.api.create_patient(&record).await?,
            UserRole::Unknown => return Ok(None),
        };
        let response = accepted(response, &format!("failed to create {} profile", user.role))?;

        let created_id = ["doctorId", "patientId"]
            .iter()
            .find_map(|key| response.get(*key).and_then(Value::as_str))
            .map(str::to_owned)
            .or_else(|| single_record(&response).and_then(record_id));
        if let Some(id) = created_id {
            record["_id"] = json!(id);
        }
        info!(user_id, role = %user.role, "role profile created");
        Ok(Some(RoleProfile { role: user.role, profile: record }))
    }

    async fn require_user_id(&self) -> Result<String> {
        self.current_user_id().await?.ok_or_else(|| EyeCareError::Auth(NO_SESSION_MESSAGE.into()))
    }
}

fn record_id(record: &Value) -> Option<String> {
    ["_id", "id"]
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
}

fn merge_fields(target: &mut Value, fields: &Value) {
    if let (Value::Object(target), Value::Object(fields)) = (target, fields) {
        target.extend(fields.iter().map(|(key, value)| (key.clone(), value.clone())));
    }
}

fn accepted_user_id(response: AuthResponse, fallback: &str) -> Result<String> {
    if !response.success {
        return Err(EyeCareError::Auth(response.message.unwrap_or_else(|| fallback.to_string())));
    }
    response
        .user_id
        .ok_or_else(|| EyeCareError::Auth("response carried no user id".to_string()))
}
