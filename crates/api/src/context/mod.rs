//! Application context - dependency injection container

use std::sync::Arc;

use eyecare_core::ports::{KeyValueStore, PortalApi};
use eyecare_core::{DirectoryService, Fetcher, SessionService};
use eyecare_domain::constants::{DOCTOR_CACHE_KEY, PATIENT_CACHE_KEY};
use eyecare_domain::{Doctor, Patient, PortalConfig, Result};
use eyecare_infra::{open_store, PortalApiClient};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Application context - holds all services and dependencies
///
/// Built once at startup and passed by reference to every command. The most
/// recently fetched doctor and patient lists are kept so that searches can
/// fall back to filtering them locally. They are also written to the store,
/// so a later process sharing a persistent store starts with them.
pub struct AppContext {
    pub config: PortalConfig,
    pub api: Arc<dyn PortalApi>,
    pub store: Arc<dyn KeyValueStore>,
    pub directory: Arc<DirectoryService>,
    pub session: Arc<SessionService>,
    pub doctor_cache: RwLock<Vec<Doctor>>,
    pub patient_cache: RwLock<Vec<Patient>>,
    shutdown: CancellationToken,
}

impl AppContext {
    /// Wire the HTTP client, session store and services from configuration.
    pub fn new(config: PortalConfig) -> Result<Self> {
        let api: Arc<dyn PortalApi> = Arc::new(PortalApiClient::from_config(&config.api)?);
        let store = open_store(&config.storage)?;
        let fetcher = Fetcher::from_settings(&config.retry);

        info!(
            base_url = %config.api.base_url,
            max_attempts = config.retry.max_attempts,
            persistent_session = config.storage.path.is_some(),
            "application context initialised"
        );

        Ok(Self::from_parts(config, api, store, fetcher))
    }

    /// Assemble a context from already-built parts.
    pub fn from_parts(
        config: PortalConfig,
        api: Arc<dyn PortalApi>,
        store: Arc<dyn KeyValueStore>,
        fetcher: Fetcher,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let fetcher = fetcher.with_cancellation(shutdown.clone());

        let directory = Arc::new(DirectoryService::new(Arc::clone(&api), fetcher.clone()));
        let session = Arc::new(SessionService::new(Arc::clone(&api), Arc::clone(&store), fetcher));

        Self {
            config,
            api,
            store,
            directory,
            session,
            doctor_cache: RwLock::new(Vec::new()),
            patient_cache: RwLock::new(Vec::new()),
            shutdown,
        }
    }

    /// Remember the latest doctor listing.
    pub async fn remember_doctors(&self, doctors: &[Doctor]) {
        *self.doctor_cache.write() = doctors.to_vec();
        self.persist(DOCTOR_CACHE_KEY, doctors).await;
    }

    /// Remember the latest patient listing.
    pub async fn remember_patients(&self, patients: &[Patient]) {
        *self.patient_cache.write() = patients.to_vec();
        self.persist(PATIENT_CACHE_KEY, patients).await;
    }

    /// Last listed doctors, read back from the store when this process has
    /// not listed any.
    pub async fn cached_doctors(&self) -> Vec<Doctor> {
        self.cached(&self.doctor_cache, DOCTOR_CACHE_KEY).await
    }

    /// Last listed patients, read back from the store when this process has
    /// not listed any.
    pub async fn cached_patients(&self) -> Vec<Patient> {
        self.cached(&self.patient_cache, PATIENT_CACHE_KEY).await
    }

    async fn persist<T: Serialize>(&self, key: &str, items: &[T]) {
        let encoded = match serde_json::to_string(items) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key, error = %e, "failed to encode cached listing");
                return;
            }
        };
        if let Err(e) = self.store.set(key, &encoded).await {
            warn!(key, error = %e, "failed to persist cached listing");
        }
    }

    // A missing or unreadable entry leaves the fallback empty.
    async fn cached<T>(&self, cache: &RwLock<Vec<T>>, key: &str) -> Vec<T>
    where
        T: Clone + DeserializeOwned,
    {
        let in_memory = cache.read().clone();
        if !in_memory.is_empty() {
            return in_memory;
        }

        let stored = match self.store.get(key).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "failed to read cached listing");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<T>>(&stored) {
            Ok(items) => {
                debug!(key, count = items.len(), "restored cached listing");
                cache.write().clone_from(&items);
                items
            }
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable cached listing");
                Vec::new()
            }
        }
    }

    /// Token cancelled on shutdown; in-flight fetches end with
    /// `EyeCareError::Cancelled`.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Cancel every in-flight fetch.
    pub fn shutdown(&self) {
        if !self.shutdown.is_cancelled() {
            info!("cancelling in-flight requests");
            self.shutdown.cancel();
        }
    }
}
