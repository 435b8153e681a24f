//! Shared application state

use std::sync::Arc;

use crate::{
    config::Config,
    services::{ConferenceService, ProfileService, QueryService, RegistrationService},
    store::{ConferenceStore, MemoryStore},
};

/// Shared application state passed to all handlers.
///
/// The store handle is injected explicitly into every service at startup;
/// nothing reaches the store through process-wide globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ConferenceStore>,
    pub profile_service: Arc<ProfileService>,
    pub conference_service: Arc<ConferenceService>,
    pub registration_service: Arc<RegistrationService>,
    pub query_service: Arc<QueryService>,
}

impl AppState {
    /// State backed by the in-memory reference store.
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// State over an arbitrary store implementation.
    pub fn with_store(config: Config, store: Arc<dyn ConferenceStore>) -> Self {
        let retry_budget = config.registration.retry_budget;

        Self {
            config: Arc::new(config),
            profile_service: Arc::new(ProfileService::new(store.clone(), retry_budget)),
            conference_service: Arc::new(ConferenceService::new(store.clone(), retry_budget)),
            registration_service: Arc::new(RegistrationService::new(store.clone(), retry_budget)),
            query_service: Arc::new(QueryService::new(store.clone())),
            store,
        }
    }
}
