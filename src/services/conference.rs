//! Conference service - create/read of conferences owned by the caller

use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::Principal,
    models::{Conference, ConferenceForm, Profile},
    store::{ConferenceKey, ConferenceStore},
    Error, Result,
};

pub struct ConferenceService {
    store: Arc<dyn ConferenceStore>,
    retry_budget: usize,
}

impl ConferenceService {
    pub fn new(store: Arc<dyn ConferenceStore>, retry_budget: usize) -> Self {
        Self {
            store,
            retry_budget,
        }
    }

    /// Create a conference owned by the caller.
    ///
    /// The new conference and the (possibly first-time) profile commit in
    /// one single-group transaction, so ownership bookkeeping and the
    /// conference appear atomically. All seats start available.
    pub async fn create_conference(
        &self,
        principal: &Principal,
        form: ConferenceForm,
    ) -> Result<Conference> {
        form.validate()
            .map_err(|e| Error::BadRequest(e.to_string()))?;

        let conference_id = self
            .store
            .allocate_conference_id(&principal.user_id)
            .await?;
        let conference = Conference::from_form(conference_id, &principal.user_id, form);

        for attempt in 1..=self.retry_budget {
            match self.try_create(principal, conference.clone()).await {
                Err(Error::TxConflict) => {
                    tracing::debug!(attempt, "conference creation hit a commit conflict");
                }
                Err(e) => return Err(e),
                Ok(()) => {
                    tracing::info!(
                        conference_id,
                        organizer = %principal.user_id,
                        "conference created"
                    );
                    return Ok(conference);
                }
            }
        }
        Err(Error::Unavailable(
            "Conference could not be created, please retry".to_string(),
        ))
    }

    async fn try_create(&self, principal: &Principal, conference: Conference) -> Result<()> {
        let mut tx = self.store.begin(&[&principal.user_id]).await?;
        // Re-writing an existing profile would widen the conflict window
        // against registrations in the same group for no gain.
        if tx.get_profile(&principal.user_id).await?.is_none() {
            tx.put_profile(Profile::default_for(principal))?;
        }
        tx.put_conference(conference)?;
        tx.commit().await
    }

    /// Load a conference by its websafe key.
    pub async fn get_conference(&self, websafe_key: &str) -> Result<Conference> {
        let not_found = || Error::NotFound(format!("No Conference found with key: {websafe_key}"));

        let key = ConferenceKey::from_websafe(websafe_key).map_err(|_| not_found())?;
        self.store
            .get_conference(&key)
            .await?
            .ok_or_else(not_found)
    }

    /// Every conference whose store-ancestor is the caller's profile.
    pub async fn conferences_created(&self, principal: &Principal) -> Result<Vec<Conference>> {
        self.store
            .conferences_by_organizer(&principal.user_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn service() -> ConferenceService {
        ConferenceService::new(Arc::new(MemoryStore::new()), 3)
    }

    fn alice() -> Principal {
        Principal::new("u1", "alice@ex.com")
    }

    fn form(name: &str, max: u32) -> ConferenceForm {
        ConferenceForm {
            name: name.to_string(),
            description: Some("about things".to_string()),
            city: Some("London".to_string()),
            topics: vec!["Web Technologies".to_string()],
            start_date: NaiveDate::from_ymd_opt(2026, 6, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 3),
            max_attendees: max,
        }
    }

    #[tokio::test]
    async fn create_initializes_seats_and_round_trips_by_key() {
        let service = service();
        let created = service
            .create_conference(&alice(), form("X", 2))
            .await
            .unwrap();
        assert_eq!(created.seats_available, 2);
        assert_eq!(created.month, Some(6));

        let loaded = service
            .get_conference(&created.key().websafe())
            .await
            .unwrap();
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn create_materializes_the_organizer_profile() {
        let service = service();
        service
            .create_conference(&alice(), form("X", 2))
            .await
            .unwrap();
        let profile = service.store.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.display_name, "alice");
    }

    #[tokio::test]
    async fn create_leaves_an_existing_profile_untouched() {
        let service = service();
        let mut profile = Profile::default_for(&alice());
        profile.display_name = "Alice A.".to_string();
        profile.add_conference_to_attend("k1");
        service.store.put_profile(&profile).await.unwrap();

        service
            .create_conference(&alice(), form("X", 2))
            .await
            .unwrap();

        let after = service.store.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(after, profile);
    }

    #[tokio::test]
    async fn rejects_nameless_conferences() {
        let service = service();
        let err = service
            .create_conference(&alice(), form("", 2))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn undecodable_keys_read_as_not_found() {
        let service = service();
        let err = service.get_conference("???").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn conferences_created_lists_only_the_callers() {
        let service = service();
        service
            .create_conference(&alice(), form("A", 1))
            .await
            .unwrap();
        service
            .create_conference(&alice(), form("B", 1))
            .await
            .unwrap();
        service
            .create_conference(&Principal::new("u2", "bob@ex.com"), form("C", 1))
            .await
            .unwrap();

        let mine = service.conferences_created(&alice()).await.unwrap();
        let names: Vec<_> = mine.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
