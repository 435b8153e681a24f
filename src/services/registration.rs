//! Registration service - the transactional seat-booking core
//!
//! Booking a seat touches two entities that usually live in different
//! entity groups: the conference (rooted at its organizer's profile) and
//! the caller's own profile. Both writes run in one cross-group transaction
//! so the seat count and the attendance list can never drift apart:
//! for every conference, `seats_available` plus the number of profiles
//! holding its key always equals `max_attendees`.
//!
//! Business outcomes are tagged variants returned from the transactional
//! step; only store-level commit conflicts are retried, up to the
//! configured budget.

use std::sync::Arc;

use crate::{
    auth::Principal,
    models::{Conference, Profile},
    store::{ConferenceKey, ConferenceStore},
    Error, Result,
};

/// Outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Seat reserved and attendance recorded.
    Booked,
    /// The websafe key did not decode or no such conference exists.
    ConferenceNotFound,
    /// The caller already holds a seat; nothing changed.
    AlreadyRegistered,
    /// The conference is full; nothing changed.
    NoSeats,
}

/// Outcome of an unregistration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnregisterOutcome {
    /// Seat returned and attendance removed.
    Released,
    ConferenceNotFound,
    /// The caller was not registered; nothing changed.
    NotRegistered,
}

pub struct RegistrationService {
    store: Arc<dyn ConferenceStore>,
    retry_budget: usize,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn ConferenceStore>, retry_budget: usize) -> Self {
        Self {
            store,
            retry_budget,
        }
    }

    /// Atomically reserve a seat on the conference and append its key to
    /// the caller's attendance list.
    pub async fn register(
        &self,
        principal: &Principal,
        websafe_key: &str,
    ) -> Result<RegistrationOutcome> {
        let Ok(key) = ConferenceKey::from_websafe(websafe_key) else {
            return Ok(RegistrationOutcome::ConferenceNotFound);
        };

        for attempt in 1..=self.retry_budget {
            match self.try_register(principal, &key).await {
                Err(Error::TxConflict) => {
                    tracing::debug!(attempt, conference = %websafe_key, "registration commit conflict");
                }
                other => return other,
            }
        }
        Err(Error::Unavailable(
            "Registration could not be completed due to contention, please retry".to_string(),
        ))
    }

    async fn try_register(
        &self,
        principal: &Principal,
        key: &ConferenceKey,
    ) -> Result<RegistrationOutcome> {
        // The attendance list stores the canonical re-encoding of the key,
        // so non-canonical inputs cannot create duplicates.
        let websafe = key.websafe();

        let mut tx = self
            .store
            .begin(&[&key.organizer_user_id, &principal.user_id])
            .await?;

        let Some(mut conference) = tx.get_conference(key).await? else {
            return Ok(RegistrationOutcome::ConferenceNotFound);
        };
        let mut profile = tx
            .get_profile(&principal.user_id)
            .await?
            .unwrap_or_else(|| Profile::default_for(principal));

        if profile.attends(&websafe) {
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }
        if conference.seats_available == 0 {
            return Ok(RegistrationOutcome::NoSeats);
        }

        profile.add_conference_to_attend(&websafe);
        conference.book_seat();
        tx.put_profile(profile)?;
        tx.put_conference(conference)?;
        tx.commit().await?;

        tracing::info!(user_id = %principal.user_id, conference = %websafe, "seat booked");
        Ok(RegistrationOutcome::Booked)
    }

    /// Atomically drop the caller's registration and return the seat.
    pub async fn unregister(
        &self,
        principal: &Principal,
        websafe_key: &str,
    ) -> Result<UnregisterOutcome> {
        let Ok(key) = ConferenceKey::from_websafe(websafe_key) else {
            return Ok(UnregisterOutcome::ConferenceNotFound);
        };

        for attempt in 1..=self.retry_budget {
            match self.try_unregister(principal, &key).await {
                Err(Error::TxConflict) => {
                    tracing::debug!(attempt, conference = %websafe_key, "unregistration commit conflict");
                }
                other => return other,
            }
        }
        Err(Error::Unavailable(
            "Unregistration could not be completed due to contention, please retry".to_string(),
        ))
    }

    async fn try_unregister(
        &self,
        principal: &Principal,
        key: &ConferenceKey,
    ) -> Result<UnregisterOutcome> {
        let websafe = key.websafe();

        let mut tx = self
            .store
            .begin(&[&key.organizer_user_id, &principal.user_id])
            .await?;

        let Some(mut conference) = tx.get_conference(key).await? else {
            return Ok(UnregisterOutcome::ConferenceNotFound);
        };
        let Some(mut profile) = tx.get_profile(&principal.user_id).await? else {
            return Ok(UnregisterOutcome::NotRegistered);
        };
        if !profile.remove_conference_to_attend(&websafe) {
            return Ok(UnregisterOutcome::NotRegistered);
        }

        conference.release_seat();
        tx.put_profile(profile)?;
        tx.put_conference(conference)?;
        tx.commit().await?;

        tracing::info!(user_id = %principal.user_id, conference = %websafe, "seat released");
        Ok(UnregisterOutcome::Released)
    }

    /// The conferences the caller attends, in attendance-list order.
    ///
    /// Conferences are batch-loaded in one store round-trip. Entries that no
    /// longer resolve (administrative deletion) are skipped with a single
    /// warning per call.
    pub async fn conferences_to_attend(&self, principal: &Principal) -> Result<Vec<Conference>> {
        let profile = self
            .store
            .get_profile(&principal.user_id)
            .await?
            .ok_or_else(|| Error::NotFound("Profile doesn't exist.".to_string()))?;

        let mut keys = Vec::with_capacity(profile.conference_keys_to_attend.len());
        let mut skipped = 0usize;
        for websafe in &profile.conference_keys_to_attend {
            match ConferenceKey::from_websafe(websafe) {
                Ok(key) => keys.push(key),
                Err(_) => skipped += 1,
            }
        }

        let loaded = self.store.get_conferences(&keys).await?;
        let mut conferences = Vec::with_capacity(loaded.len());
        for entry in loaded {
            match entry {
                Some(conference) => conferences.push(conference),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(
                user_id = %principal.user_id,
                skipped,
                "attendance list references conferences that no longer exist"
            );
        }

        Ok(conferences)
    }
}
