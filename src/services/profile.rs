//! Profile service - read/upsert of the caller's profile

use std::sync::Arc;

use crate::{
    auth::Principal,
    models::{Profile, ProfileForm, TeeShirtSize},
    store::ConferenceStore,
    Error, Result,
};

pub struct ProfileService {
    store: Arc<dyn ConferenceStore>,
    retry_budget: usize,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ConferenceStore>, retry_budget: usize) -> Self {
        Self {
            store,
            retry_budget,
        }
    }

    pub async fn get_profile(&self, principal: &Principal) -> Result<Option<Profile>> {
        self.store.get_profile(&principal.user_id).await
    }

    /// Create or update the caller's profile.
    ///
    /// On creation the display name falls back to the email local-part and
    /// `main_email` is taken from the principal; the tee shirt size comes
    /// from the form. On update only `display_name` (when provided) and
    /// `tee_shirt_size` are rewritten - `main_email` is set once and never
    /// changes.
    ///
    /// The read-modify-write runs in a single-group transaction: a
    /// registration committing to the caller's group between the read and
    /// the write would otherwise be silently overwritten, losing its
    /// attendance entry while the seat stays consumed.
    pub async fn save_profile(&self, principal: &Principal, form: ProfileForm) -> Result<Profile> {
        for attempt in 1..=self.retry_budget {
            match self.try_save(principal, &form).await {
                Err(Error::TxConflict) => {
                    tracing::debug!(attempt, "profile save hit a commit conflict");
                }
                other => return other,
            }
        }
        Err(Error::Unavailable(
            "Profile could not be saved due to contention, please retry".to_string(),
        ))
    }

    async fn try_save(&self, principal: &Principal, form: &ProfileForm) -> Result<Profile> {
        let tee_shirt_size = form.tee_shirt_size.unwrap_or(TeeShirtSize::NotSpecified);

        let mut tx = self.store.begin(&[&principal.user_id]).await?;
        let profile = match tx.get_profile(&principal.user_id).await? {
            Some(mut existing) => {
                existing.update(form.display_name.as_deref(), tee_shirt_size);
                existing
            }
            None => Profile::new(
                &principal.user_id,
                form.display_name
                    .clone()
                    .unwrap_or_else(|| principal.default_display_name()),
                &principal.email,
                tee_shirt_size,
            ),
        };
        tx.put_profile(profile.clone())?;
        tx.commit().await?;

        tracing::debug!(user_id = %principal.user_id, "profile saved");
        Ok(profile)
    }

    /// The caller's persisted profile, or an in-memory default that is not
    /// written to the store until something saves it.
    pub async fn get_or_create(&self, principal: &Principal) -> Result<Profile> {
        Ok(self
            .store
            .get_profile(&principal.user_id)
            .await?
            .unwrap_or_else(|| Profile::default_for(principal)))
    }
}
