//! Query service - structured filtering and ordering over conferences

use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    models::{Conference, ConferenceQuery, ConferenceQueryForm, ConferenceView},
    store::ConferenceStore,
    Result,
};

pub struct QueryService {
    store: Arc<dyn ConferenceStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn ConferenceStore>) -> Self {
        Self { store }
    }

    /// Run a caller-supplied query. Invalid filter combinations are
    /// rejected before touching the store.
    pub async fn query(&self, form: ConferenceQueryForm) -> Result<Vec<ConferenceView>> {
        let query = ConferenceQuery::from_form(form)?;
        let conferences = self.store.query_conferences(&query).await?;
        self.to_views(conferences).await
    }

    /// The fixed playground query (London / Web Technologies / January /
    /// more than 10 seats, ordered by capacity then name).
    pub async fn filtered_example(&self) -> Result<Vec<ConferenceView>> {
        let query = ConferenceQuery::london_web_tech_in_january();
        let conferences = self.store.query_conferences(&query).await?;
        self.to_views(conferences).await
    }

    /// Attach websafe keys and organizer display names to a result set.
    ///
    /// The distinct organizer profiles are pre-fetched in one batched store
    /// round-trip instead of one lookup per row.
    pub async fn to_views(&self, conferences: Vec<Conference>) -> Result<Vec<ConferenceView>> {
        let mut organizer_ids: Vec<String> = conferences
            .iter()
            .map(|c| c.organizer_user_id.clone())
            .collect();
        organizer_ids.sort();
        organizer_ids.dedup();

        let organizers = self.store.get_profiles(&organizer_ids).await?;
        let display_names: HashMap<String, String> = organizers
            .into_iter()
            .map(|p| (p.user_id, p.display_name))
            .collect();

        Ok(conferences
            .into_iter()
            .map(|conference| {
                let name = display_names.get(&conference.organizer_user_id).cloned();
                ConferenceView::new(conference, name)
            })
            .collect())
    }
}
