//! Conference entity and wire forms
//!
//! A conference is stored as a child of its organizer's profile so that
//! organizer-local writes stay within one entity group. `month` is
//! denormalized from `start_date` at creation to allow an equality filter
//! alongside an inequality on another field.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::ConferenceKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    /// Store-allocated id, unique under the organizer's profile.
    pub conference_id: i64,
    /// Owning profile. Immutable for the lifetime of the conference.
    pub organizer_user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub topics: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Month of `start_date` (1-12), fixed at creation.
    pub month: Option<u32>,
    pub max_attendees: u32,
    /// Invariant: `0 <= seats_available <= max_attendees`.
    pub seats_available: u32,
}

impl Conference {
    pub fn from_form(conference_id: i64, organizer_user_id: &str, form: ConferenceForm) -> Self {
        let month = form.start_date.map(|d| d.month());
        Self {
            conference_id,
            organizer_user_id: organizer_user_id.to_string(),
            name: form.name,
            description: form.description,
            city: form.city,
            topics: form.topics,
            start_date: form.start_date,
            end_date: form.end_date,
            month,
            max_attendees: form.max_attendees,
            // Every seat starts out available.
            seats_available: form.max_attendees,
        }
    }

    pub fn key(&self) -> ConferenceKey {
        ConferenceKey::new(&self.organizer_user_id, self.conference_id)
    }

    /// Consume one seat. Returns false when the conference is full.
    pub fn book_seat(&mut self) -> bool {
        if self.seats_available == 0 {
            return false;
        }
        self.seats_available -= 1;
        true
    }

    /// Return one seat, capped at `max_attendees`.
    pub fn release_seat(&mut self) {
        if self.seats_available < self.max_attendees {
            self.seats_available += 1;
        }
    }
}

/// Client form for `createConference`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceForm {
    #[validate(length(min = 1, message = "Conference name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub max_attendees: u32,
}

/// Outbound representation of a conference: the entity plus its websafe key
/// and, when resolvable, the organizer's display name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceView {
    pub websafe_conference_key: String,
    #[serde(flatten)]
    pub conference: Conference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_display_name: Option<String>,
}

impl ConferenceView {
    pub fn new(conference: Conference, organizer_display_name: Option<String>) -> Self {
        Self {
            websafe_conference_key: conference.key().websafe(),
            conference,
            organizer_display_name,
        }
    }
}
