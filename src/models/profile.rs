//! Profile entity
//!
//! A profile is the durable state of a registered user, keyed by the user id
//! the identity provider supplies. It is created lazily on first
//! authenticated write and mutated only through the narrow methods below.

use serde::{Deserialize, Serialize};

use crate::auth::Principal;

/// Tee shirt sizes offered at the registration desk.
///
/// The `_M`/`_W` suffixes are men's and women's cuts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeeShirtSize {
    #[default]
    #[serde(rename = "NOT_SPECIFIED")]
    NotSpecified,
    #[serde(rename = "XS_M")]
    XsM,
    #[serde(rename = "XS_W")]
    XsW,
    #[serde(rename = "S_M")]
    SM,
    #[serde(rename = "S_W")]
    SW,
    #[serde(rename = "M_M")]
    MM,
    #[serde(rename = "M_W")]
    MW,
    #[serde(rename = "L_M")]
    LM,
    #[serde(rename = "L_W")]
    LW,
    #[serde(rename = "XL_M")]
    XlM,
    #[serde(rename = "XL_W")]
    XlW,
    #[serde(rename = "XXL_M")]
    XxlM,
    #[serde(rename = "XXL_W")]
    XxlW,
    #[serde(rename = "XXXL_M")]
    XxxlM,
    #[serde(rename = "XXXL_W")]
    XxxlW,
}

/// A registered user's durable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Primary key, sourced from the identity provider. Immutable.
    pub user_id: String,
    pub display_name: String,
    /// Set once at creation; never rewritten by updates.
    pub main_email: String,
    pub tee_shirt_size: TeeShirtSize,
    /// Websafe keys of conferences this user attends, in registration order.
    /// Invariant: no duplicates.
    pub conference_keys_to_attend: Vec<String>,
}

impl Profile {
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        main_email: impl Into<String>,
        tee_shirt_size: TeeShirtSize,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            main_email: main_email.into(),
            tee_shirt_size,
            conference_keys_to_attend: Vec::new(),
        }
    }

    /// Default profile for a principal with no persisted state. Not written
    /// to the store until a caller explicitly saves it.
    pub fn default_for(principal: &Principal) -> Self {
        Self::new(
            &principal.user_id,
            principal.default_display_name(),
            &principal.email,
            TeeShirtSize::NotSpecified,
        )
    }

    /// Rewrite the updatable fields. `main_email` and `user_id` stay fixed;
    /// the display name is kept when the form omitted it.
    pub fn update(&mut self, display_name: Option<&str>, tee_shirt_size: TeeShirtSize) {
        if let Some(name) = display_name {
            self.display_name = name.to_string();
        }
        self.tee_shirt_size = tee_shirt_size;
    }

    pub fn attends(&self, websafe_key: &str) -> bool {
        self.conference_keys_to_attend
            .iter()
            .any(|k| k == websafe_key)
    }

    /// Append a conference key to the attendance list. Returns false (and
    /// leaves the list unchanged) when the key is already present.
    pub fn add_conference_to_attend(&mut self, websafe_key: &str) -> bool {
        if self.attends(websafe_key) {
            return false;
        }
        self.conference_keys_to_attend.push(websafe_key.to_string());
        true
    }

    /// Remove a conference key from the attendance list. Returns false when
    /// the key was not present.
    pub fn remove_conference_to_attend(&mut self, websafe_key: &str) -> bool {
        let before = self.conference_keys_to_attend.len();
        self.conference_keys_to_attend.retain(|k| k != websafe_key);
        self.conference_keys_to_attend.len() != before
    }
}

/// Client form for `saveProfile`. Both fields are optional; server-side
/// defaults apply on creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub display_name: Option<String>,
    pub tee_shirt_size: Option<TeeShirtSize>,
}
