//! Conference keys and their websafe encoding
//!
//! A conference is identified by `(organizer_user_id, conference_id)`.
//! Externally it travels as a websafe key: URL-safe base64 (no padding) of
//! the key path `Profile/{organizer}/Conference/{id}`. The encoding
//! round-trips losslessly; anything that fails to decode is treated as a
//! reference to a conference that does not exist.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

/// Persistent identity of a conference within its organizer's entity group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConferenceKey {
    pub organizer_user_id: String,
    pub conference_id: i64,
}

/// The websafe string did not decode to a conference key path.
#[derive(Debug, thiserror::Error)]
#[error("malformed conference key")]
pub struct KeyDecodeError;

impl ConferenceKey {
    pub fn new(organizer_user_id: impl Into<String>, conference_id: i64) -> Self {
        Self {
            organizer_user_id: organizer_user_id.into(),
            conference_id,
        }
    }

    /// URL-safe opaque encoding of this key.
    pub fn websafe(&self) -> String {
        URL_SAFE_NO_PAD.encode(format!(
            "Profile/{}/Conference/{}",
            self.organizer_user_id, self.conference_id
        ))
    }

    pub fn from_websafe(websafe: &str) -> Result<Self, KeyDecodeError> {
        let raw = URL_SAFE_NO_PAD.decode(websafe).map_err(|_| KeyDecodeError)?;
        let path = String::from_utf8(raw).map_err(|_| KeyDecodeError)?;

        // Split from the right so organizer ids containing the separator
        // still round-trip.
        let (parent, id) = path.rsplit_once("/Conference/").ok_or(KeyDecodeError)?;
        let organizer = parent.strip_prefix("Profile/").ok_or(KeyDecodeError)?;
        if organizer.is_empty() {
            return Err(KeyDecodeError);
        }
        let conference_id = id.parse().map_err(|_| KeyDecodeError)?;

        Ok(Self::new(organizer, conference_id))
    }
}
