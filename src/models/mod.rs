//! Domain entities and wire forms

pub mod conference;
pub mod profile;
pub mod query;

pub use conference::{Conference, ConferenceForm, ConferenceView};
pub use profile::{Profile, ProfileForm, TeeShirtSize};
pub use query::{ConferenceQuery, ConferenceQueryForm, Field, FilterClause, Operator};
