//! Business logic layer
//!
//! Services orchestrate operations over the store adapter, apply business
//! rules, and own the transaction/retry policy. Handlers stay thin and call
//! into these.

pub mod conference;
pub mod profile;
pub mod query;
pub mod registration;

pub use conference::ConferenceService;
pub use profile::ProfileService;
pub use query::QueryService;
pub use registration::{RegistrationOutcome, RegistrationService, UnregisterOutcome};
