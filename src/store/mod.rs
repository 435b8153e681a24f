//! Store adapter
//!
//! Minimal contract over a keyed entity store. Entities live in entity
//! groups rooted at a profile: a `Profile` forms its own group and every
//! `Conference` belongs to its organizer's group. Transactions span at most
//! two groups (the cross-group model), see a consistent snapshot of those
//! groups taken at [`ConferenceStore::begin`], and commit optimistically —
//! a concurrent commit to any declared group aborts with
//! [`Error::TxConflict`](crate::Error::TxConflict) and may be retried by the
//! caller.

pub mod key;
pub mod memory;

pub use key::{ConferenceKey, KeyDecodeError};
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::{
    models::{Conference, ConferenceQuery, Profile},
    Result,
};

/// Transactions may declare at most this many entity groups.
pub const MAX_TX_GROUPS: usize = 2;

/// Keyed reads/writes, id allocation, structured queries and transactions
/// over profiles and conferences.
///
/// Handles are shared across request handlers and must be safe for
/// concurrent use. Non-transactional reads are consistent with the most
/// recent committed write in the same entity group.
#[async_trait]
pub trait ConferenceStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>>;

    /// Batch profile lookup in a single store round-trip. Unknown ids are
    /// silently absent from the result.
    async fn get_profiles(&self, user_ids: &[String]) -> Result<Vec<Profile>>;

    /// Upsert outside any transaction.
    async fn put_profile(&self, profile: &Profile) -> Result<()>;

    async fn get_conference(&self, key: &ConferenceKey) -> Result<Option<Conference>>;

    /// Batch conference lookup in a single store round-trip, preserving the
    /// order of `keys`. Missing entries come back as `None`.
    async fn get_conferences(&self, keys: &[ConferenceKey]) -> Result<Vec<Option<Conference>>>;

    /// Reserve a fresh conference id under the organizer's profile. The
    /// allocation itself is not transactional; an allocated id that is never
    /// written is simply discarded.
    async fn allocate_conference_id(&self, organizer_user_id: &str) -> Result<i64>;

    /// Ancestor query: every conference rooted at the given profile.
    async fn conferences_by_organizer(&self, organizer_user_id: &str) -> Result<Vec<Conference>>;

    /// Execute a validated structured query.
    async fn query_conferences(&self, query: &ConferenceQuery) -> Result<Vec<Conference>>;

    /// Open a transaction over the given entity groups (profile user ids).
    /// Duplicates are allowed and collapse to one group; more than
    /// [`MAX_TX_GROUPS`] distinct groups is an error.
    async fn begin(&self, groups: &[&str]) -> Result<Box<dyn StoreTransaction>>;
}

/// An open transaction. Reads come from the snapshot taken at `begin`
/// (overlaid with this transaction's own writes); writes are buffered until
/// [`commit`](StoreTransaction::commit). Dropping the transaction without
/// committing discards all writes and leaves no externally visible state.
#[async_trait]
pub trait StoreTransaction: Send {
    async fn get_profile(&mut self, user_id: &str) -> Result<Option<Profile>>;

    async fn get_conference(&mut self, key: &ConferenceKey) -> Result<Option<Conference>>;

    /// Buffer a profile write. The profile's group must be one of the
    /// transaction's declared groups.
    fn put_profile(&mut self, profile: Profile) -> Result<()>;

    /// Buffer a conference write. The organizer's group must be one of the
    /// transaction's declared groups.
    fn put_conference(&mut self, conference: Conference) -> Result<()>;

    /// Atomically apply all buffered writes. Either every write becomes
    /// visible or none does.
    async fn commit(self: Box<Self>) -> Result<()>;
}
