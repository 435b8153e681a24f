//! In-memory `ConferenceStore` implementation
//!
//! Reference store used by the default server wiring and the test suite.
//! Entity groups carry a version counter; a transaction snapshots its
//! declared groups at `begin` and validates those versions at commit, so
//! concurrent commits to the same group serialize optimistically exactly
//! like the real entity store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::{
    models::{Conference, ConferenceQuery, Profile},
    store::{ConferenceKey, ConferenceStore, StoreTransaction, MAX_TX_GROUPS},
    Error, Result,
};

#[derive(Default)]
struct Shared {
    profiles: HashMap<String, Profile>,
    conferences: HashMap<ConferenceKey, Conference>,
    /// Commit counter per entity group (keyed by the root profile user id).
    group_versions: HashMap<String, u64>,
    /// Next child id per parent profile.
    next_ids: HashMap<String, i64>,
}

impl Shared {
    fn version(&self, group: &str) -> u64 {
        self.group_versions.get(group).copied().unwrap_or(0)
    }

    fn bump(&mut self, group: &str) {
        *self.group_versions.entry(group.to_string()).or_insert(0) += 1;
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    shared: Arc<RwLock<Shared>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Shared> {
        // Lock poisoning only happens if a writer panicked; propagating the
        // panic is the least surprising option for an in-memory store.
        self.shared.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Shared> {
        self.shared.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ConferenceStore for MemoryStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        Ok(self.read().profiles.get(user_id).cloned())
    }

    async fn get_profiles(&self, user_ids: &[String]) -> Result<Vec<Profile>> {
        let shared = self.read();
        Ok(user_ids
            .iter()
            .filter_map(|id| shared.profiles.get(id).cloned())
            .collect())
    }

    async fn put_profile(&self, profile: &Profile) -> Result<()> {
        let mut shared = self.write();
        shared.bump(&profile.user_id);
        shared
            .profiles
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn get_conference(&self, key: &ConferenceKey) -> Result<Option<Conference>> {
        Ok(self.read().conferences.get(key).cloned())
    }

    async fn get_conferences(&self, keys: &[ConferenceKey]) -> Result<Vec<Option<Conference>>> {
        let shared = self.read();
        Ok(keys
            .iter()
            .map(|key| shared.conferences.get(key).cloned())
            .collect())
    }

    async fn allocate_conference_id(&self, organizer_user_id: &str) -> Result<i64> {
        let mut shared = self.write();
        let next = shared
            .next_ids
            .entry(organizer_user_id.to_string())
            .or_insert(1);
        let id = *next;
        *next += 1;
        Ok(id)
    }

    async fn conferences_by_organizer(&self, organizer_user_id: &str) -> Result<Vec<Conference>> {
        let shared = self.read();
        let mut found: Vec<Conference> = shared
            .conferences
            .values()
            .filter(|c| c.organizer_user_id == organizer_user_id)
            .cloned()
            .collect();
        found.sort_by_key(|c| c.conference_id);
        Ok(found)
    }

    async fn query_conferences(&self, query: &ConferenceQuery) -> Result<Vec<Conference>> {
        let shared = self.read();
        let mut found: Vec<Conference> = shared
            .conferences
            .values()
            .filter(|c| query.matches(c))
            .cloned()
            .collect();
        drop(shared);
        found.sort_by(|a, b| query.compare(a, b));
        Ok(found)
    }

    async fn begin(&self, groups: &[&str]) -> Result<Box<dyn StoreTransaction>> {
        let mut declared: Vec<String> = groups.iter().map(|g| g.to_string()).collect();
        declared.sort();
        declared.dedup();
        if declared.len() > MAX_TX_GROUPS {
            return Err(Error::Internal(format!(
                "transaction spans {} entity groups, at most {MAX_TX_GROUPS} allowed",
                declared.len()
            )));
        }

        let shared = self.read();
        let base_versions = declared
            .iter()
            .map(|g| (g.clone(), shared.version(g)))
            .collect();
        // Entity groups are small (a profile plus its conferences), so the
        // snapshot clones them eagerly.
        let profiles = declared
            .iter()
            .filter_map(|g| shared.profiles.get(g).map(|p| (g.clone(), p.clone())))
            .collect();
        let conferences = shared
            .conferences
            .iter()
            .filter(|(key, _)| declared.iter().any(|g| *g == key.organizer_user_id))
            .map(|(key, c)| (key.clone(), c.clone()))
            .collect();
        drop(shared);

        Ok(Box::new(MemoryTransaction {
            shared: Arc::clone(&self.shared),
            declared,
            base_versions,
            profiles,
            conferences,
            pending_profiles: HashMap::new(),
            pending_conferences: HashMap::new(),
        }))
    }
}

struct MemoryTransaction {
    shared: Arc<RwLock<Shared>>,
    declared: Vec<String>,
    base_versions: HashMap<String, u64>,
    /// Snapshot of the declared groups, taken at begin.
    profiles: HashMap<String, Profile>,
    conferences: HashMap<ConferenceKey, Conference>,
    pending_profiles: HashMap<String, Profile>,
    pending_conferences: HashMap<ConferenceKey, Conference>,
}

impl MemoryTransaction {
    fn check_group(&self, group: &str) -> Result<()> {
        if self.declared.iter().any(|g| g == group) {
            Ok(())
        } else {
            Err(Error::Internal(format!(
                "entity group '{group}' was not declared by this transaction"
            )))
        }
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn get_profile(&mut self, user_id: &str) -> Result<Option<Profile>> {
        self.check_group(user_id)?;
        Ok(self
            .pending_profiles
            .get(user_id)
            .or_else(|| self.profiles.get(user_id))
            .cloned())
    }

    async fn get_conference(&mut self, key: &ConferenceKey) -> Result<Option<Conference>> {
        self.check_group(&key.organizer_user_id)?;
        Ok(self
            .pending_conferences
            .get(key)
            .or_else(|| self.conferences.get(key))
            .cloned())
    }

    fn put_profile(&mut self, profile: Profile) -> Result<()> {
        self.check_group(&profile.user_id)?;
        self.pending_profiles.insert(profile.user_id.clone(), profile);
        Ok(())
    }

    fn put_conference(&mut self, conference: Conference) -> Result<()> {
        self.check_group(&conference.organizer_user_id)?;
        self.pending_conferences.insert(conference.key(), conference);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let mut shared = self.shared.write().unwrap_or_else(|e| e.into_inner());

        // Optimistic check: every declared group must be unchanged since the
        // snapshot, or the commit aborts and the caller may retry.
        for (group, base) in &self.base_versions {
            if shared.version(group) != *base {
                return Err(Error::TxConflict);
            }
        }

        let mut touched: Vec<String> = self
            .pending_profiles
            .keys()
            .cloned()
            .chain(
                self.pending_conferences
                    .keys()
                    .map(|key| key.organizer_user_id.clone()),
            )
            .collect();
        touched.sort();
        touched.dedup();

        for (user_id, profile) in self.pending_profiles {
            shared.profiles.insert(user_id, profile);
        }
        for (key, conference) in self.pending_conferences {
            shared.conferences.insert(key, conference);
        }
        for group in &touched {
            shared.bump(group);
        }

        Ok(())
    }
}
