//! # Mirror store: a persisted snapshot of a server-owned list
//!
//! [`MirrorStore`] caches the last known list of petitions or users so the
//! client can render immediately after a restart and apply edits optimistically.
//! It is never authoritative: the remote API owns the data and every successful
//! list fetch replaces the snapshot wholesale.
//!
//! ## Operations
//!
//! | Method | Effect |
//! |--------|--------|
//! | [`load`](MirrorStore::load) | Initial snapshot from durable storage (empty when absent or unreadable). |
//! | [`list`](MirrorStore::list) | Current ordered snapshot. |
//! | [`replace_all`](MirrorStore::replace_all) | Replace the snapshot and persist. Last writer wins. |
//! | [`update_one`](MirrorStore::update_one) | Transform the record with a given identity and persist; no-op when absent. |
//! | [`remove_one`](MirrorStore::remove_one) | Drop the record with a given identity and persist; no-op when absent. |
//! | [`upsert_one`](MirrorStore::upsert_one) | Replace the record with the same identity, or append it. |
//!
//! Every mutation holds the snapshot lock while it persists, so one mutation
//! finishes (including its write to storage) before the next starts. If the
//! write fails the in-memory snapshot keeps the change and the error is returned.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{Petition, User};
use crate::storage::{DurableStorage, StoreError};

/// A record with a stable identity.
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: PartialEq + Copy + std::fmt::Debug;

    fn id(&self) -> Self::Id;
}

impl Record for Petition {
    type Id = u32;

    fn id(&self) -> u32 {
        self.petition_id
    }
}

impl Record for User {
    type Id = u32;

    fn id(&self) -> u32 {
        self.user_id
    }
}

/// Cached, persisted list of records. Clones share the same snapshot.
#[derive(Debug)]
pub struct MirrorStore<T, S> {
    records: Arc<Mutex<Vec<T>>>,
    storage: S,
    key: &'static str,
}

impl<T, S: Clone> Clone for MirrorStore<T, S> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            storage: self.storage.clone(),
            key: self.key,
        }
    }
}

impl<T: Record, S: DurableStorage> MirrorStore<T, S> {
    /// Open the mirror stored under `key`.
    pub fn load(storage: S, key: &'static str) -> Self {
        let records = match storage.get(key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable mirror `{key}`: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read mirror `{key}`: {e}");
                Vec::new()
            }
        };

        Self {
            records: Arc::new(Mutex::new(records)),
            storage,
            key,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, records: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(records)?;
        self.storage.set(self.key, &raw).inspect_err(|e| {
            tracing::error!("Failed to persist mirror `{}`: {e}", self.key);
        })
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Current ordered snapshot.
    pub fn list(&self) -> Vec<T> {
        self.lock().clone()
    }

    pub fn get(&self, id: T::Id) -> Option<T> {
        self.lock().iter().find(|r| r.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Replace the whole snapshot and persist it.
    pub fn replace_all(&self, records: Vec<T>) -> Result<(), StoreError> {
        let mut current = self.lock();
        *current = records;
        self.persist(&current)
    }

    /// Apply `transform` to the record with identity `id` and persist.
    /// Returns `false` without touching storage when no record matches.
    pub fn update_one<F>(&self, id: T::Id, transform: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut T),
    {
        let mut current = self.lock();
        let Some(record) = current.iter_mut().find(|r| r.id() == id) else {
            return Ok(false);
        };
        transform(record);
        self.persist(&current)?;
        Ok(true)
    }

    /// Remove the record with identity `id` and persist.
    /// Returns `false` without touching storage when no record matches.
    pub fn remove_one(&self, id: T::Id) -> Result<bool, StoreError> {
        let mut current = self.lock();
        let Some(index) = current.iter().position(|r| r.id() == id) else {
            return Ok(false);
        };
        current.remove(index);
        self.persist(&current)?;
        Ok(true)
    }

    /// Replace the record with the same identity in place, or append it.
    pub fn upsert_one(&self, record: T) -> Result<(), StoreError> {
        let mut current = self.lock();
        let id = record.id();
        match current.iter_mut().find(|r| r.id() == id) {
            Some(existing) => *existing = record,
            None => current.push(record),
        }
        self.persist(&current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use crate::models::UserPatch;
    use crate::storage::{PETITIONS_KEY, USERS_KEY};

    fn user(id: u32, email: &str) -> User {
        User {
            user_id: id,
            email: email.to_string(),
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            image_filename: None,
            password: None,
            auth_token: None,
        }
    }

    fn stored_users(storage: &MemoryStorage) -> Vec<User> {
        let raw = storage.get(USERS_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn seeded() -> (MemoryStorage, MirrorStore<User, MemoryStorage>) {
        let storage = MemoryStorage::new();
        let mirror = MirrorStore::load(storage.clone(), USERS_KEY);
        mirror
            .replace_all(vec![user(1, "a@x.com"), user(2, "b@x.com")])
            .unwrap();
        (storage, mirror)
    }

    #[test]
    fn test_load_empty() {
        let mirror = MirrorStore::<User, _>::load(MemoryStorage::new(), USERS_KEY);
        assert!(mirror.is_empty());
        assert_eq!(mirror.key(), USERS_KEY);
    }

    #[test]
    fn test_load_discards_malformed_content() {
        let storage = MemoryStorage::new();
        storage.set(PETITIONS_KEY, "not json").unwrap();

        let mirror = MirrorStore::<Petition, _>::load(storage, PETITIONS_KEY);
        assert!(mirror.is_empty());
    }

    #[test]
    fn test_replace_all_then_list() {
        let (storage, mirror) = seeded();

        let list = mirror.list();
        assert_eq!(list, vec![user(1, "a@x.com"), user(2, "b@x.com")]);
        assert_eq!(stored_users(&storage), list);

        // Replacing discards the previous snapshot entirely
        mirror.replace_all(vec![user(3, "c@x.com")]).unwrap();
        assert_eq!(mirror.list(), vec![user(3, "c@x.com")]);
        assert_eq!(stored_users(&storage), vec![user(3, "c@x.com")]);
    }

    #[test]
    fn test_update_one_changes_only_target() {
        let (storage, mirror) = seeded();

        let patch = UserPatch::email("c@x.com");
        let updated = mirror.update_one(1, |u| patch.apply(u)).unwrap();
        assert!(updated);

        let expected = vec![user(1, "c@x.com"), user(2, "b@x.com")];
        assert_eq!(mirror.list(), expected);
        assert_eq!(stored_users(&storage), expected);
    }

    #[test]
    fn test_update_one_absent_is_noop() {
        let (storage, mirror) = seeded();
        storage.remove(USERS_KEY).unwrap();

        let updated = mirror.update_one(9, |u| u.email.clear()).unwrap();
        assert!(!updated);
        assert_eq!(mirror.list(), vec![user(1, "a@x.com"), user(2, "b@x.com")]);
        // Nothing was persisted
        assert!(storage.get(USERS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_remove_one_is_idempotent() {
        let (storage, mirror) = seeded();

        assert!(mirror.remove_one(1).unwrap());
        assert_eq!(mirror.list(), vec![user(2, "b@x.com")]);
        assert_eq!(stored_users(&storage), vec![user(2, "b@x.com")]);

        assert!(!mirror.remove_one(1).unwrap());
        assert_eq!(mirror.list(), vec![user(2, "b@x.com")]);
    }

    #[test]
    fn test_upsert_one() {
        let (_storage, mirror) = seeded();

        mirror.upsert_one(user(2, "z@x.com")).unwrap();
        mirror.upsert_one(user(3, "c@x.com")).unwrap();

        assert_eq!(
            mirror.list(),
            vec![user(1, "a@x.com"), user(2, "z@x.com"), user(3, "c@x.com")]
        );
        assert_eq!(mirror.get(3), Some(user(3, "c@x.com")));
        assert!(mirror.get(4).is_none());
    }

    #[test]
    fn test_clones_share_snapshot() {
        let (_storage, mirror) = seeded();
        let other = mirror.clone();

        other.remove_one(2).unwrap();
        assert_eq!(mirror.len(), 1);
    }

    #[test]
    fn test_reload_from_storage() {
        let (storage, _mirror) = seeded();

        let reloaded = MirrorStore::<User, _>::load(storage, USERS_KEY);
        assert_eq!(reloaded.list(), vec![user(1, "a@x.com"), user(2, "b@x.com")]);
    }
}
