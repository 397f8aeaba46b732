//! Durable session values.
//!
//! The session is kept as two independent keys, the opaque token and the id of
//! the user it was issued to. Nothing binds the two together and no expiry is
//! recorded; the server alone decides whether a token is still valid.

use crate::storage::{DurableStorage, StoreError, TOKEN_KEY, USER_ID_KEY};

/// What durable storage currently holds for the session. Either half may be
/// missing independently.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionRecord {
    pub token: Option<String>,
    pub user_id: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: DurableStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> SessionRecord {
        let token = self.read(TOKEN_KEY);
        let user_id = self.read(USER_ID_KEY).and_then(|raw| {
            raw.parse()
                .inspect_err(|e| tracing::warn!("Ignoring unreadable session user id: {e}"))
                .ok()
        });
        SessionRecord { token, user_id }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read session `{key}`: {e}");
                None
            }
        }
    }

    pub fn save(&self, token: &str, user_id: u32) -> Result<(), StoreError> {
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USER_ID_KEY, &user_id.to_string())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_ID_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;

    #[test]
    fn test_session_roundtrip() {
        let storage = MemoryStorage::new();
        let sessions = SessionStore::new(storage.clone());

        assert_eq!(sessions.load(), SessionRecord::default());

        sessions.save("tok-1", 42).unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
        assert_eq!(storage.get(USER_ID_KEY).unwrap().as_deref(), Some("42"));
        assert_eq!(
            sessions.load(),
            SessionRecord {
                token: Some("tok-1".into()),
                user_id: Some(42),
            }
        );

        sessions.clear().unwrap();
        assert_eq!(sessions.load(), SessionRecord::default());
    }

    #[test]
    fn test_halves_are_independent() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "orphan").unwrap();
        storage.set(USER_ID_KEY, "not-a-number").unwrap();

        let record = SessionStore::new(storage).load();
        assert_eq!(record.token.as_deref(), Some("orphan"));
        assert!(record.user_id.is_none());
    }
}
