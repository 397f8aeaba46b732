//! # Durable key/value storage
//!
//! [`DurableStorage`] is the persistence seam for everything the client keeps
//! across restarts: the mirrored petition and user lists and the two session
//! values. Values are JSON strings stored under a fixed set of keys.
//!
//! Implementations live in sibling modules: [`crate::MemoryStorage`] (tests and
//! fallback), [`crate::FileStorage`] (desktop and console) and, on the web
//! platform, `LocalStorage` over `window.localStorage`.
//!
//! All methods are synchronous, so a mutation that persists has reached the
//! backend by the time it returns.

use thiserror::Error;

/// Key of the mirrored petition list.
pub const PETITIONS_KEY: &str = "petitions";
/// Key of the mirrored user list.
pub const USERS_KEY: &str = "users";
/// Key of the session token.
pub const TOKEN_KEY: &str = "token";
/// Key of the user id owning the session token.
pub const USER_ID_KEY: &str = "userId";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous string key/value store.
pub trait DurableStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: DurableStorage + ?Sized> DurableStorage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
