//! # Browser localStorage: web-side persistence
//!
//! [`LocalStorage`] is the [`DurableStorage`] implementation used on the **web
//! platform**. It writes each key into `window.localStorage`, which is
//! synchronous and survives page reloads.
//!
//! ## Namespacing
//!
//! Keys are prefixed with `"petitions:"` by default, or `"petitions-<ns>:"` when
//! a namespace is given, so several clients on one origin do not collide.
//!
//! ## Error handling
//!
//! A missing `window` or a browser that refuses storage access (private mode,
//! quota exceeded) surfaces as [`StoreError::Unavailable`] carrying the
//! stringified JS exception.

use wasm_bindgen::JsValue;

use crate::storage::{DurableStorage, StoreError};

const DEFAULT_PREFIX: &str = "petitions";

/// localStorage-backed DurableStorage for the web platform.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    prefix: String,
}

impl LocalStorage {
    pub fn new() -> Self {
        Self::with_namespace(None)
    }

    /// - `Some("demo")` → keys `"petitions-demo:<key>"`
    /// - `None` → keys `"petitions:<key>"`
    pub fn with_namespace(namespace: Option<&str>) -> Self {
        let prefix = match namespace {
            Some(ns) => format!("{DEFAULT_PREFIX}-{ns}"),
            None => DEFAULT_PREFIX.to_string(),
        };
        Self { prefix }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{key}", self.prefix)
    }

    fn storage(&self) -> Result<web_sys::Storage, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn js_error(value: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{value:?}"))
}

impl DurableStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(&self.full_key(key))
            .map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(&self.full_key(key), value)
            .map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(&self.full_key(key))
            .map_err(js_error)
    }
}
