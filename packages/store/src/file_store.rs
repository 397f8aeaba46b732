//! # Filesystem-backed durable storage
//!
//! [`FileStorage`] is a [`DurableStorage`] implementation that keeps each key in
//! its own file. It is used on desktop and by the console to retain the mirrored
//! lists and the session across restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── petitions.json     # mirrored petition list
//! ├── users.json         # mirrored user list
//! ├── token.json         # session token
//! └── userId.json        # user id owning the token
//! ```
//!
//! ## Platform data directories
//!
//! Use `dirs::data_dir()` to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/petitions/` |
//! | Linux | `~/.local/share/petitions/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\petitions\` |

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::storage::{DurableStorage, StoreError};

/// Filesystem-backed DurableStorage, one file per key.
#[derive(Clone, Debug)]
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes `<key>.json.tmp` and renames it over `<key>.json`, so a reader
    /// sees either the old value or the new one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.base)?;
        let path = self.key_path(key);
        let tmp = self.base.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path).inspect_err(|e| {
            tracing::debug!("Failed to replace {}: {e}", path.display());
            let _ = std::fs::remove_file(&tmp);
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
