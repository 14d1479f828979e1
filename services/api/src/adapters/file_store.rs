//! services/api/src/adapters/file_store.rs
//!
//! This module contains the file-backed implementation of the `KeyValueStore`
//! port. Each key is one `<key>.json` file inside the data directory.

use portfolio_core::ports::{KeyValueStore, PortError, PortResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A key/value store that keeps one JSON document per key on disk.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a new `FileStore`, creating `dir` if it does not exist yet.
    pub fn open(dir: impl Into<PathBuf>) -> PortResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            PortError::Unexpected(format!("creating data dir {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PortResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PortError::Validation(format!("storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

//=========================================================================================
// `KeyValueStore` Trait Implementation
//=========================================================================================

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // Non-UTF-8 content reads as a corrupt value rather than an I/O failure.
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                Err(PortError::Corrupt(format!("{}: {}", path.display(), e)))
            }
            Err(e) => Err(PortError::Unexpected(format!(
                "reading {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Writes a sibling temp file and renames it over the target; readers never
    /// see a partial document.
    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{}.json.tmp", key));

        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| PortError::Unexpected(format!("writing {}: {}", path.display(), e)))?;

        debug!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(format!(
                "removing {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
