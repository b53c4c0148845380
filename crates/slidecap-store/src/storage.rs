//! Durable key-value storage for persisted caption cells.
//!
//! The store mirrors a handful of cells to a flat string-keyed table kept
//! in the user's configuration directory. Values cross this boundary as
//! text; integers are stored in their decimal form.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use directories::ProjectDirs;

/// Errors that can occur while loading or mirroring persisted cells.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to determine the user's configuration directory. This usually
    /// occurs when required environment variables are missing (e.g., `$HOME`
    /// on Unix or `%APPDATA%` on Windows).
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    /// An I/O error occurred while reading or writing the storage file.
    #[error("failed to access storage file: {0}")]
    IoError(#[from] std::io::Error),
    /// The storage table could not be serialized to TOML (e.g., when
    /// mirroring a write).
    #[error("failed to serialize storage table: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Storage capability injected into the caption state store.
///
/// Implementations hold a flat string-keyed table of string values. `get`
/// and `set` are the whole contract; the store never enumerates keys and
/// never deletes them.
pub trait KeyValueStorage: fmt::Debug {
    /// Returns the stored value for `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed storage holding the table as TOML in the user's
/// configuration directory.
///
/// Every `set` rewrites the table through a temp file followed by a rename,
/// so an interrupted write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Opens the storage table at the platform configuration location.
    pub fn open_default() -> Result<Self, StorageError> {
        match ProjectDirs::from("dev", "slidecap", "slidecap") {
            Some(dirs) => Self::open(dirs.config_dir().join("captions.toml")),
            None => Err(StorageError::DirectoriesNotFound),
        }
    }

    /// Opens the storage table backed by the file at `path`. The file does
    /// not have to exist yet; it is created by the first `set`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(entries) => entries,
                Err(error) => {
                    log::warn!("Discarding unparsable storage table at {path:?}: {error}");
                    BTreeMap::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };
        log::info!("Loaded caption storage from {path:?}");
        Ok(Self { path, entries })
    }

    fn persist(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(&self.entries)?;
        let temp_path = self.path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(error) = self.persist() {
            // The in-memory table must keep matching what is on disk.
            match previous {
                Some(previous) => self.entries.insert(key.to_string(), previous),
                None => self.entries.remove(key),
            };
            return Err(error);
        }
        Ok(())
    }
}

/// In-memory storage with a shared table.
///
/// Clones share one underlying table, which lets tests keep values alive
/// across a simulated restart. It also serves as the session-only backend
/// when the durable medium is unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty shared table.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().expect("storage table lock poisoned")
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_round_trips_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captions.toml");

        let mut storage = FileStorage::open(path).unwrap();
        assert_eq!(storage.get("slidev-tts-lang").unwrap(), None);

        storage.set("slidev-tts-lang", "fr").unwrap();
        assert_eq!(
            storage.get("slidev-tts-lang").unwrap().as_deref(),
            Some("fr")
        );
    }

    #[test]
    fn file_storage_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captions.toml");

        let mut storage = FileStorage::open(path.clone()).unwrap();
        storage.set("slidev-tts-lang", "fr").unwrap();
        storage.set("slidev-cc-display", "2").unwrap();
        drop(storage);

        let reopened = FileStorage::open(path).unwrap();
        assert_eq!(
            reopened.get("slidev-tts-lang").unwrap().as_deref(),
            Some("fr")
        );
        assert_eq!(
            reopened.get("slidev-cc-display").unwrap().as_deref(),
            Some("2")
        );
    }

    #[test]
    fn set_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captions.toml");

        let mut storage = FileStorage::open(path.clone()).unwrap();
        storage.set("slidev-cc-display", "2").unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn set_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("captions.toml");

        let mut storage = FileStorage::open(path.clone()).unwrap();
        storage.set("slidev-tts-lang", "de").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn unparsable_table_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captions.toml");
        fs::write(&path, "not a table {{{").unwrap();

        let mut storage = FileStorage::open(path.clone()).unwrap();
        assert_eq!(storage.get("slidev-tts-lang").unwrap(), None);

        storage.set("slidev-tts-lang", "en").unwrap();
        let reopened = FileStorage::open(path).unwrap();
        assert_eq!(
            reopened.get("slidev-tts-lang").unwrap().as_deref(),
            Some("en")
        );
    }

    #[test]
    fn memory_storage_clones_share_the_table() {
        let storage = MemoryStorage::new();
        let mut writer = storage.clone();

        writer.set("slidev-cc-display", "2").unwrap();
        assert_eq!(
            storage.get("slidev-cc-display").unwrap().as_deref(),
            Some("2")
        );
    }
}
